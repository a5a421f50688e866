mod resource_order;
mod schedule;

pub use resource_order::ResourceOrder;
pub use schedule::Schedule;

#[cfg(test)]
pub(crate) mod fixtures {
  use crate::data::{Instance, Task};
  use crate::encoding::ResourceOrder;

  /// job 0 = [(M0,3),(M1,2)], job 1 = [(M1,4),(M0,1)]
  pub fn two_by_two() -> Instance {
    Instance::from_jobs(2, &[vec![(0, 3), (1, 2)], vec![(1, 4), (0, 1)]]).unwrap()
  }

  pub fn order_from<'a>(inst: &'a Instance, queues: &[Vec<(usize, usize)>]) -> ResourceOrder<'a> {
    let mut order = ResourceOrder::new(inst);
    for queue in queues {
      for &(j, o) in queue {
        order.push(Task::new(j, o));
      }
    }
    return order;
  }
}
