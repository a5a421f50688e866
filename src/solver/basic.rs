use crate::data::{Instance, Task};
use crate::encoding::{ResourceOrder, Schedule};
use crate::solver::Solver;
use std::time::Instant;

/// Queues the jobs one after another on every machine.
pub struct BasicSolver;

impl Solver for BasicSolver {
  fn solve<'a>(&self, inst: &'a Instance, _deadline: Instant) -> Option<Schedule<'a>> {
    let mut order = ResourceOrder::new(inst);

    for j in 0..inst.n_jobs {
      for o in 0..inst.n_tasks {
        order.push(Task::new(j, o));
      }
    }

    return order.to_schedule();
  }
}
