use crate::data::{Machine, Task};
use crate::encoding::{ResourceOrder, Schedule};
use itertools::Itertools;
use log;

// Nowicki and Smutnicki, "A Fast Taboo Search Algorithm for the Job Shop Problem"

/// Maximal run of consecutive critical tasks on one machine, given as the
/// queue positions of its first and last task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
  pub machine: Machine,
  pub first: usize,
  pub last: usize,
}

/// Exchange of two queue positions on a machine, with `t1 < t2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Swap {
  pub machine: Machine,
  pub t1: usize,
  pub t2: usize,
}

impl Swap {
  pub fn new(machine: Machine, a: usize, b: usize) -> Self {
    Self {
      machine: machine,
      t1: a.min(b),
      t2: a.max(b),
    }
  }

  /// Exchanging the same two positions again restores the queue.
  pub fn inverse(&self) -> Swap {
    return Swap::new(self.machine, self.t2, self.t1);
  }

  /// Copy of `order` with the swap applied. `order` is left untouched.
  pub fn apply<'a>(&self, order: &ResourceOrder<'a>) -> ResourceOrder<'a> {
    let mut neighbor = order.clone();
    neighbor.swap(self.machine, self.t1, self.t2);
    return neighbor;
  }
}

/// The two tasks exchanged by a swap, in their queue order before the swap.
/// Unlike `Swap` it keeps naming the same move when positions shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairTask {
  pub first: Task,
  pub second: Task,
}

impl PairTask {
  pub fn new(first: Task, second: Task) -> Self {
    Self {
      first: first,
      second: second,
    }
  }

  pub fn inverse(&self) -> PairTask {
    return PairTask::new(self.second, self.first);
  }
}

#[derive(Debug, Clone)]
pub struct Neighbor<'a> {
  pub order: ResourceOrder<'a>,
  pub swap: Swap,
  pub pair: PairTask,
}

/// Splits the critical path of `schedule` into blocks, in path order.
/// Runs of a single task are not blocks.
pub fn blocks_of_critical_path(order: &ResourceOrder, schedule: &Schedule) -> Vec<Block> {
  let inst = order.instance();
  let path = schedule.critical_path();

  let mut blocks = Vec::new();
  let runs = path.iter().group_by(|t| inst.machine(**t));
  for (machine, run) in &runs {
    let run: Vec<Task> = run.copied().collect();
    if run.len() < 2 {
      continue;
    }

    let first = order.position(run[0]);
    let last = order.position(run[run.len() - 1]);
    if let (Some(first), Some(last)) = (first, last) {
      if first < last {
        blocks.push(Block {
          machine: machine,
          first: first,
          last: last,
        });
      }
    }
  }

  log::trace!("blocks={:?}", blocks);

  return blocks;
}

/// Swaps the first two and the last two tasks of the block. A block of two
/// tasks yields a single swap.
pub fn block_swaps(block: &Block) -> Vec<Swap> {
  if block.last - block.first == 1 {
    return vec![Swap::new(block.machine, block.first, block.last)];
  }

  return vec![
    Swap::new(block.machine, block.first, block.first + 1),
    Swap::new(block.machine, block.last - 1, block.last),
  ];
}

/// Every swap of the neighborhood, blocks in critical path order. Empty if
/// `order` does not decode.
pub fn all_swaps(order: &ResourceOrder) -> Vec<Swap> {
  let schedule = match order.to_schedule() {
    Some(schedule) => schedule,
    None => {
      log::warn!("Neighborhood of an undecodable resource order");
      return Vec::new();
    }
  };

  return blocks_of_critical_path(order, &schedule)
    .iter()
    .flat_map(block_swaps)
    .collect();
}

pub fn generate_neighbors<'a>(order: &ResourceOrder<'a>) -> Vec<Neighbor<'a>> {
  return all_swaps(order)
    .into_iter()
    .map(|swap| Neighbor {
      order: swap.apply(order),
      swap: swap,
      pair: PairTask::new(
        order.task_at(swap.machine, swap.t1),
        order.task_at(swap.machine, swap.t2),
      ),
    })
    .collect();
}
