use crate::data::{Instance, Task, Time};
use crate::encoding::{ResourceOrder, Schedule};
use crate::solver::Solver;
use log::trace;
use ndarray::Array1;
use std::cmp::{self, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Dispatching rules of the greedy constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
  /// Shortest processing time
  Spt,
  /// Longest processing time
  Lpt,
  /// Shortest remaining job work
  Srpt,
  /// Longest remaining job work
  Lrpt,
  EstSpt,
  EstLpt,
  EstSrpt,
  EstLrpt,
}

/// Smaller keys are dispatched first: (earliest start, rule value, job, task).
type Key = (Time, i64, usize, usize);

impl Priority {
  pub const ALL: [Priority; 8] = [
    Priority::Spt,
    Priority::Lpt,
    Priority::Srpt,
    Priority::Lrpt,
    Priority::EstSpt,
    Priority::EstLpt,
    Priority::EstSrpt,
    Priority::EstLrpt,
  ];

  pub fn name(&self) -> &'static str {
    match self {
      Priority::Spt => "spt",
      Priority::Lpt => "lpt",
      Priority::Srpt => "srpt",
      Priority::Lrpt => "lrpt",
      Priority::EstSpt => "est_spt",
      Priority::EstLpt => "est_lpt",
      Priority::EstSrpt => "est_srpt",
      Priority::EstLrpt => "est_lrpt",
    }
  }

  /// EST rules rank by earliest start time first and use the named rule for ties.
  pub fn uses_start_time(&self) -> bool {
    match self {
      Priority::EstSpt | Priority::EstLpt | Priority::EstSrpt | Priority::EstLrpt => true,
      _ => false,
    }
  }

  fn key(&self, inst: &Instance, task: Task, earliest_start: Time) -> Key {
    let duration = inst.duration(task) as i64;
    let remaining = get_work_remaining(inst, task) as i64;

    let rule = match self {
      Priority::Spt | Priority::EstSpt => duration,
      Priority::Lpt | Priority::EstLpt => -duration,
      Priority::Srpt | Priority::EstSrpt => remaining,
      Priority::Lrpt | Priority::EstLrpt => -remaining,
    };
    let start = if self.uses_start_time() {
      earliest_start
    } else {
      0
    };

    return (start, rule, task.job, task.task);
  }
}

impl fmt::Display for Priority {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for Priority {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let lower = s.to_ascii_lowercase();
    return Priority::ALL
      .iter()
      .copied()
      .find(|p| p.name() == lower)
      .ok_or_else(|| format!("Unknown priority '{}'", s));
  }
}

/// Work left in the job of `task`, `task` included.
fn get_work_remaining(inst: &Instance, task: Task) -> Time {
  return (task.task..inst.n_tasks)
    .map(|o| inst.duration_at(task.job, o))
    .sum();
}

/// List scheduler driven by a `Priority`.
pub struct GreedySolver {
  pub priority: Priority,
}

impl GreedySolver {
  pub fn new(priority: Priority) -> Self {
    Self { priority: priority }
  }

  pub fn build_order<'a>(&self, inst: &'a Instance) -> ResourceOrder<'a> {
    let priority = self.priority;
    let mut order = ResourceOrder::new(inst);
    let mut machine_next_release = Array1::<Time>::from_elem(inst.n_machines, 0);
    let mut job_next_release = Array1::<Time>::from_elem(inst.n_jobs, 0);

    let earliest_start = |machine_next_release: &Array1<Time>,
                          job_next_release: &Array1<Time>,
                          task: Task| {
      cmp::max(
        machine_next_release[inst.machine(task)],
        job_next_release[task.job],
      )
    };

    let mut ready = BinaryHeap::new();
    for j in 0..inst.n_jobs {
      let task = Task::new(j, 0);
      ready.push(Reverse((priority.key(inst, task, 0), task)));
    }

    while let Some(Reverse((key, task))) = ready.pop() {
      let start = earliest_start(&machine_next_release, &job_next_release, task);

      // Earliest starts only grow, so a stored key is a lower bound of the
      // current one. Stale entries are re-keyed and pushed back.
      if priority.uses_start_time() {
        let fresh = priority.key(inst, task, start);
        if fresh != key {
          ready.push(Reverse((fresh, task)));
          continue;
        }
      }

      trace!("Dispatching {} at {} ({})", task, start, priority);
      order.push(task);
      let finish = start + inst.duration(task);
      machine_next_release[inst.machine(task)] = finish;
      job_next_release[task.job] = finish;

      if task.task + 1 < inst.n_tasks {
        let next = Task::new(task.job, task.task + 1);
        let next_start = earliest_start(&machine_next_release, &job_next_release, next);
        ready.push(Reverse((priority.key(inst, next, next_start), next)));
      }
    }

    return order;
  }
}

impl Solver for GreedySolver {
  fn solve<'a>(&self, inst: &'a Instance, _deadline: Instant) -> Option<Schedule<'a>> {
    return self.build_order(inst).to_schedule();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::encoding::fixtures::two_by_two;
  use crate::solver::fixtures::{far_deadline, ft06};

  #[test]
  fn test_all_priorities_are_valid() {
    let inst = ft06();
    for &priority in Priority::ALL.iter() {
      let schedule = GreedySolver::new(priority)
        .solve(&inst, far_deadline())
        .unwrap();
      assert!(schedule.is_valid(), "{}", priority);
      assert!(schedule.makespan() >= inst.lower_bound(), "{}", priority);
    }
  }

  #[test]
  fn test_spt_two_by_two() {
    let inst = two_by_two();
    let order = GreedySolver::new(Priority::Spt).build_order(&inst);

    assert_eq!(order.queue(1), &[Task::new(0, 1), Task::new(1, 0)][..]);
    assert_eq!(order.to_schedule().unwrap().makespan(), 10);
  }

  #[test]
  fn test_est_spt_rekeys_stale_tasks() {
    // (0,1) is queued with start 3 but M1 is busy until 4 once (1,0) runs,
    // which lets (1,1) with the shorter duration go first.
    let inst = two_by_two();
    let order = GreedySolver::new(Priority::EstSpt).build_order(&inst);

    assert_eq!(order.queue(0), &[Task::new(0, 0), Task::new(1, 1)][..]);
    assert_eq!(order.queue(1), &[Task::new(1, 0), Task::new(0, 1)][..]);
    assert_eq!(order.to_schedule().unwrap().makespan(), 6);
  }

  #[test]
  fn test_lrpt_prefers_longest_job_tail() {
    let inst = Instance::from_jobs(1, &[vec![(0, 1)], vec![(0, 5)], vec![(0, 3)]]).unwrap();
    let order = GreedySolver::new(Priority::Lrpt).build_order(&inst);

    assert_eq!(
      order.queue(0),
      &[Task::new(1, 0), Task::new(2, 0), Task::new(0, 0)][..]
    );
  }

  #[test]
  fn test_equal_keys_keep_every_task() {
    let inst = Instance::from_jobs(1, &[vec![(0, 2)], vec![(0, 2)], vec![(0, 2)]]).unwrap();
    let order = GreedySolver::new(Priority::Spt).build_order(&inst);

    assert!(order.is_complete());
    assert_eq!(order.to_schedule().unwrap().makespan(), 6);
  }

  #[test]
  fn test_parse_priority() {
    assert_eq!("est_lrpt".parse::<Priority>(), Ok(Priority::EstLrpt));
    assert_eq!("SPT".parse::<Priority>(), Ok(Priority::Spt));
    assert!("fifo".parse::<Priority>().is_err());
  }
}
