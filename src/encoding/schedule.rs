use crate::data::{Instance, OpId, Task, Time};
use itertools::Itertools;
use ndarray::Array1;
use std::cmp::Reverse;
use std::error::Error;

/// Start time of every task of an instance, together with the processing
/// order of every machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule<'a> {
  instance: &'a Instance,
  start_times: Array1<Time>,
  // Task ids of every machine, in processing order
  sequences: Vec<Vec<OpId>>,
}

impl<'a> Schedule<'a> {
  /// `start_times` is indexed by `Instance::task_id`. The machine order is
  /// taken from the start times, zero-length tasks first among tasks
  /// starting together.
  pub fn new(instance: &'a Instance, start_times: Array1<Time>) -> Result<Self, Box<dyn Error>> {
    if start_times.len() != instance.n_ops() {
      Err(format!(
        "Expected {} start times, got {}",
        instance.n_ops(),
        start_times.len()
      ))?;
    }

    let mut sequences = vec![Vec::with_capacity(instance.n_jobs); instance.n_machines];
    for op in 0..instance.n_ops() {
      sequences[instance.machines[op]].push(op);
    }
    for sequence in &mut sequences {
      sequence.sort_by_key(|&op| (start_times[op], start_times[op] + instance.durations[op], op));
    }

    Ok(Self::with_sequences(instance, start_times, sequences))
  }

  /// Schedule decoded from known machine queues. Ties in start time keep the
  /// queue order.
  pub(crate) fn with_sequences(
    instance: &'a Instance,
    start_times: Array1<Time>,
    sequences: Vec<Vec<OpId>>,
  ) -> Self {
    debug_assert_eq!(start_times.len(), instance.n_ops());
    Self {
      instance: instance,
      start_times: start_times,
      sequences: sequences,
    }
  }

  pub fn instance(&self) -> &'a Instance {
    return self.instance;
  }

  pub fn start_times(&self) -> &Array1<Time> {
    return &self.start_times;
  }

  pub fn start(&self, task: Task) -> Time {
    return self.start_times[self.instance.task_id(task)];
  }

  pub fn end(&self, task: Task) -> Time {
    return self.op_end(self.instance.task_id(task));
  }

  fn op_end(&self, op: OpId) -> Time {
    return self.start_times[op] + self.instance.durations[op];
  }

  pub fn makespan(&self) -> Time {
    return (0..self.instance.n_ops())
      .map(|op| self.op_end(op))
      .max()
      .unwrap_or(0);
  }

  pub fn is_valid(&self) -> bool {
    return self.verify().is_ok();
  }

  /// Checks job precedence and machine exclusivity, reporting the first
  /// violation found.
  pub fn verify(&self) -> Result<(), Box<dyn Error>> {
    let inst = self.instance;

    for job in 0..inst.n_jobs {
      for o in 1..inst.n_tasks {
        let pre = Task::new(job, o - 1);
        let task = Task::new(job, o);
        if self.end(pre) > self.start(task) {
          Err(format!(
            "Precedence violation in job {} - {}:[{}, {}] should be before {}:[{}, {}]",
            job,
            pre,
            self.start(pre),
            self.end(pre),
            task,
            self.start(task),
            self.end(task)
          ))?;
        }
      }
    }

    for (machine, sequence) in self.machine_sequences().iter().enumerate() {
      for (&a, &b) in sequence.iter().tuple_windows() {
        if self.op_end(a) > self.start_times[b] {
          let (task_a, task_b) = (inst.task_from_id(a), inst.task_from_id(b));
          Err(format!(
            "Overlap in machine {} - {}:[{}, {}] overlaps with {}:[{}, {}]",
            machine,
            task_a,
            self.start(task_a),
            self.end(task_a),
            task_b,
            self.start(task_b),
            self.end(task_b)
          ))?;
        }
      }
    }

    Ok(())
  }

  /// Tasks of every machine, in processing order.
  pub(crate) fn machine_sequences(&self) -> &[Vec<OpId>] {
    return &self.sequences;
  }

  /// Longest chain of tasks, each starting exactly when its predecessor
  /// ends, leading up to the first task that finishes at the makespan.
  /// Machine predecessors are taken from the processing order, and win over
  /// the job predecessor when both end at a task's start.
  pub fn critical_path(&self) -> Vec<Task> {
    let inst = self.instance;
    let n_ops = inst.n_ops();

    let mut pre_machine = Array1::<Option<OpId>>::from_elem(n_ops, None);
    for sequence in &self.sequences {
      for (&a, &b) in sequence.iter().tuple_windows() {
        pre_machine[b] = Some(a);
      }
    }

    let last = match (0..n_ops).min_by_key(|&op| (Reverse(self.op_end(op)), op)) {
      Some(op) => op,
      None => return Vec::new(),
    };

    let mut path = vec![last];
    let mut current = last;
    while path.len() < n_ops {
      let start = self.start_times[current];
      let binding_machine = pre_machine[current].filter(|&p| self.op_end(p) == start);
      let binding_job = Some(current)
        .filter(|&op| inst.task_from_id(op).task > 0)
        .map(|op| op - 1)
        .filter(|&p| self.op_end(p) == start);

      match binding_machine.or(binding_job) {
        Some(pre) => {
          path.push(pre);
          current = pre;
        }
        None => break,
      }
    }

    return path
      .into_iter()
      .rev()
      .map(|op| inst.task_from_id(op))
      .collect();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::encoding::fixtures::{order_from, two_by_two};

  #[test]
  fn test_critical_path_two_by_two() {
    let inst = two_by_two();
    let order = order_from(&inst, &[vec![(0, 0), (1, 1)], vec![(1, 0), (0, 1)]]);
    let schedule = order.to_schedule().unwrap();

    assert_eq!(
      schedule.critical_path(),
      vec![Task::new(1, 0), Task::new(0, 1)]
    );
  }

  #[test]
  fn test_critical_path_sums_to_makespan() {
    let inst = two_by_two();
    let order = order_from(&inst, &[vec![(0, 0), (1, 1)], vec![(0, 1), (1, 0)]]);
    let schedule = order.to_schedule().unwrap();
    let path = schedule.critical_path();

    assert_eq!(path.first().map(|&t| schedule.start(t)), Some(0));
    let total: Time = path.iter().map(|&t| inst.duration(t)).sum();
    assert_eq!(total, schedule.makespan());
  }

  #[test]
  fn test_critical_path_prefers_machine_predecessor() {
    // (0,1) can start at 2 because of both (0,0) and (1,0)
    let inst = Instance::from_jobs(2, &[vec![(0, 2), (1, 1)], vec![(1, 2), (0, 1)]]).unwrap();
    let order = order_from(&inst, &[vec![(0, 0), (1, 1)], vec![(1, 0), (0, 1)]]);
    let schedule = order.to_schedule().unwrap();

    assert_eq!(schedule.makespan(), 3);
    assert_eq!(
      schedule.critical_path(),
      vec![Task::new(1, 0), Task::new(0, 1)]
    );
  }

  #[test]
  fn test_verify_reports_overlap() {
    let inst = two_by_two();
    let schedule = Schedule::new(&inst, Array1::from(vec![0, 3, 0, 4])).unwrap();

    assert!(!schedule.is_valid());
    let err = schedule.verify().unwrap_err().to_string();
    assert!(err.contains("Overlap"), "{}", err);
  }

  #[test]
  fn test_verify_reports_precedence() {
    let inst = two_by_two();
    let schedule = Schedule::new(&inst, Array1::from(vec![0, 1, 3, 7])).unwrap();

    let err = schedule.verify().unwrap_err().to_string();
    assert!(err.contains("Precedence"), "{}", err);
  }

  #[test]
  fn test_new_rejects_wrong_length() {
    let inst = two_by_two();
    assert!(Schedule::new(&inst, Array1::from(vec![0, 3, 5])).is_err());
  }

  #[test]
  fn test_critical_path_follows_queue_through_zero_length_tasks() {
    // Both M0 tasks take no time, (1,0) is queued before (0,0)
    let inst = Instance::from_jobs(2, &[vec![(0, 0), (1, 5)], vec![(0, 0), (1, 1)]]).unwrap();
    let order = order_from(&inst, &[vec![(1, 0), (0, 0)], vec![(0, 1), (1, 1)]]);
    let schedule = order.to_schedule().unwrap();

    assert_eq!(schedule.makespan(), 6);
    assert_eq!(
      schedule.critical_path(),
      vec![
        Task::new(1, 0),
        Task::new(0, 0),
        Task::new(0, 1),
        Task::new(1, 1)
      ]
    );
  }
}
