use crate::data::{Instance, Machine, OpId, Task, Time};
use crate::encoding::Schedule;
use itertools::Itertools;
use log::trace;
use ndarray::Array1;
use std::cmp;
use std::collections::VecDeque;

/// Per-machine processing order of the tasks.
///
/// Cloning copies every queue, so a clone can be mutated without touching
/// the order it came from. The instance itself is shared.
#[derive(Debug, Clone)]
pub struct ResourceOrder<'a> {
  instance: &'a Instance,

  queues: Vec<Vec<Task>>,
  // Index of every task inside its machine queue
  positions: Array1<Option<usize>>,
}

impl<'a> ResourceOrder<'a> {
  pub fn new(instance: &'a Instance) -> Self {
    Self {
      instance: instance,
      queues: vec![Vec::with_capacity(instance.n_jobs); instance.n_machines],
      positions: Array1::from_elem(instance.n_ops(), None),
    }
  }

  /// Rebuilds the machine queues of a schedule. A schedule decoded from an
  /// order gives that order back.
  pub fn from_schedule(schedule: &Schedule<'a>) -> Self {
    let instance = schedule.instance();
    let mut order = Self::new(instance);

    for sequence in schedule.machine_sequences() {
      for &op in sequence {
        order.push(instance.task_from_id(op));
      }
    }

    return order;
  }

  pub fn instance(&self) -> &'a Instance {
    return self.instance;
  }

  /// Appends `task` to the queue of the machine it runs on.
  pub fn push(&mut self, task: Task) {
    let id = self.instance.task_id(task);
    debug_assert!(self.positions[id].is_none(), "{} queued twice", task);

    let queue = &mut self.queues[self.instance.machine(task)];
    self.positions[id] = Some(queue.len());
    queue.push(task);
  }

  pub fn queue(&self, machine: Machine) -> &[Task] {
    return &self.queues[machine];
  }

  pub fn task_at(&self, machine: Machine, position: usize) -> Task {
    return self.queues[machine][position];
  }

  pub fn position(&self, task: Task) -> Option<usize> {
    return self.positions[self.instance.task_id(task)];
  }

  pub fn swap(&mut self, machine: Machine, a: usize, b: usize) {
    let queue = &mut self.queues[machine];
    queue.swap(a, b);

    let (task_a, task_b) = (queue[a], queue[b]);
    self.positions[self.instance.task_id(task_a)] = Some(a);
    self.positions[self.instance.task_id(task_b)] = Some(b);
  }

  /// True once every task of the instance sits in exactly one queue.
  pub fn is_complete(&self) -> bool {
    return self.positions.iter().all(|p| p.is_some());
  }

  /// Computes the earliest start of every task given both the job order and
  /// the machine queues. Returns `None` if the two orders wait on each other.
  pub fn to_schedule(&self) -> Option<Schedule<'a>> {
    let inst = self.instance;
    if !self.is_complete() {
      trace!("to_schedule on incomplete resource order");
      return None;
    }

    let n_ops = inst.n_ops();
    let mut pre_machine = Array1::<Option<OpId>>::from_elem(n_ops, None);
    let mut succ_machine = Array1::<Option<OpId>>::from_elem(n_ops, None);
    for queue in &self.queues {
      for (a, b) in queue.iter().tuple_windows() {
        let (a, b) = (inst.task_id(*a), inst.task_id(*b));
        pre_machine[b] = Some(a);
        succ_machine[a] = Some(b);
      }
    }

    // Number of predecessors (job and machine) not yet scheduled
    let mut pending = Array1::<u8>::from_elem(n_ops, 0);
    let mut open = VecDeque::new();
    for op in 0..n_ops {
      let has_pre_job = inst.task_from_id(op).task > 0;
      pending[op] = has_pre_job as u8 + pre_machine[op].is_some() as u8;
      if pending[op] == 0 {
        open.push_back(op);
      }
    }

    let mut start_times = Array1::<Time>::from_elem(n_ops, 0);
    let mut resolved = 0;
    while let Some(op) = open.pop_front() {
      let task = inst.task_from_id(op);

      let pre_job_end = if task.task > 0 {
        start_times[op - 1] + inst.durations[op - 1]
      } else {
        0
      };
      let pre_machine_end = pre_machine[op].map_or(0, |p| start_times[p] + inst.durations[p]);
      start_times[op] = cmp::max(pre_job_end, pre_machine_end);
      resolved += 1;

      let succ_job = if task.task + 1 < inst.n_tasks {
        Some(op + 1)
      } else {
        None
      };
      for succ in succ_job.into_iter().chain(succ_machine[op]) {
        pending[succ] -= 1;
        if pending[succ] == 0 {
          open.push_back(succ);
        }
      }
    }

    if resolved < n_ops {
      trace!(
        "Cyclic resource order, resolved {} of {} tasks",
        resolved,
        n_ops
      );
      return None;
    }

    let sequences: Vec<Vec<OpId>> = self
      .queues
      .iter()
      .map(|queue| queue.iter().map(|&t| inst.task_id(t)).collect())
      .collect();

    return Some(Schedule::with_sequences(inst, start_times, sequences));
  }
}

impl<'a> PartialEq for ResourceOrder<'a> {
  fn eq(&self, other: &Self) -> bool {
    return self.queues == other.queues;
  }
}

impl<'a> Eq for ResourceOrder<'a> {}
