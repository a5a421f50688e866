use ndarray::Array1;
use std::cmp;
use std::error::Error;
use std::fmt;

pub type Machine = usize;
pub type Duration = u32;
pub type Time = u32;

pub type OpId = usize;

/// One operation, identified by its job and its position inside that job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Task {
  pub job: usize,
  pub task: usize,
}

impl Task {
  pub fn new(job: usize, task: usize) -> Self {
    Self {
      job: job,
      task: task,
    }
  }
}

impl fmt::Display for Task {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({},{})", self.job, self.task)
  }
}

/// Immutable job-shop problem. Every job has exactly `n_tasks` operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
  pub n_jobs: usize,
  pub n_machines: usize,
  pub n_tasks: usize,

  pub durations: Array1<Duration>,
  pub machines: Array1<Machine>,
}

impl Instance {
  pub fn from_jobs(
    n_machines: usize,
    jobs: &[Vec<(Machine, Duration)>],
  ) -> Result<Instance, Box<dyn Error>> {
    let n_jobs = jobs.len();
    if n_jobs == 0 {
      Err("Instance without jobs")?;
    }
    let n_tasks = jobs[0].len();
    if n_tasks == 0 {
      Err("Jobs without operations")?;
    }

    let mut instance = Instance {
      n_jobs: n_jobs,
      n_machines: n_machines,
      n_tasks: n_tasks,
      durations: Array1::<Duration>::from_elem(n_jobs * n_tasks, 0),
      machines: Array1::<Machine>::from_elem(n_jobs * n_tasks, 0),
    };

    for (job, ops) in jobs.iter().enumerate() {
      if ops.len() != n_tasks {
        Err(format!(
          "Job {} has {} operations, expected {}",
          job,
          ops.len(),
          n_tasks
        ))?;
      }
      for (task, &(machine, duration)) in ops.iter().enumerate() {
        if machine >= n_machines {
          Err(format!(
            "Machine {} of {} out of range (n_machines={})",
            machine,
            Task::new(job, task),
            n_machines
          ))?;
        }
        let op = instance.task_id(Task::new(job, task));
        instance.machines[op] = machine;
        instance.durations[op] = duration;
      }
    }

    Ok(instance)
  }

  pub fn tasks(&self) -> Vec<Task> {
    let mut tasks = Vec::with_capacity(self.n_ops());

    for j in 0..self.n_jobs {
      for o in 0..self.n_tasks {
        tasks.push(Task::new(j, o));
      }
    }

    return tasks;
  }

  pub fn task_id(&self, task: Task) -> OpId {
    return task.job * self.n_tasks + task.task;
  }

  pub fn task_from_id(&self, id: OpId) -> Task {
    return Task::new(id / self.n_tasks, id % self.n_tasks);
  }

  pub fn machine(&self, task: Task) -> Machine {
    return self.machines[self.task_id(task)];
  }

  pub fn duration(&self, task: Task) -> Duration {
    return self.durations[self.task_id(task)];
  }

  pub fn duration_at(&self, job: usize, position: usize) -> Duration {
    return self.duration(Task::new(job, position));
  }

  pub fn n_ops(&self) -> usize {
    return self.n_jobs * self.n_tasks;
  }

  pub fn job_duration(&self, job: usize) -> Time {
    return (0..self.n_tasks).map(|o| self.duration_at(job, o)).sum();
  }

  pub fn machine_load(&self, machine: Machine) -> Time {
    return self
      .tasks()
      .into_iter()
      .filter(|&t| self.machine(t) == machine)
      .map(|t| self.duration(t))
      .sum();
  }

  /// Neither a job nor a machine can finish before its own total work.
  pub fn lower_bound(&self) -> Time {
    let longest_job = (0..self.n_jobs).map(|j| self.job_duration(j)).max();
    let busiest_machine = (0..self.n_machines).map(|m| self.machine_load(m)).max();

    return cmp::max(longest_job.unwrap_or(0), busiest_machine.unwrap_or(0));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn two_by_two() -> Instance {
    Instance::from_jobs(2, &[vec![(0, 3), (1, 2)], vec![(1, 4), (0, 1)]]).unwrap()
  }

  #[test]
  fn test_lookups() {
    let inst = two_by_two();
    assert_eq!(inst.n_ops(), 4);
    assert_eq!(inst.machine(Task::new(1, 0)), 1);
    assert_eq!(inst.duration(Task::new(1, 0)), 4);
    assert_eq!(inst.duration_at(0, 1), 2);
    assert_eq!(inst.task_from_id(inst.task_id(Task::new(1, 1))), Task::new(1, 1));
  }

  #[test]
  fn test_lower_bound() {
    let inst = two_by_two();
    assert_eq!(inst.job_duration(0), 5);
    assert_eq!(inst.job_duration(1), 5);
    assert_eq!(inst.machine_load(0), 4);
    assert_eq!(inst.machine_load(1), 6);
    assert_eq!(inst.lower_bound(), 6);
  }

  #[test]
  fn test_rejects_ragged_jobs() {
    let result = Instance::from_jobs(2, &[vec![(0, 3), (1, 2)], vec![(1, 4)]]);
    assert!(result.is_err());
  }

  #[test]
  fn test_rejects_unknown_machine() {
    let result = Instance::from_jobs(1, &[vec![(0, 3), (1, 2)]]);
    assert!(result.is_err());
  }
}
