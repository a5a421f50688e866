use crate::data::{Duration, Instance, Machine};
use std::error::Error;

/// Parses an instance in the usual job-shop text format: an optional
/// `#`-commented preamble, a `num_jobs num_tasks` line, then one line of
/// `machine duration` pairs per job.
pub fn parse_instance(instance: &str) -> Result<Instance, Box<dyn Error>> {
  let mut lines = instance
    .lines()
    .map(|l| l.trim())
    .filter(|l| !l.is_empty() && !l.starts_with('#'));

  let prelude = lines.next().ok_or("Prelude missing")?;
  let prelude_items: Vec<&str> = prelude.split_whitespace().collect();
  let n_jobs: usize = prelude_items.get(0).ok_or("n_jobs missing")?.parse()?;
  let n_tasks: usize = prelude_items.get(1).ok_or("n_tasks missing")?.parse()?;

  let mut jobs: Vec<Vec<(Machine, Duration)>> = Vec::with_capacity(n_jobs);
  for (job, line) in lines.enumerate() {
    let items: Vec<&str> = line.split_whitespace().collect();
    if items.len() != 2 * n_tasks {
      Err(format!(
        "Job {} lists {} values, expected {} machine/duration pairs",
        job,
        items.len(),
        n_tasks
      ))?;
    }

    let mut ops = Vec::with_capacity(n_tasks);
    for i in (0..items.len()).step_by(2) {
      let machine: Machine = items.get(i).ok_or("Machine missing")?.parse()?;
      let duration: Duration = items.get(i + 1).ok_or("Duration missing")?.parse()?;
      ops.push((machine, duration));
    }
    jobs.push(ops);
  }

  if jobs.len() != n_jobs {
    Err(format!("Expected {} jobs, found {}", n_jobs, jobs.len()))?;
  }

  let n_machines = jobs
    .iter()
    .flat_map(|ops| ops.iter().map(|&(m, _)| m + 1))
    .max()
    .unwrap_or(0);

  Instance::from_jobs(n_machines, &jobs)
}
