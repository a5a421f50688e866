use crate::data::{Instance, Task};
use crate::encoding::{ResourceOrder, Schedule};
use crate::solver::Solver;
use log::trace;
use rand::{Rng, SeedableRng};
use rand_chacha;
use std::time::Instant;

/// Dispatches a uniformly random ready task until every task is queued.
pub struct RandomSolver {
  pub seed: u64,
}

impl Solver for RandomSolver {
  fn solve<'a>(&self, inst: &'a Instance, _deadline: Instant) -> Option<Schedule<'a>> {
    let mut rng = rand_chacha::ChaChaRng::seed_from_u64(self.seed);
    let order = generate_random_order(inst, &mut rng);

    return order.to_schedule();
  }
}

pub fn generate_random_order<'a, R: Rng>(inst: &'a Instance, rng: &mut R) -> ResourceOrder<'a> {
  let mut order = ResourceOrder::new(inst);

  let mut ready: Vec<Task> = (0..inst.n_jobs).map(|j| Task::new(j, 0)).collect();
  while !ready.is_empty() {
    let chosen_idx = rng.gen_range(0, ready.len());
    let chosen = ready.remove(chosen_idx);
    trace!("Dispatching {}", chosen);

    order.push(chosen);
    if chosen.task + 1 < inst.n_tasks {
      ready.push(Task::new(chosen.job, chosen.task + 1));
    }
  }

  return order;
}
