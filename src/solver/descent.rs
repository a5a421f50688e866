use crate::data::Instance;
use crate::encoding::{ResourceOrder, Schedule};
use crate::solver::{nowicki, Solver};
use log::{debug, trace, warn};
use std::time::Instant;

/// One steepest-descent step over the Nowicki neighborhood of a seed.
///
/// The deadline is only handed to the seed solver; the step itself does not
/// loop.
pub struct DescentSolver<S> {
  base: S,
}

impl<S: Solver> DescentSolver<S> {
  pub fn new(base: S) -> Self {
    Self { base: base }
  }
}

impl<S: Solver> Solver for DescentSolver<S> {
  fn solve<'a>(&self, inst: &'a Instance, deadline: Instant) -> Option<Schedule<'a>> {
    let seed = self.base.solve(inst, deadline)?;
    trace!("Starting with {}", seed.makespan());

    let initial = ResourceOrder::from_schedule(&seed);
    let neighbors = nowicki::generate_neighbors(&initial);
    if neighbors.is_empty() {
      warn!("Generated neighborhood is empty");
    }

    let mut best = seed;
    for neighbor in neighbors {
      let candidate = match neighbor.order.to_schedule() {
        Some(schedule) if schedule.is_valid() => schedule,
        _ => {
          trace!("Discarding move {:?}", neighbor.swap);
          continue;
        }
      };

      trace!("Trying move {:?} to {}", neighbor.swap, candidate.makespan());
      if candidate.makespan() < best.makespan() {
        best = candidate;
      }
    }

    debug!("Descent stopping at {}", best.makespan());

    return Some(best);
  }
}
