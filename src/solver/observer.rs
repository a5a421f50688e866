use crate::data::Time;
use crate::solver::nowicki::{PairTask, Swap};
use log::debug;

/// Summary of one round of a local search.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationEvent {
  pub iteration: usize,
  /// Size of the generated neighborhood
  pub candidates: usize,
  /// Candidates that were neither tabu nor undecodable
  pub admissible: usize,
  pub chosen_swap: Option<Swap>,
  pub chosen_pair: Option<PairTask>,
  pub current_makespan: Time,
  pub best_makespan: Time,
}

pub trait SearchObserver {
  fn on_iteration(&self, event: &IterationEvent);
}

/// Forwards every event to the `log` facade.
pub struct LogObserver;

impl SearchObserver for LogObserver {
  fn on_iteration(&self, event: &IterationEvent) {
    debug!(
      "iteration={} candidates={} admissible={} move={:?} pair={:?} current={} best={}",
      event.iteration,
      event.candidates,
      event.admissible,
      event.chosen_swap,
      event.chosen_pair,
      event.current_makespan,
      event.best_makespan
    );
  }
}
