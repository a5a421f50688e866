pub mod basic;
pub mod descent;
pub mod greedy;
pub mod nowicki;
pub mod observer;
pub mod random;
pub mod tabu_search;

use crate::data::Instance;
use crate::encoding::Schedule;
use std::time::Instant;

/// Common interface of the construction heuristics and the local searches.
pub trait Solver {
  /// Looks for a schedule until done or until `deadline` has passed.
  /// `None` means no solution was found.
  fn solve<'a>(&self, inst: &'a Instance, deadline: Instant) -> Option<Schedule<'a>>;
}

impl<S: Solver + ?Sized> Solver for Box<S> {
  fn solve<'a>(&self, inst: &'a Instance, deadline: Instant) -> Option<Schedule<'a>> {
    return (**self).solve(inst, deadline);
  }
}
