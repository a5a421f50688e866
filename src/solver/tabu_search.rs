use crate::data::Instance;
use crate::encoding::{ResourceOrder, Schedule};
use crate::solver::nowicki::{self, Neighbor, PairTask, Swap};
use crate::solver::observer::{IterationEvent, SearchObserver};
use crate::solver::Solver;
use log::{debug, info, trace, warn};
use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Identity under which applied moves are remembered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabuKey {
  /// Machine and queue positions. Forgotten as soon as positions shift.
  Swap,
  /// The two exchanged tasks, wherever they end up in the queue.
  Pair,
}

impl TabuKey {
  fn move_of(&self, neighbor: &Neighbor) -> TabuMove {
    match self {
      TabuKey::Swap => TabuMove::Swap(neighbor.swap),
      TabuKey::Pair => TabuMove::Pair(neighbor.pair),
    }
  }
}

impl fmt::Display for TabuKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TabuKey::Swap => f.write_str("swap"),
      TabuKey::Pair => f.write_str("pair"),
    }
  }
}

impl FromStr for TabuKey {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "swap" => Ok(TabuKey::Swap),
      "pair" => Ok(TabuKey::Pair),
      _ => Err(format!("Unknown tabu key '{}'", s)),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabuMove {
  Swap(Swap),
  Pair(PairTask),
}

impl TabuMove {
  pub fn inverse(&self) -> TabuMove {
    match self {
      TabuMove::Swap(swap) => TabuMove::Swap(swap.inverse()),
      TabuMove::Pair(pair) => TabuMove::Pair(pair.inverse()),
    }
  }
}

/// Bounded FIFO of forbidden moves.
#[derive(Debug, Clone)]
pub struct TabuList<K> {
  tenure: usize,
  entries: VecDeque<K>,
}

impl<K: PartialEq> TabuList<K> {
  pub fn new(tenure: usize) -> Self {
    Self {
      tenure: tenure,
      entries: VecDeque::with_capacity(tenure),
    }
  }

  /// Records `entry`, dropping the oldest one once the tenure is reached.
  pub fn push(&mut self, entry: K) {
    if self.entries.len() >= self.tenure {
      self.entries.pop_front();
    }
    self.entries.push_back(entry);
  }

  pub fn contains(&self, entry: &K) -> bool {
    return self.entries.contains(entry);
  }

  pub fn len(&self) -> usize {
    return self.entries.len();
  }

  pub fn is_empty(&self) -> bool {
    return self.entries.is_empty();
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
  tenure: usize,
  max_iterations: usize,
  key: TabuKey,
}

impl Config {
  pub fn new(tenure: usize, max_iterations: usize, key: TabuKey) -> Result<Config, Box<dyn Error>> {
    if tenure == 0 {
      Err("Tabu tenure must be at least 1")?;
    }
    if max_iterations == 0 {
      Err("Tabu search needs at least one iteration")?;
    }

    Ok(Config {
      tenure: tenure,
      max_iterations: max_iterations,
      key: key,
    })
  }

  pub fn tenure(&self) -> usize {
    return self.tenure;
  }

  pub fn max_iterations(&self) -> usize {
    return self.max_iterations;
  }

  pub fn key(&self) -> TabuKey {
    return self.key;
  }
}

/// Tabu search over the Nowicki neighborhood, started from the schedule of
/// a seed solver.
///
/// Every round moves to the best neighbor whose move is not tabu, even when
/// it is worse than the current schedule, and forbids undoing it for the
/// next `tenure` moves. The search stops at the iteration budget or at the
/// deadline, whichever comes first.
pub struct TabuSolver<S> {
  base: S,
  config: Config,
  observer: Option<Box<dyn SearchObserver>>,
}

impl<S: Solver> TabuSolver<S> {
  pub fn new(base: S, config: Config) -> Self {
    Self {
      base: base,
      config: config,
      observer: None,
    }
  }

  pub fn with_observer<O: SearchObserver + 'static>(mut self, observer: O) -> Self {
    self.observer = Some(Box::new(observer));
    self
  }
}

impl<S: Solver> Solver for TabuSolver<S> {
  fn solve<'a>(&self, inst: &'a Instance, deadline: Instant) -> Option<Schedule<'a>> {
    let seed = self.base.solve(inst, deadline)?;
    let mut current = ResourceOrder::from_schedule(&seed);
    let mut current_makespan = seed.makespan();
    let mut best = seed;
    let mut tabu = TabuList::new(self.config.tenure);

    trace!("Starting with {}", current_makespan);
    let mut iteration = 0;
    while iteration < self.config.max_iterations && Instant::now() < deadline {
      let neighbors = nowicki::generate_neighbors(&current);
      let candidates = neighbors.len();
      if candidates == 0 {
        warn!("Generated neighborhood is empty ({})", iteration);
      }

      let mut admissible = 0;
      let mut chosen: Option<(Neighbor<'a>, TabuMove, Schedule<'a>)> = None;
      for neighbor in neighbors {
        let candidate_move = self.config.key.move_of(&neighbor);
        if tabu.contains(&candidate_move) {
          trace!("Skipping move {:?} because it is tabu", candidate_move);
          continue;
        }

        let schedule = match neighbor.order.to_schedule() {
          Some(schedule) if schedule.is_valid() => schedule,
          _ => {
            trace!("Discarding move {:?}", candidate_move);
            continue;
          }
        };
        admissible += 1;

        let is_better = chosen
          .as_ref()
          .map_or(true, |(_, _, s)| schedule.makespan() < s.makespan());
        if is_better {
          chosen = Some((neighbor, candidate_move, schedule));
        }
      }

      let mut chosen_swap = None;
      let mut chosen_pair = None;
      if let Some((neighbor, applied, schedule)) = chosen {
        tabu.push(applied.inverse());
        chosen_swap = Some(neighbor.swap);
        chosen_pair = Some(neighbor.pair);
        current = neighbor.order;
        current_makespan = schedule.makespan();
        trace!(
          "Found move {:?} to {} ({})",
          applied,
          current_makespan,
          iteration
        );

        if current_makespan < best.makespan() {
          best = schedule;
          debug!("Improved best to {} ({})", best.makespan(), iteration);
        }
      } else {
        debug!(
          "No admissible move, staying at {} ({})",
          current_makespan, iteration
        );
      }

      if let Some(observer) = &self.observer {
        observer.on_iteration(&IterationEvent {
          iteration: iteration,
          candidates: candidates,
          admissible: admissible,
          chosen_swap: chosen_swap,
          chosen_pair: chosen_pair,
          current_makespan: current_makespan,
          best_makespan: best.makespan(),
        });
      }

      iteration += 1;
    }

    if iteration >= self.config.max_iterations {
      info!(
        "Stopping after {} iterations at {}",
        iteration,
        best.makespan()
      );
    } else {
      info!(
        "Stopping due to timeout at {} ({})",
        best.makespan(),
        iteration
      );
    }

    return Some(best);
  }
}
