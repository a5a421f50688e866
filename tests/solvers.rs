use jobshop::data::{Instance, Task};
use jobshop::encoding::{ResourceOrder, Schedule};
use jobshop::parser::parse_instance;
use jobshop::solver::basic::BasicSolver;
use jobshop::solver::descent::DescentSolver;
use jobshop::solver::greedy::{GreedySolver, Priority};
use jobshop::solver::random::RandomSolver;
use jobshop::solver::tabu_search::{Config, TabuKey, TabuSolver};
use jobshop::solver::Solver;
use std::fs;
use std::time::{Duration, Instant};

fn load(name: &str) -> Instance {
  let path = format!("{}/instances/{}", env!("CARGO_MANIFEST_DIR"), name);
  let contents = fs::read_to_string(&path).expect("Error reading file");
  parse_instance(&contents).expect("Error parsing file")
}

fn deadline() -> Instant {
  Instant::now() + Duration::from_secs(30)
}

/// Machine queues never overlap and jobs keep their order.
fn assert_conflict_free(inst: &Instance, schedule: &Schedule) {
  let order = ResourceOrder::from_schedule(schedule);
  for m in 0..inst.n_machines {
    for pair in order.queue(m).windows(2) {
      assert!(schedule.end(pair[0]) <= schedule.start(pair[1]));
    }
  }
  for j in 0..inst.n_jobs {
    for o in 1..inst.n_tasks {
      assert!(schedule.end(Task::new(j, o - 1)) <= schedule.start(Task::new(j, o)));
    }
  }
}

#[test]
fn test_ft06_shape() {
  let inst = load("ft06");
  assert_eq!(inst.n_jobs, 6);
  assert_eq!(inst.n_machines, 6);
  assert_eq!(inst.n_tasks, 6);
  assert_eq!(inst.duration(Task::new(1, 2)), 10);
  assert_eq!(inst.machine(Task::new(5, 5)), 2);
}

#[test]
fn test_every_solver_is_valid() {
  let inst = load("ft06");
  let config = Config::new(8, 200, TabuKey::Swap).unwrap();
  let solvers: Vec<(&str, Box<dyn Solver>)> = vec![
    ("basic", Box::new(BasicSolver) as Box<dyn Solver>),
    ("random", Box::new(RandomSolver { seed: 7 }) as Box<dyn Solver>),
    ("greedy", Box::new(GreedySolver::new(Priority::EstLrpt)) as Box<dyn Solver>),
    (
      "descent",
      Box::new(DescentSolver::new(GreedySolver::new(Priority::EstLrpt))) as Box<dyn Solver>,
    ),
    (
      "tabu",
      Box::new(TabuSolver::new(
        GreedySolver::new(Priority::EstLrpt),
        config,
      )) as Box<dyn Solver>,
    ),
  ];

  for (name, solver) in solvers {
    let schedule = solver.solve(&inst, deadline()).expect(name);
    schedule.verify().expect(name);
    assert_conflict_free(&inst, &schedule);
    assert!(schedule.makespan() >= inst.lower_bound(), "{}", name);
  }
}

#[test]
fn test_search_never_worse_than_seed() {
  let inst = load("ft06");
  for &priority in Priority::ALL.iter() {
    let seed = GreedySolver::new(priority)
      .solve(&inst, deadline())
      .unwrap()
      .makespan();

    let descent = DescentSolver::new(GreedySolver::new(priority))
      .solve(&inst, deadline())
      .unwrap();
    assert!(descent.makespan() <= seed, "{}", priority);

    for &key in [TabuKey::Swap, TabuKey::Pair].iter() {
      let tabu = TabuSolver::new(
        GreedySolver::new(priority),
        Config::new(5, 100, key).unwrap(),
      )
      .solve(&inst, deadline())
      .unwrap();
      assert!(tabu.is_valid());
      assert!(tabu.makespan() <= seed, "{} {}", priority, key);
    }
  }
}

#[test]
fn test_tabu_finds_optimum_of_tiny_instance() {
  let inst = load("tiny2x2");
  let schedule = TabuSolver::new(
    GreedySolver::new(Priority::Spt),
    Config::new(2, 10, TabuKey::Pair).unwrap(),
  )
  .solve(&inst, deadline())
  .unwrap();

  assert_eq!(schedule.makespan(), 6);
  assert_eq!(
    schedule.critical_path(),
    vec![Task::new(1, 0), Task::new(0, 1)]
  );
}
