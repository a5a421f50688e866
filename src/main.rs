#[macro_use]
extern crate log;

use clap::{App, Arg};
use jobshop::data::{Instance, Task};
use jobshop::encoding::Schedule;
use jobshop::parser::parse_instance;
use jobshop::solver::basic::BasicSolver;
use jobshop::solver::descent::DescentSolver;
use jobshop::solver::greedy::{GreedySolver, Priority};
use jobshop::solver::observer::LogObserver;
use jobshop::solver::random::RandomSolver;
use jobshop::solver::tabu_search::{self, TabuKey, TabuSolver};
use jobshop::solver::Solver;
use std::fs;
use std::time::{Duration, Instant};

fn main() {
  env_logger::init();

  let priorities: Vec<&str> = Priority::ALL.iter().map(|p| p.name()).collect();

  let matches = App::new("jobshop")
    .version("1.0")
    .about("Descent and tabu search for the job shop scheduling problem")
    .arg(
      Arg::with_name("instance")
        .long("instance")
        .help("Instance file name")
        .takes_value(true)
        .required(true),
    )
    .arg(
      Arg::with_name("solver")
        .long("solver")
        .help("Solver to use")
        .possible_values(&["basic", "random", "greedy", "descent", "tabu"])
        .takes_value(true)
        .required(true),
    )
    .arg(
      Arg::with_name("priority")
        .long("priority")
        .help("Priority rule of the greedy solver, also seeds descent and tabu")
        .possible_values(&priorities)
        .takes_value(true)
        .default_value("est_lrpt"),
    )
    .arg(
      Arg::with_name("timeout")
        .long("timeout")
        .help("Timeout (in s) after which to abort the search")
        .takes_value(true)
        .default_value("10"),
    )
    .arg(
      Arg::with_name("seed")
        .long("seed")
        .help("Seed for rng")
        .takes_value(true)
        .default_value("0"),
    )
    .arg(
      Arg::with_name("tenure")
        .long("tenure")
        .help("Number of recent moves that may not be undone")
        .takes_value(true)
        .default_value("8"),
    )
    .arg(
      Arg::with_name("max-iterations")
        .long("max-iterations")
        .help("Iteration budget of the tabu search")
        .takes_value(true)
        .default_value("1000"),
    )
    .arg(
      Arg::with_name("tabu-key")
        .long("tabu-key")
        .help("Identity of forbidden moves")
        .possible_values(&["swap", "pair"])
        .takes_value(true)
        .default_value("swap"),
    )
    .get_matches();

  let solver = matches.value_of("solver").expect("Missing solver");
  let file = matches.value_of("instance").expect("Missing instance file");
  let timeout = Duration::from_secs(
    matches
      .value_of("timeout")
      .and_then(|m| m.parse().ok())
      .expect("Invalid timeout"),
  );
  let seed: u64 = matches
    .value_of("seed")
    .and_then(|m| m.parse().ok())
    .expect("Invalid seed");
  let priority: Priority = matches
    .value_of("priority")
    .expect("Missing priority")
    .parse()
    .expect("Invalid priority");

  let contents = fs::read_to_string(file).expect("Error reading file");
  let instance = parse_instance(&contents).expect("Error parsing file");
  info!(
    "Loaded {} jobs x {} machines, lower bound {}",
    instance.n_jobs,
    instance.n_machines,
    instance.lower_bound()
  );

  let solver: Box<dyn Solver> = match solver {
    "basic" => Box::new(BasicSolver),
    "random" => Box::new(RandomSolver { seed: seed }),
    "greedy" => Box::new(GreedySolver::new(priority)),
    "descent" => Box::new(DescentSolver::new(GreedySolver::new(priority))),
    "tabu" => {
      let tenure: usize = matches
        .value_of("tenure")
        .and_then(|m| m.parse().ok())
        .expect("Invalid tenure");
      let max_iterations: usize = matches
        .value_of("max-iterations")
        .and_then(|m| m.parse().ok())
        .expect("Invalid iteration budget");
      let key: TabuKey = matches
        .value_of("tabu-key")
        .expect("Missing tabu key")
        .parse()
        .expect("Invalid tabu key");
      let config =
        tabu_search::Config::new(tenure, max_iterations, key).expect("Invalid tabu configuration");
      Box::new(TabuSolver::new(GreedySolver::new(priority), config).with_observer(LogObserver))
    }
    _ => panic!("Solver not implemented"),
  };

  let deadline = Instant::now() + timeout;
  let schedule = solver
    .solve(&instance, deadline)
    .expect("Solver did not find a solution");
  schedule.verify().expect("Verification failed");

  println!("{}", schedule.makespan());
  print_schedule(&instance, &schedule);
}

fn print_schedule(inst: &Instance, schedule: &Schedule) {
  for job in 0..inst.n_jobs {
    let starts: Vec<String> = (0..inst.n_tasks)
      .map(|o| schedule.start(Task::new(job, o)).to_string())
      .collect();
    println!("{}", starts.join(" "));
  }
}
