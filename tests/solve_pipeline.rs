//! End-to-end: instance file in, CSV records out.

use evrp_routing::algorithms::{AlgorithmKind, GaConfig, RandomSearchConfig};
use evrp_routing::config::SolverConfig;
use evrp_routing::solver::{run_rng, EvrpSolver, ResultWriter};
use evrp_routing::tour::validate_permutation;

const INSTANCE: &str = "\
StringID   Type       x          y          demand     ReadyTime  DueDate    ServiceTime
D0         d          40.0       50.0       0.0        0.0        1236.0     0.0
S0         f          40.0       50.0       0.0        0.0        1236.0     0.0
S15        f          39.0       26.0       0.0        0.0        1213.0     0.0
S16        f          57.0       72.0       0.0        0.0        1210.0     0.0
C30        c          20.0       55.0       19.0       0.0        1205.0     90.0
C12        c          25.0       85.0       20.0       0.0        1175.0     90.0
C100       c          55.0       85.0       20.0       0.0        1176.0     90.0
C85        c          68.0       60.0       30.0       0.0        1178.0     90.0
C99        c          55.0       80.0       10.0       0.0        1180.0     90.0

Q Vehicle fuel tank capacity /77.75/
C Vehicle load capacity /200.0/
r fuel consumption rate /1.0/
g inverse refueling rate /3.47/
v average Velocity /1.0/
";

fn small_config() -> SolverConfig {
    SolverConfig::default()
        .with_genetic(
            GaConfig::default()
                .with_population_size(20)
                .with_max_generations(20),
        )
        .with_random_search(
            RandomSearchConfig::default()
                .with_generations(5)
                .with_samples_per_generation(20),
        )
}

#[test]
fn solve_every_algorithm_and_log_results() {
    let dir = tempfile::tempdir().expect("tempdir");
    let instance_path = dir.path().join("c101C5.txt");
    std::fs::write(&instance_path, INSTANCE).expect("write instance");

    let solver = EvrpSolver::load(&instance_path)
        .expect("load")
        .with_config(small_config());
    assert_eq!(solver.name(), "c101C5.txt");

    let writer = ResultWriter::open(dir.path().join("results.csv")).expect("open");
    let results = solver.solve_standard(&AlgorithmKind::ALL, 2, Some(17));
    assert_eq!(results.len(), 6);

    for (_, outcome) in &results {
        let result = outcome.as_ref().expect("run succeeds");
        assert!(validate_permutation(solver.problem(), &result.solution_encoded).is_ok());
        // Far below the impossible-route penalty: the instance is feasible.
        assert!(result.distance < 1e6, "distance {}", result.distance);
        writer.write(solver.name(), result).expect("write");
    }

    let text = std::fs::read_to_string(writer.path()).expect("read");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    for line in lines {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[1], "c101C5.txt");
        assert_eq!(fields[4].split(' ').count(), 5);
    }
}

#[test]
fn seeded_genetic_algorithm_keeps_seed_quality() {
    let dir = tempfile::tempdir().expect("tempdir");
    let instance_path = dir.path().join("c101C5.txt");
    std::fs::write(&instance_path, INSTANCE).expect("write instance");

    let solver = EvrpSolver::load(&instance_path)
        .expect("load")
        .with_config(small_config());
    let mut rng = run_rng(Some(4), 0);
    let outcome = solver
        .solve_seeded(AlgorithmKind::RandomSearch, &mut rng)
        .expect("seeded run");

    assert!(outcome.genetic.distance <= outcome.seed.distance + 1e-9);
    assert!(outcome
        .genetic
        .hyperparameters
        .contains(&"seed_solutions=5".to_string()));
}

#[test]
fn unloadable_instances_are_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let instance_path = dir.path().join("c101C5.txt");
    std::fs::write(&instance_path, INSTANCE).expect("write instance");
    let missing = dir.path().join("does-not-exist.txt");

    let solvers = EvrpSolver::load_all(&[missing, instance_path]);
    assert_eq!(solvers.len(), 1);
    assert_eq!(solvers[0].name(), "c101C5.txt");

    let solver = solvers[0].clone().with_config(small_config());
    let results = solver.solve_standard(&[AlgorithmKind::Neh], 1, Some(2));
    assert!(results.iter().all(|(_, r)| r.is_ok()));
}
