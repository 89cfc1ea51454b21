use std::{collections::HashMap, fs, path::PathBuf};

use num_bigint::BigUint;

use faktor::{
    factor::{int_from_bits, process_file, solve_instance, Outcome, Verdict},
    Config, Heuristic,
};
use faktor_core::lit::Var;

/// A 2-bit by 2-bit multiplier circuit in Tseitin form.
///
/// Variables: factor a = (2, 1), factor b = (4, 3); partial products
/// 5 = 1&3, 6 = 1&4, 7 = 2&3, 8 = 2&4; sum bit 9 = 6^7 with carry 10 = 6&7;
/// sum bit 11 = 8^10 with carry 12 = 8&10. The product reads (12, 11, 9, 5).
const CIRCUIT: &str = "\
c product bits of the output: [12, 11, 9, 5]
c bits of the first input factor: [2, 1]
c bits of the second input factor: [4, 3]
-5 1 0
-5 3 0
5 -1 -3 0
-6 1 0
-6 4 0
6 -1 -4 0
-7 2 0
-7 3 0
7 -2 -3 0
-8 2 0
-8 4 0
8 -2 -4 0
-10 6 0
-10 7 0
10 -6 -7 0
-12 8 0
-12 10 0
12 -8 -10 0
-9 6 7 0
-9 -6 -7 0
9 6 -7 0
9 -6 7 0
-11 8 10 0
-11 -8 -10 0
11 8 -10 0
11 -8 10 0
";

/// The circuit with its output pinned to 6 (binary 0110).
fn product_six() -> String {
    format!("{CIRCUIT}-12 0\n11 0\n9 0\n-5 0\n")
}

/// The circuit with its output pinned to 7, which no pair of 2-bit factors
/// produces.
fn product_seven() -> String {
    format!("{CIRCUIT}-12 0\n11 0\n9 0\n5 0\n")
}

fn var(id: u32) -> Var {
    Var::try_from(id).unwrap()
}

fn bit_vars(ids: &[u32]) -> Vec<Var> {
    ids.iter().map(|&id| var(id)).collect()
}

fn extract_factors(config: &Config) -> (BigUint, BigUint, BigUint) {
    let instance = faktor_cnf::parse_instance(product_six().as_bytes()).expect("valid instance");

    let assignment = match solve_instance(&instance, config).expect("search runs") {
        Verdict::Assignment(assignment) => assignment,
        _ => panic!("the instance is satisfiable"),
    };

    let left = int_from_bits(&assignment, &bit_vars(&instance.first_input_bits)).unwrap();
    let right = int_from_bits(&assignment, &bit_vars(&instance.second_input_bits)).unwrap();
    let product = int_from_bits(&assignment, &bit_vars(&instance.output_bits)).unwrap();

    (left, right, product)
}

#[test]
fn factors_six_with_the_default_heuristic() {
    let (left, right, product) = extract_factors(&Config::default());

    assert_eq!(BigUint::from(6u8), product);
    assert_eq!(BigUint::from(6u8), left * right);
}

#[test]
fn every_heuristic_agrees_on_the_product() {
    for heuristic in [
        Heuristic::Occurrence,
        Heuristic::Activity,
        Heuristic::FirstLiteral,
    ] {
        let config = Config {
            heuristic,
            ..Config::default()
        };

        let (left, right, product) = extract_factors(&config);

        assert_eq!(BigUint::from(6u8), product);
        assert_eq!(BigUint::from(6u8), left * right);
    }
}

#[test]
fn pure_literal_elimination_does_not_change_the_verdict() {
    let config = Config {
        pure_literals: true,
        ..Config::default()
    };

    let (left, right, product) = extract_factors(&config);

    assert_eq!(BigUint::from(6u8), product);
    assert_eq!(BigUint::from(6u8), left * right);
}

#[test]
fn impossible_product_is_unsatisfiable() {
    let instance = faktor_cnf::parse_instance(product_seven().as_bytes()).expect("valid instance");

    let verdict = solve_instance(&instance, &Config::default()).expect("search runs");

    assert!(matches!(verdict, Verdict::Unsatisfiable));
}

#[test]
fn search_results_are_deterministic() {
    let instance = faktor_cnf::parse_instance(product_six().as_bytes()).expect("valid instance");
    let config = Config::default();

    let solve = || match solve_instance(&instance, &config).expect("search runs") {
        Verdict::Assignment(assignment) => {
            let mut pairs: Vec<(u32, bool)> = assignment
                .into_iter()
                .map(|(var, value)| (var.id(), value))
                .collect();
            pairs.sort_unstable();
            pairs
        }
        _ => panic!("the instance is satisfiable"),
    };

    assert_eq!(solve(), solve());
}

#[test]
fn recorded_solution_is_loaded_instead_of_searching() {
    let dir = std::env::temp_dir().join(format!("faktor-it-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let path: PathBuf = dir.join("six.cnf");
    fs::write(&path, product_six()).unwrap();
    // a = 3, b = 2: recorded by an earlier run.
    fs::write(
        dir.join("six.sol"),
        "SAT\n1 2 -3 4 -5 6 -7 8 9 -10 11 -12 0\n",
    )
    .unwrap();

    match process_file(&path, &Config::default()).expect("instance and solution are readable") {
        Outcome::Factored {
            left,
            right,
            product,
        } => {
            assert_eq!(BigUint::from(3u8), left);
            assert_eq!(BigUint::from(2u8), right);
            assert_eq!(BigUint::from(6u8), product);
        }
        _ => panic!("the recorded solution asserts satisfiability"),
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn saved_verdicts_are_reused() {
    let dir = std::env::temp_dir().join(format!("faktor-save-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let path: PathBuf = dir.join("seven.cnf");
    fs::write(&path, product_seven()).unwrap();

    let config = Config {
        save_solutions: true,
        ..Config::default()
    };

    assert!(matches!(
        process_file(&path, &config).unwrap(),
        Outcome::Unsatisfiable
    ));
    assert_eq!("UNSAT\n", fs::read_to_string(dir.join("seven.sol")).unwrap());

    // The second pass must take the recorded verdict.
    assert!(matches!(
        process_file(&path, &config).unwrap(),
        Outcome::Unsatisfiable
    ));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn a_failing_file_does_not_abort_the_batch() {
    let dir = std::env::temp_dir().join(format!("faktor-batch-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let broken: PathBuf = dir.join("broken.cnf");
    fs::write(&broken, "1 -2\n").unwrap();
    let good: PathBuf = dir.join("six.cnf");
    fs::write(&good, product_six()).unwrap();

    let config = Config {
        save_solutions: true,
        ..Config::default()
    };

    let code = faktor::run(&[broken, good], &config);

    // The broken file fails the batch, but the good one behind it is still
    // processed and gets its verdict recorded.
    assert_eq!(
        format!("{:?}", std::process::ExitCode::FAILURE),
        format!("{code:?}")
    );
    assert!(fs::read_to_string(dir.join("six.sol"))
        .unwrap()
        .starts_with("SAT"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn aborted_runs_are_not_persisted() {
    let dir = std::env::temp_dir().join(format!("faktor-abort-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let path: PathBuf = dir.join("six.cnf");
    fs::write(&path, product_six()).unwrap();

    let config = Config {
        timeout: Some(std::time::Duration::ZERO),
        save_solutions: true,
        ..Config::default()
    };

    assert!(matches!(
        process_file(&path, &config).unwrap(),
        Outcome::Aborted
    ));
    assert!(!dir.join("six.sol").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn assignment_from_a_mismatched_solution_faults() {
    let instance = faktor_cnf::parse_instance(product_six().as_bytes()).expect("valid instance");

    // An assignment that never mentions the input bits.
    let assignment = HashMap::from([(var(9), true)]);

    let err = int_from_bits(&assignment, &bit_vars(&instance.first_input_bits))
        .expect_err("input bits are unassigned");

    assert!(matches!(err, faktor::FaktorError::MissingAssignment(2)));
}
