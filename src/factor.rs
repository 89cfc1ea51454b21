//! The factoring pipeline: obtain an assignment for a multiplier instance,
//! either from a recorded solution file or by running the search, and read
//! the two factors and the product out of the annotated bit positions.

use std::{collections::HashMap, fs::File, path::Path};

use log::{debug, info};
use num_bigint::BigUint;

use faktor_cnf::Instance;
use faktor_core::{
    brancher::{ActivityBrancher, Brancher, FirstLitBrancher, OccurrenceBrancher},
    clause::Clause,
    lit::{Lit, Var},
    solver::{SolveResult, Solver},
    termination::{Terminator, TimeBudget},
};

use crate::{
    termination::{OrTerminator, SignalTerminator},
    Config, FaktorError, Heuristic,
};

/// What the driver reports for one instance file.
pub enum Outcome {
    Factored {
        left: BigUint,
        right: BigUint,
        product: BigUint,
    },
    Unsatisfiable,
    Aborted,
}

/// How an assignment was (not) obtained, before bit extraction.
pub enum Verdict {
    Assignment(HashMap<Var, bool>),
    Unsatisfiable,
    Aborted,
}

/// Process a single instance file. A sibling `.sol` file, when present, is
/// loaded instead of re-running the search.
pub fn process_file(path: &Path, config: &Config) -> Result<Outcome, FaktorError> {
    let instance = faktor_cnf::parse_instance(File::open(path)?)?;

    let verdict = match load_recorded(path)? {
        Some(verdict) => verdict,
        None => {
            let verdict = solve_instance(&instance, config)?;
            if config.save_solutions {
                persist(path, &verdict)?;
            }
            verdict
        }
    };

    match verdict {
        Verdict::Assignment(assignment) => {
            let left = int_from_bits(&assignment, &bit_vars(&instance.first_input_bits)?)?;
            let right = int_from_bits(&assignment, &bit_vars(&instance.second_input_bits)?)?;
            let product = int_from_bits(&assignment, &bit_vars(&instance.output_bits)?)?;

            Ok(Outcome::Factored {
                left,
                right,
                product,
            })
        }
        Verdict::Unsatisfiable => Ok(Outcome::Unsatisfiable),
        Verdict::Aborted => Ok(Outcome::Aborted),
    }
}

/// Run the search engine on a parsed instance with the configured heuristic,
/// pure-literal toggle and time budget.
pub fn solve_instance(instance: &Instance, config: &Config) -> Result<Verdict, FaktorError> {
    let clauses = build_clauses(instance)?;

    let budget = match config.timeout {
        Some(duration) => TimeBudget::within(duration),
        None => TimeBudget::unbounded(),
    };
    let terminator = OrTerminator(budget, SignalTerminator::register());

    Ok(match config.heuristic {
        Heuristic::Occurrence => search(clauses, OccurrenceBrancher, config, terminator),
        Heuristic::Activity => search(clauses, ActivityBrancher::default(), config, terminator),
        Heuristic::FirstLiteral => search(clauses, FirstLitBrancher, config, terminator),
    })
}

fn search(
    clauses: Vec<Clause>,
    brancher: impl Brancher,
    config: &Config,
    terminator: impl Terminator,
) -> Verdict {
    let mut solver = Solver::new(clauses, brancher).with_pure_literals(config.pure_literals);

    match solver.solve(terminator) {
        SolveResult::Satisfiable(solution) => Verdict::Assignment(solution.assignment_map()),
        SolveResult::Unsatisfiable => Verdict::Unsatisfiable,
        SolveResult::Unknown => Verdict::Aborted,
    }
}

fn build_clauses(instance: &Instance) -> Result<Vec<Clause>, FaktorError> {
    instance
        .clauses
        .iter()
        .map(|codes| {
            let mut clause = Clause::new();
            for &code in codes {
                let var = Var::try_from(code.unsigned_abs().get())?;
                clause.insert(Lit::new(var, code.get() > 0));
            }
            Ok(clause)
        })
        .collect()
}

fn bit_vars(ids: &[u32]) -> Result<Vec<Var>, FaktorError> {
    ids.iter().map(|&id| Ok(Var::try_from(id)?)).collect()
}

/// Interpret a bit vector (most significant first) under an assignment. A
/// listed variable with no assigned value is an instance/solution mismatch
/// and surfaces as a fault.
pub fn int_from_bits(
    assignment: &HashMap<Var, bool>,
    bits: &[Var],
) -> Result<BigUint, FaktorError> {
    let mut num = BigUint::from(0u8);

    for &var in bits {
        let bit = assignment
            .get(&var)
            .copied()
            .ok_or(FaktorError::MissingAssignment(var.id()))?;

        num <<= 1u8;
        if bit {
            num += 1u8;
        }
    }

    Ok(num)
}

fn load_recorded(path: &Path) -> Result<Option<Verdict>, FaktorError> {
    let solution_path = path.with_extension("sol");
    if !solution_path.exists() {
        return Ok(None);
    }

    info!("loading recorded solution {}", solution_path.display());

    match faktor_cnf::parse_solution(File::open(&solution_path)?)? {
        Some(pairs) => {
            let mut assignment = HashMap::with_capacity(pairs.len());
            for (id, value) in pairs {
                assignment.insert(Var::try_from(id)?, value);
            }
            Ok(Some(Verdict::Assignment(assignment)))
        }
        None => Ok(Some(Verdict::Unsatisfiable)),
    }
}

/// Write the verdict to the sibling `.sol` file. An aborted search carries no
/// information worth recording.
fn persist(path: &Path, verdict: &Verdict) -> Result<(), FaktorError> {
    let solution_path = path.with_extension("sol");

    match verdict {
        Verdict::Assignment(assignment) => {
            let mut pairs: Vec<(u32, bool)> = assignment
                .iter()
                .map(|(&var, &value)| (var.id(), value))
                .collect();
            pairs.sort_unstable();

            debug!("recording solution to {}", solution_path.display());
            faktor_cnf::write_solution(&mut File::create(&solution_path)?, Some(&pairs))?;
        }
        Verdict::Unsatisfiable => {
            debug!("recording unsatisfiability to {}", solution_path.display());
            faktor_cnf::write_solution(&mut File::create(&solution_path)?, None)?;
        }
        Verdict::Aborted => {}
    }

    Ok(())
}
