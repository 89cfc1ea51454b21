use std::{path::PathBuf, process::ExitCode, time::Duration};

mod error;
pub mod factor;
pub mod termination;

pub use error::FaktorError;

/// The variable selection heuristic driving the branch step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Occurrence counts weighted towards the shortest clauses.
    #[default]
    Occurrence,
    /// A score table accumulated over the whole search run.
    Activity,
    /// The first literal of the first clause; the baseline.
    FirstLiteral,
}

pub struct Config {
    pub heuristic: Heuristic,
    pub pure_literals: bool,
    pub timeout: Option<Duration>,
    pub save_solutions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            heuristic: Heuristic::default(),
            pure_literals: false,
            timeout: None,
            save_solutions: false,
        }
    }
}

/// Process each instance file independently; a failure on one file is
/// reported and does not abort the batch.
pub fn run(files: &[PathBuf], config: &Config) -> ExitCode {
    let mut failed = false;

    for path in files {
        match factor::process_file(path, config) {
            Ok(factor::Outcome::Factored {
                left,
                right,
                product,
            }) => {
                println!("{}: {} x {} = {}", path.display(), left, right, product);
            }
            Ok(factor::Outcome::Unsatisfiable) => {
                println!("{}: unsatisfiable", path.display());
            }
            Ok(factor::Outcome::Aborted) => {
                println!("{}: aborted before reaching a verdict", path.display());
            }
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
