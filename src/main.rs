use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::{Parser, ValueEnum};
use faktor::{Config, Heuristic};

/// Factor integers encoded as multiplier circuits in CNF.
#[derive(Parser)]
struct Cli {
    /// The CNF files with the multiplier instances.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// The timeout per instance in seconds.
    #[arg(short, long)]
    timeout: Option<u64>,

    /// The variable selection heuristic used for branching.
    #[arg(long, value_enum, default_value = "occurrence")]
    heuristic: HeuristicArg,

    /// Run pure literal elimination in addition to unit propagation.
    #[arg(long)]
    pure_literals: bool,

    /// Record each verdict in a .sol file next to its instance.
    #[arg(long)]
    save_solutions: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum HeuristicArg {
    Occurrence,
    Activity,
    First,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config {
        heuristic: match cli.heuristic {
            HeuristicArg::Occurrence => Heuristic::Occurrence,
            HeuristicArg::Activity => Heuristic::Activity,
            HeuristicArg::First => Heuristic::FirstLiteral,
        },
        pure_literals: cli.pure_literals,
        timeout: cli.timeout.map(Duration::from_secs),
        save_solutions: cli.save_solutions,
    };

    faktor::run(&cli.files, &config)
}
