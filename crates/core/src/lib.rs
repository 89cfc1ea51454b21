pub mod brancher;
pub mod clause;
pub mod formula;
pub mod lit;
pub mod solver;
pub mod termination;

pub type DefaultSolver = solver::Solver<brancher::OccurrenceBrancher>;
