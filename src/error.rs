use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaktorError {
    #[error("error reading file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse instance")]
    Parse(#[from] faktor_cnf::CnfParseError),

    #[error(transparent)]
    InvalidVar(#[from] faktor_core::lit::InvalidVarId),

    /// A bit position named by the instance has no value in the assignment.
    /// This means the instance and the solution do not belong together.
    #[error("variable {0} has no recorded assignment")]
    MissingAssignment(u32),
}
