use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    #[error("Invalid minimum degree {0}: must be at least 2")]
    InvalidDegree(usize),

    #[error("B-tree invariant violated: {0}")]
    InvariantViolated(String),
}
