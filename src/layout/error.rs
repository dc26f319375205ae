use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// Integrity failures while merging producer outputs. Any of these means
    /// the partitioning upstream is broken; none is recoverable.
    #[error("node `{0}` received no position")]
    MissingPosition(String),
    #[error("node `{0}` received more than one position")]
    DuplicatePosition(String),
    #[error("position produced for unknown node `{0}`")]
    UnknownNode(String),
    #[error("invalid scatter distribution: {0}")]
    InvalidScatter(String),
}
