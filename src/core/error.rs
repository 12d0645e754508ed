use thiserror::Error;

/// Failures that keep a scanner component from starting.
///
/// None of these propagate past the mount point: the affected component stays
/// inert and its siblings carry on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScannerError {
    #[error("container has no width; card stream left inert")]
    EmptyContainer,
    #[error("{0} context unavailable")]
    ContextUnavailable(&'static str),
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}
