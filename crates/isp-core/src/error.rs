use thiserror::Error;

/// Workspace-level error, the common target of every crate's error type.
pub type IspResult<T> = Result<T, IspError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IspError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Configuration error: {what}")]
    Config { what: String },

    #[error("Numeric domain error: {what}")]
    Domain { what: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
