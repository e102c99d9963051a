//! Error types for shared Roost configuration

/// Errors raised while validating shared configuration values
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RoostError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("invalid registry path prefix '{prefix}': {reason}")]
    InvalidPathPrefix { prefix: String, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, RoostError>;
