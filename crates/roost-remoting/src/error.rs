//! Remoting error types

/// Error type for provider-side request processing
#[derive(Debug, thiserror::Error)]
pub enum RemotingError {
    #[error("invocation chain is not initialized")]
    ChainNotInitialized,

    #[error("invocation chain already initialized, clear filters before rebuilding")]
    ChainAlreadyInitialized,

    #[error("invalid invocation chain: {0}")]
    InvalidChain(String),

    #[error("filter '{0}' has no next handler")]
    MissingNextHandler(String),

    #[error("service not found: {0}")]
    ServiceNotFound(String),

    #[error("service {service}#{method} failed: {source}")]
    Invocation {
        service: String,
        method: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("channel error: {0}")]
    Channel(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RemotingError>;
