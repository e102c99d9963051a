//! Registry error types

/// Error type for registry synchronization
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("store error: {0}")]
    Store(String),

    #[error("malformed weight for server {server}: {value:?}")]
    MalformedWeight {
        server: String,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RegistryError {
    /// Whether the registry itself holds invalid data, as opposed to a
    /// transient failure talking to the store.
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, RegistryError::MalformedWeight { .. })
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
