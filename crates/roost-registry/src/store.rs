//! Coordination store access
//!
//! The store client's wire protocol and session handling live behind this
//! trait. Every call may fail; failures propagate to the caller.

use crate::error::Result;

#[async_trait::async_trait]
pub trait StoreAccessor: Send + Sync {
    /// Read the value stored at `path`, `None` if the node is absent or empty.
    async fn get(&self, path: &str) -> Result<Option<String>>;

    /// Whether a node exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Arm a one-shot watch on the node at `path`, whether or not it exists yet.
    async fn watch(&self, path: &str) -> Result<()>;

    /// Arm a one-shot watch on the children of `path`.
    async fn watch_children(&self, path: &str) -> Result<()>;

    /// Names of the direct children of `path`.
    async fn children(&self, path: &str) -> Result<Vec<String>>;
}
