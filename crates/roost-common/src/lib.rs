//! Roost Common - Shared types and helpers
//!
//! This crate provides the foundational pieces used across all Roost components:
//! - Error type for invalid shared configuration
//! - Routing group normalization and service name escaping
//! - The registry path layout of the coordination store

pub mod error;
pub mod naming;
pub mod paths;

// Re-exports for convenience
pub use error::{Result, RoostError};
pub use naming::{escape_service_name, normalize_group, unescape_service_name};
pub use paths::RegistryPaths;

/// Separator between path segments in the coordination store
pub const PATH_SEPARATOR: char = '/';

/// Separator between service name and group in ephemeral container names
pub const GROUP_SEPARATOR: char = '@';

/// Replacement for `/` inside escaped service names
pub const SERVICE_NAME_ESCAPE: char = '^';

/// The canonical "no group" value
pub const DEFAULT_GROUP: &str = "";
