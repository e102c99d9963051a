//! Roost Server - provider runtime
//!
//! Loads configuration, initializes logging, and wires the invocation chains
//! and the registry synchronizer into a [`bootstrap::ProviderRuntime`].

pub mod bootstrap;
pub mod model;
pub mod startup;

pub use bootstrap::ProviderRuntime;
pub use model::Configuration;
