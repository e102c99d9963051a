//! Roost Registry - keeps a local view of service endpoints in sync with a
//! hierarchical coordination store
//!
//! This crate provides:
//! - `PathClassifier`: parses store paths into typed descriptors
//! - `ChangeDecisionPolicy`: decides whether a change matters to the local routing group
//! - `RegistrySynchronizer`: reacts to watch notifications, re-arms watches, and
//!   forwards accepted changes to a `ServiceChangeListener`
//! - Collaborator traits for the store, group configuration, and address resolution
//! - `RoutingTableListener` and `MemoryStore` default implementations
//!
//! # Known limitation
//!
//! Store watches are one-shot. The synchronizer re-arms them before returning
//! from each event, but a change landing between the firing and the re-arm is
//! only observed if the store reports it on the new watch. Watch survival
//! across a store session expiry is the store client's guarantee.

pub mod error;
pub mod event;
pub mod group;
pub mod host;
pub mod listener;
pub mod memory;
pub mod path;
pub mod policy;
pub mod resolver;
pub mod store;
pub mod synchronizer;

pub use error::{RegistryError, Result};
pub use event::{WatchEvent, WatchEventKind};
pub use group::{GroupConfigAccessor, StaticGroup};
pub use host::{ServiceHost, parse_host_list};
pub use listener::{RoutingTableListener, ServiceChangeListener};
pub use memory::MemoryStore;
pub use path::{PathClassifier, PathDescriptor, PathKind};
pub use policy::{ChangeDecisionPolicy, GroupDecision};
pub use resolver::{AddressResolver, StoreAddressResolver};
pub use store::StoreAccessor;
pub use synchronizer::RegistrySynchronizer;
