//! Roost Remoting - provider-side request processing
//!
//! An inbound call is turned into a response by an ordered chain of
//! invocation filters. Two chains are built once at startup:
//! - business: monitor (optional) -> write-response -> context-transfer -> exception -> business
//! - heartbeat: write-response -> heartbeat
//!
//! `ProviderProcessHandlerFactory` owns both chains and selects one per call
//! by message type.

pub mod context;
pub mod domain;
pub mod error;
pub mod process;
pub mod service;

pub use context::{ProviderChannel, ProviderContext};
pub use domain::{CallType, InvocationRequest, InvocationResponse, MessageType};
pub use error::{RemotingError, Result};
pub use process::factory::{ProcessConfig, ProviderProcessHandlerFactory};
pub use process::{InvocationFilter, InvocationHandler, build_invocation_handler};
pub use service::{ServiceInvoker, ServiceRegistry};
