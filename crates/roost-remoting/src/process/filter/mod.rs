//! Built-in invocation filters

mod business;
mod context_transfer;
mod exception;
mod heartbeat;
mod monitor;
mod write_response;

pub use business::BusinessProcessFilter;
pub use context_transfer::ContextTransferProcessFilter;
pub use exception::ExceptionProcessFilter;
pub use heartbeat::HeartbeatProcessFilter;
pub use monitor::MonitorProcessFilter;
pub use write_response::WriteResponseProcessFilter;
