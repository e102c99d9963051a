//! Per-call provider context and the channel responses are written to

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::{InvocationRequest, InvocationResponse};
use crate::error::Result;

/// Context key holding the caller's address
pub const SOURCE_ADDRESS_KEY: &str = "roost.source.address";

/// Connection back to the caller; owned by the transport.
#[async_trait::async_trait]
pub trait ProviderChannel: Send + Sync {
    fn remote_address(&self) -> String;

    async fn write(&self, response: &InvocationResponse) -> Result<()>;
}

/// State of one inbound call as it travels through the filter chain.
pub struct ProviderContext {
    request: InvocationRequest,
    channel: Arc<dyn ProviderChannel>,
    received_at: Instant,
    /// Caller context visible to the business method
    pub local_context: HashMap<String, String>,
    /// Values the business method sends back with the response
    pub response_context: HashMap<String, String>,
}

impl ProviderContext {
    pub fn new(request: InvocationRequest, channel: Arc<dyn ProviderChannel>) -> Self {
        Self {
            request,
            channel,
            received_at: Instant::now(),
            local_context: HashMap::new(),
            response_context: HashMap::new(),
        }
    }

    pub fn request(&self) -> &InvocationRequest {
        &self.request
    }

    pub fn channel(&self) -> &Arc<dyn ProviderChannel> {
        &self.channel
    }

    pub fn received_at(&self) -> Instant {
        self.received_at
    }

    pub fn elapsed(&self) -> Duration {
        self.received_at.elapsed()
    }
}
