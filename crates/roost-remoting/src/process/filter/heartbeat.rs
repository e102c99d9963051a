use tracing::debug;

use crate::context::ProviderContext;
use crate::domain::InvocationResponse;
use crate::error::Result;
use crate::process::{InvocationFilter, InvocationHandler};

/// Terminal filter of the heartbeat chain.
pub struct HeartbeatProcessFilter;

#[async_trait::async_trait]
impl InvocationFilter for HeartbeatProcessFilter {
    fn name(&self) -> &str {
        "heartbeat"
    }

    async fn invoke(
        &self,
        _next: Option<&dyn InvocationHandler>,
        context: &mut ProviderContext,
    ) -> Result<InvocationResponse> {
        let seq = context.request().seq;
        debug!(seq, remote = %context.channel().remote_address(), "Heartbeat received");
        Ok(InvocationResponse::heartbeat(seq))
    }
}
