use tracing::{debug, error};

use crate::context::ProviderContext;
use crate::domain::InvocationResponse;
use crate::error::Result;
use crate::process::{InvocationFilter, InvocationHandler, require_next};

/// Writes the response produced further in back to the caller for two-way
/// calls. A failed write is logged; the response is still returned.
pub struct WriteResponseProcessFilter;

#[async_trait::async_trait]
impl InvocationFilter for WriteResponseProcessFilter {
    fn name(&self) -> &str {
        "write-response"
    }

    async fn invoke(
        &self,
        next: Option<&dyn InvocationHandler>,
        context: &mut ProviderContext,
    ) -> Result<InvocationResponse> {
        let next = require_next(next, self.name())?;
        let response = next.handle(context).await?;

        if !context.request().is_two_way() {
            debug!(seq = response.seq, "One-way call, response not written");
            return Ok(response);
        }

        if let Err(e) = context.channel().write(&response).await {
            error!(
                seq = response.seq,
                remote = %context.channel().remote_address(),
                error = %e,
                "Failed to write response"
            );
        }
        Ok(response)
    }
}
