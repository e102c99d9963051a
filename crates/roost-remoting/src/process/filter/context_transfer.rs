use crate::context::{ProviderContext, SOURCE_ADDRESS_KEY};
use crate::domain::InvocationResponse;
use crate::error::Result;
use crate::process::{InvocationFilter, InvocationHandler, require_next};

/// Moves caller context into the provider context before the call and
/// attaches the response context to the result.
pub struct ContextTransferProcessFilter;

#[async_trait::async_trait]
impl InvocationFilter for ContextTransferProcessFilter {
    fn name(&self) -> &str {
        "context-transfer"
    }

    async fn invoke(
        &self,
        next: Option<&dyn InvocationHandler>,
        context: &mut ProviderContext,
    ) -> Result<InvocationResponse> {
        let next = require_next(next, self.name())?;

        let propagated = context.request().context.clone();
        let remote = context.channel().remote_address();
        context.local_context.extend(propagated);
        context
            .local_context
            .insert(SOURCE_ADDRESS_KEY.to_string(), remote);

        let mut response = next.handle(context).await?;
        response.context.extend(context.response_context.drain());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::InvocationRequest;
    use crate::process::filter::test_support::{RecordingChannel, context_with};

    /// Echoes a local context value into the response context.
    struct EchoTrace;

    #[async_trait::async_trait]
    impl InvocationHandler for EchoTrace {
        async fn handle(&self, context: &mut ProviderContext) -> Result<InvocationResponse> {
            let trace = context.local_context.get("trace-id").cloned().unwrap_or_default();
            context.response_context.insert("echo".to_string(), trace);
            Ok(InvocationResponse::success(context.request().seq, "ok".into()))
        }
    }

    #[tokio::test]
    async fn test_transfers_both_ways() {
        let channel = Arc::new(RecordingChannel::default());
        let request =
            InvocationRequest::service(5, "echo", "say", vec![]).with_context("trace-id", "t-1");
        let mut context = context_with(request, channel);

        let response = ContextTransferProcessFilter
            .invoke(Some(&EchoTrace), &mut context)
            .await
            .unwrap();

        assert_eq!(response.context.get("echo").map(String::as_str), Some("t-1"));
        assert_eq!(
            context.local_context.get(SOURCE_ADDRESS_KEY).map(String::as_str),
            Some("10.0.0.1:51000")
        );
        assert!(context.response_context.is_empty());
    }
}
