use tracing::error;

use crate::context::ProviderContext;
use crate::domain::InvocationResponse;
use crate::error::{RemotingError, Result};
use crate::process::{InvocationFilter, InvocationHandler, require_next};

/// Converts any error raised further in into an error response, so the
/// chain always resolves to a response.
pub struct ExceptionProcessFilter;

#[async_trait::async_trait]
impl InvocationFilter for ExceptionProcessFilter {
    fn name(&self) -> &str {
        "exception"
    }

    async fn invoke(
        &self,
        next: Option<&dyn InvocationHandler>,
        context: &mut ProviderContext,
    ) -> Result<InvocationResponse> {
        let next = require_next(next, self.name())?;

        match next.handle(context).await {
            Ok(response) => Ok(response),
            Err(e) => {
                let request = context.request();
                error!(
                    seq = request.seq,
                    service = %request.service_name,
                    method = %request.method_name,
                    error = %e,
                    "Invocation failed"
                );
                let response = match e {
                    RemotingError::Invocation { .. } => {
                        InvocationResponse::service_exception(request.seq, e.to_string())
                    }
                    other => InvocationResponse::exception(request.seq, other.to_string()),
                };
                Ok(response)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{InvocationRequest, MessageType};
    use crate::process::filter::test_support::{FixedHandler, RecordingChannel, context_with};

    fn context() -> ProviderContext {
        context_with(
            InvocationRequest::service(8, "echo", "say", vec![]),
            Arc::new(RecordingChannel::default()),
        )
    }

    #[tokio::test]
    async fn test_business_failure_becomes_service_exception() {
        let next = FixedHandler(|_| {
            Err(RemotingError::Invocation {
                service: "echo".to_string(),
                method: "say".to_string(),
                source: anyhow::anyhow!("boom"),
            })
        });

        let response = ExceptionProcessFilter
            .invoke(Some(&next), &mut context())
            .await
            .unwrap();

        assert_eq!(response.seq, 8);
        assert_eq!(response.message_type, MessageType::ServiceException);
        assert_eq!(response.exception.as_deref(), Some("service echo#say failed: boom"));
    }

    #[tokio::test]
    async fn test_framework_failure_becomes_exception() {
        let next = FixedHandler(|_| Err(RemotingError::ServiceNotFound("echo".to_string())));

        let response = ExceptionProcessFilter
            .invoke(Some(&next), &mut context())
            .await
            .unwrap();

        assert_eq!(response.message_type, MessageType::Exception);
    }

    #[tokio::test]
    async fn test_success_untouched() {
        let next = FixedHandler(|seq| Ok(InvocationResponse::success(seq, "ok".into())));

        let response = ExceptionProcessFilter
            .invoke(Some(&next), &mut context())
            .await
            .unwrap();

        assert_eq!(response, InvocationResponse::success(8, "ok".into()));
    }
}
