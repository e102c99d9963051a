use std::sync::Arc;

use crate::context::ProviderContext;
use crate::domain::InvocationResponse;
use crate::error::{RemotingError, Result};
use crate::process::{InvocationFilter, InvocationHandler};
use crate::service::ServiceRegistry;

/// Terminal filter of the business chain: dispatches to the published
/// service. Ignores `next`.
pub struct BusinessProcessFilter {
    services: Arc<ServiceRegistry>,
}

impl BusinessProcessFilter {
    pub fn new(services: Arc<ServiceRegistry>) -> Self {
        Self { services }
    }
}

#[async_trait::async_trait]
impl InvocationFilter for BusinessProcessFilter {
    fn name(&self) -> &str {
        "business"
    }

    async fn invoke(
        &self,
        _next: Option<&dyn InvocationHandler>,
        context: &mut ProviderContext,
    ) -> Result<InvocationResponse> {
        let request = context.request();
        let seq = request.seq;
        let service = request.service_name.clone();
        let method = request.method_name.clone();

        let invoker = self
            .services
            .get(&service)
            .ok_or_else(|| RemotingError::ServiceNotFound(service.clone()))?;

        let value = invoker
            .invoke(context)
            .await
            .map_err(|source| RemotingError::Invocation {
                service,
                method,
                source,
            })?;

        Ok(InvocationResponse::success(seq, value))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::InvocationRequest;
    use crate::process::filter::test_support::{RecordingChannel, context_with};
    use crate::service::ServiceInvoker;

    struct Upper;

    #[async_trait::async_trait]
    impl ServiceInvoker for Upper {
        async fn invoke(&self, context: &mut ProviderContext) -> anyhow::Result<Value> {
            match context.request().parameters.first().and_then(Value::as_str) {
                Some(s) => Ok(json!(s.to_uppercase())),
                None => anyhow::bail!("missing argument"),
            }
        }
    }

    fn filter() -> BusinessProcessFilter {
        let services = Arc::new(ServiceRegistry::new());
        services.register("upper", Arc::new(Upper));
        BusinessProcessFilter::new(services)
    }

    fn context(service: &str, parameters: Vec<Value>) -> ProviderContext {
        context_with(
            InvocationRequest::service(11, service, "apply", parameters),
            Arc::new(RecordingChannel::default()),
        )
    }

    #[tokio::test]
    async fn test_dispatches_to_service() {
        let response = filter()
            .invoke(None, &mut context("upper", vec![json!("abc")]))
            .await
            .unwrap();

        assert_eq!(response, InvocationResponse::success(11, json!("ABC")));
    }

    #[tokio::test]
    async fn test_unknown_service() {
        let err = filter()
            .invoke(None, &mut context("lower", vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, RemotingError::ServiceNotFound(ref s) if s == "lower"));
    }

    #[tokio::test]
    async fn test_service_failure() {
        let err = filter()
            .invoke(None, &mut context("upper", vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, RemotingError::Invocation { ref method, .. } if method == "apply"));
    }
}
