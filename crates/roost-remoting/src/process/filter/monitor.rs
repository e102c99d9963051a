use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{Instrument, info_span};

use crate::context::ProviderContext;
use crate::domain::InvocationResponse;
use crate::error::Result;
use crate::process::{InvocationFilter, InvocationHandler, require_next};

/// Records request count, latency and failures per service method, and runs
/// the rest of the chain inside a tracing span.
pub struct MonitorProcessFilter;

#[async_trait::async_trait]
impl InvocationFilter for MonitorProcessFilter {
    fn name(&self) -> &str {
        "monitor"
    }

    async fn invoke(
        &self,
        next: Option<&dyn InvocationHandler>,
        context: &mut ProviderContext,
    ) -> Result<InvocationResponse> {
        let next = require_next(next, self.name())?;

        let request = context.request();
        let service = request.service_name.clone();
        let method = request.method_name.clone();
        let span = info_span!(
            "provider_invocation",
            seq = request.seq,
            service = %service,
            method = %method,
            remote = %context.channel().remote_address()
        );

        let started = Instant::now();
        let result = next.handle(context).instrument(span).await;
        let elapsed = started.elapsed().as_secs_f64();

        counter!(
            "roost_provider_requests_total",
            "service" => service.clone(),
            "method" => method.clone()
        )
        .increment(1);
        histogram!(
            "roost_provider_request_duration_seconds",
            "service" => service.clone(),
            "method" => method.clone()
        )
        .record(elapsed);

        let failed = match &result {
            Ok(response) => response.is_exception(),
            Err(_) => true,
        };
        if failed {
            counter!(
                "roost_provider_request_errors_total",
                "service" => service,
                "method" => method
            )
            .increment(1);
        }

        result
    }
}
