//! End-to-end tests for the provider invocation chains

use std::sync::Arc;

use parking_lot::Mutex;
use roost_remoting::process::filter::{BusinessProcessFilter, HeartbeatProcessFilter};
use roost_remoting::{
    CallType, InvocationFilter, InvocationHandler, InvocationRequest, InvocationResponse,
    MessageType, ProcessConfig, ProviderChannel, ProviderContext, ProviderProcessHandlerFactory,
    RemotingError, Result, ServiceInvoker, ServiceRegistry,
};
use serde_json::{Value, json};

// ============== Fakes ==============

#[derive(Default)]
struct RecordingChannel {
    written: Mutex<Vec<InvocationResponse>>,
}

#[async_trait::async_trait]
impl ProviderChannel for RecordingChannel {
    fn remote_address(&self) -> String {
        "192.168.1.20:40100".to_string()
    }

    async fn write(&self, response: &InvocationResponse) -> Result<()> {
        self.written.lock().push(response.clone());
        Ok(())
    }
}

/// Sums integer arguments, fails on anything else. Echoes the caller's
/// tenant into the response context.
struct Calculator;

#[async_trait::async_trait]
impl ServiceInvoker for Calculator {
    async fn invoke(&self, context: &mut ProviderContext) -> anyhow::Result<Value> {
        if let Some(tenant) = context.local_context.get("tenant").cloned() {
            context.response_context.insert("tenant".to_string(), tenant);
        }
        match context.request().method_name.as_str() {
            "sum" => {
                let mut total = 0i64;
                for p in &context.request().parameters {
                    total += p
                        .as_i64()
                        .ok_or_else(|| anyhow::anyhow!("not a number: {}", p))?;
                }
                Ok(json!(total))
            }
            other => anyhow::bail!("no such method: {}", other),
        }
    }
}

fn setup() -> (ProviderProcessHandlerFactory, Arc<RecordingChannel>) {
    let services = Arc::new(ServiceRegistry::new());
    services.register("calc", Arc::new(Calculator));
    let mut factory = ProviderProcessHandlerFactory::new(ProcessConfig::default(), services);
    factory.init().unwrap();
    (factory, Arc::new(RecordingChannel::default()))
}

// ============== Business chain ==============

#[tokio::test]
async fn test_business_call_writes_success() {
    let (factory, channel) = setup();
    let request = InvocationRequest::service(1, "calc", "sum", vec![json!(2), json!(3)]);
    let mut context = ProviderContext::new(request, channel.clone());

    let response = factory.process(&mut context).await.unwrap();

    assert_eq!(response.message_type, MessageType::Service);
    assert_eq!(response.result, Some(json!(5)));
    assert_eq!(*channel.written.lock(), vec![response]);
}

#[tokio::test]
async fn test_business_failure_resolves_to_response() {
    let (factory, channel) = setup();
    let request = InvocationRequest::service(2, "calc", "sum", vec![json!("x")]);
    let mut context = ProviderContext::new(request, channel.clone());

    let response = factory.process(&mut context).await.unwrap();

    assert_eq!(response.seq, 2);
    assert_eq!(response.message_type, MessageType::ServiceException);
    assert_eq!(channel.written.lock().len(), 1);
}

#[tokio::test]
async fn test_unknown_service_resolves_to_exception() {
    let (factory, channel) = setup();
    let request = InvocationRequest::service(3, "missing", "sum", vec![]);
    let mut context = ProviderContext::new(request, channel.clone());

    let response = factory.process(&mut context).await.unwrap();

    assert_eq!(response.message_type, MessageType::Exception);
    assert!(response.exception.unwrap().contains("missing"));
}

#[tokio::test]
async fn test_context_round_trip() {
    let (factory, channel) = setup();
    let request = InvocationRequest::service(4, "calc", "sum", vec![json!(1)])
        .with_context("tenant", "acme");
    let mut context = ProviderContext::new(request, channel);

    let response = factory.process(&mut context).await.unwrap();

    assert_eq!(
        response.context.get("tenant").map(String::as_str),
        Some("acme")
    );
}

#[tokio::test]
async fn test_one_way_call_not_written() {
    let (factory, channel) = setup();
    let request = InvocationRequest::service(5, "calc", "sum", vec![json!(1)])
        .with_call_type(CallType::NoReply);
    let mut context = ProviderContext::new(request, channel.clone());

    factory.process(&mut context).await.unwrap();

    assert!(channel.written.lock().is_empty());
}

#[tokio::test]
async fn test_unknown_message_type_uses_business_chain() {
    let (factory, channel) = setup();
    let mut request = InvocationRequest::service(6, "calc", "sum", vec![json!(4)]);
    request.message_type = MessageType::Unknown(42);
    let mut context = ProviderContext::new(request, channel);

    let response = factory.process(&mut context).await.unwrap();

    assert_eq!(response.result, Some(json!(4)));
}

// ============== Heartbeat chain ==============

#[tokio::test]
async fn test_heartbeat_answered() {
    let (factory, channel) = setup();
    let mut context = ProviderContext::new(InvocationRequest::heartbeat(7), channel.clone());

    let response = factory.process(&mut context).await.unwrap();

    assert_eq!(response, InvocationResponse::heartbeat(7));
    assert_eq!(*channel.written.lock(), vec![InvocationResponse::heartbeat(7)]);
}

// ============== Custom chains ==============

/// Rejects every call without calling next.
struct Reject;

#[async_trait::async_trait]
impl InvocationFilter for Reject {
    fn name(&self) -> &str {
        "reject"
    }

    async fn invoke(
        &self,
        _next: Option<&dyn InvocationHandler>,
        context: &mut ProviderContext,
    ) -> Result<InvocationResponse> {
        Ok(InvocationResponse::exception(
            context.request().seq,
            "rejected",
        ))
    }
}

/// Counts how often it is reached.
struct Counting(Arc<Mutex<usize>>);

#[async_trait::async_trait]
impl InvocationFilter for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    async fn invoke(
        &self,
        next: Option<&dyn InvocationHandler>,
        context: &mut ProviderContext,
    ) -> Result<InvocationResponse> {
        *self.0.lock() += 1;
        match next {
            Some(next) => next.handle(context).await,
            None => Ok(InvocationResponse::heartbeat(context.request().seq)),
        }
    }
}

#[tokio::test]
async fn test_short_circuit_skips_inner_filters() {
    let reached = Arc::new(Mutex::new(0));
    let mut factory = ProviderProcessHandlerFactory::new(
        ProcessConfig::default(),
        Arc::new(ServiceRegistry::new()),
    );
    factory
        .init_with(
            vec![Arc::new(Reject), Arc::new(Counting(reached.clone()))],
            vec![Arc::new(Counting(reached.clone()))],
        )
        .unwrap();

    let channel = Arc::new(RecordingChannel::default());
    let request = InvocationRequest::service(8, "calc", "sum", vec![]);
    let mut context = ProviderContext::new(request, channel);

    let response = factory.process(&mut context).await.unwrap();

    assert_eq!(response.exception.as_deref(), Some("rejected"));
    assert_eq!(*reached.lock(), 0);
}

#[tokio::test]
async fn test_error_without_exception_filter_reaches_caller() {
    let services = Arc::new(ServiceRegistry::new());
    let mut factory =
        ProviderProcessHandlerFactory::new(ProcessConfig::default(), services.clone());
    factory
        .init_with(
            vec![Arc::new(BusinessProcessFilter::new(services))],
            vec![Arc::new(HeartbeatProcessFilter)],
        )
        .unwrap();

    let channel = Arc::new(RecordingChannel::default());
    let request = InvocationRequest::service(9, "calc", "sum", vec![]);
    let mut context = ProviderContext::new(request, channel);

    let err = factory.process(&mut context).await.unwrap_err();
    assert!(matches!(err, RemotingError::ServiceNotFound(_)));
}

// ============== Reset ==============

#[tokio::test]
async fn test_process_after_reset_fails_until_init() {
    let (mut factory, channel) = setup();
    factory.clear_server_internal_filters();

    let mut context = ProviderContext::new(InvocationRequest::heartbeat(10), channel.clone());
    assert!(matches!(
        factory.process(&mut context).await,
        Err(RemotingError::ChainNotInitialized)
    ));

    factory.init().unwrap();
    let response = factory.process(&mut context).await.unwrap();
    assert_eq!(response.seq, 10);
}
