//! Main entry point for the Roost provider runtime.

use std::sync::Arc;

use roost_remoting::ServiceRegistry;
use roost_server::{Configuration, ProviderRuntime, startup};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Arc::new(Configuration::new()?);
    let _logging_guard = startup::init_logging(&configuration.logging_config())?;

    let services = Arc::new(ServiceRegistry::new());
    let runtime = ProviderRuntime::start(configuration.clone(), services)?;

    info!(
        business_filters = ?runtime.biz_filter_names(),
        heartbeat_filters = ?runtime.heartbeat_filter_names(),
        "Invocation chains ready"
    );

    let shutdown = startup::wait_for_shutdown_signal();
    let mut shutdown_rx = shutdown.subscribe();
    let _ = shutdown_rx.recv().await;

    runtime.shutdown().await;
    Ok(())
}
