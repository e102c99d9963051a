//! Published services the business filter dispatches to

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tracing::info;

use crate::context::ProviderContext;

/// A published service. Method lookup and argument decoding are up to the
/// implementation; the request is available through the context.
#[async_trait::async_trait]
pub trait ServiceInvoker: Send + Sync {
    async fn invoke(&self, context: &mut ProviderContext) -> anyhow::Result<Value>;
}

/// Published services by name.
pub struct ServiceRegistry {
    services: DashMap<String, Arc<dyn ServiceInvoker>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
        }
    }

    pub fn register(&self, service_name: impl Into<String>, invoker: Arc<dyn ServiceInvoker>) {
        let service_name = service_name.into();
        info!("Published service: {}", service_name);
        self.services.insert(service_name, invoker);
    }

    pub fn unregister(&self, service_name: &str) -> bool {
        self.services.remove(service_name).is_some()
    }

    pub fn get(&self, service_name: &str) -> Option<Arc<dyn ServiceInvoker>> {
        self.services.get(service_name).map(|e| e.value().clone())
    }

    pub fn service_names(&self) -> Vec<String> {
        self.services.iter().map(|e| e.key().clone()).collect()
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
