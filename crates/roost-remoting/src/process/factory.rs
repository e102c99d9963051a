//! Owner of the business and heartbeat invocation chains

use std::sync::Arc;

use tracing::info;

use crate::context::ProviderContext;
use crate::domain::{InvocationResponse, MessageType};
use crate::error::{RemotingError, Result};
use crate::process::filter::{
    BusinessProcessFilter, ContextTransferProcessFilter, ExceptionProcessFilter,
    HeartbeatProcessFilter, MonitorProcessFilter, WriteResponseProcessFilter,
};
use crate::process::{InvocationFilter, InvocationHandler, build_invocation_handler};
use crate::service::ServiceRegistry;

/// Options for building the standard chains.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Put the monitor filter at the head of the business chain
    pub monitor_enabled: bool,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            monitor_enabled: true,
        }
    }
}

/// Builds both chains once and selects one per call.
///
/// Chains can only be rebuilt after `clear_server_internal_filters`.
pub struct ProviderProcessHandlerFactory {
    config: ProcessConfig,
    services: Arc<ServiceRegistry>,
    biz_filters: Vec<Arc<dyn InvocationFilter>>,
    heartbeat_filters: Vec<Arc<dyn InvocationFilter>>,
    biz_handler: Option<Arc<dyn InvocationHandler>>,
    heartbeat_handler: Option<Arc<dyn InvocationHandler>>,
}

impl ProviderProcessHandlerFactory {
    pub fn new(config: ProcessConfig, services: Arc<ServiceRegistry>) -> Self {
        Self {
            config,
            services,
            biz_filters: Vec::new(),
            heartbeat_filters: Vec::new(),
            biz_handler: None,
            heartbeat_handler: None,
        }
    }

    /// Builds the standard chains:
    /// - business: monitor (if enabled), write-response, context-transfer, exception, business
    /// - heartbeat: write-response, heartbeat
    pub fn init(&mut self) -> Result<()> {
        let mut biz: Vec<Arc<dyn InvocationFilter>> = Vec::with_capacity(5);
        if self.config.monitor_enabled {
            biz.push(Arc::new(MonitorProcessFilter));
        }
        biz.push(Arc::new(WriteResponseProcessFilter));
        biz.push(Arc::new(ContextTransferProcessFilter));
        biz.push(Arc::new(ExceptionProcessFilter));
        biz.push(Arc::new(BusinessProcessFilter::new(self.services.clone())));

        let heartbeat: Vec<Arc<dyn InvocationFilter>> = vec![
            Arc::new(WriteResponseProcessFilter),
            Arc::new(HeartbeatProcessFilter),
        ];

        self.init_with(biz, heartbeat)
    }

    /// Builds both chains from the given filters, outermost first.
    pub fn init_with(
        &mut self,
        biz_filters: Vec<Arc<dyn InvocationFilter>>,
        heartbeat_filters: Vec<Arc<dyn InvocationFilter>>,
    ) -> Result<()> {
        if !self.biz_filters.is_empty() || !self.heartbeat_filters.is_empty() {
            return Err(RemotingError::ChainAlreadyInitialized);
        }
        if biz_filters.is_empty() || heartbeat_filters.is_empty() {
            return Err(RemotingError::InvalidChain(
                "business and heartbeat chains need at least one filter".to_string(),
            ));
        }

        for filter in biz_filters {
            info!("Register process filter: {}", filter.name());
            self.biz_filters.push(filter);
        }
        for filter in heartbeat_filters {
            info!("Register heartbeat filter: {}", filter.name());
            self.heartbeat_filters.push(filter);
        }

        self.biz_handler = build_invocation_handler(&self.biz_filters);
        self.heartbeat_handler = build_invocation_handler(&self.heartbeat_filters);
        Ok(())
    }

    /// Heartbeats get the heartbeat chain; every other kind gets the
    /// business chain.
    pub fn select_invocation_handler(
        &self,
        message_type: MessageType,
    ) -> Result<Arc<dyn InvocationHandler>> {
        let handler = if message_type.is_heartbeat() {
            &self.heartbeat_handler
        } else {
            &self.biz_handler
        };
        handler.clone().ok_or(RemotingError::ChainNotInitialized)
    }

    /// Runs a call through the chain selected by its message type.
    pub async fn process(&self, context: &mut ProviderContext) -> Result<InvocationResponse> {
        let handler = self.select_invocation_handler(context.request().message_type)?;
        handler.handle(context).await
    }

    /// Drops both chains and their filters. `init` must run before the next
    /// call is processed.
    pub fn clear_server_internal_filters(&mut self) {
        self.biz_filters.clear();
        self.heartbeat_filters.clear();
        self.biz_handler = None;
        self.heartbeat_handler = None;
        info!("Cleared server internal filters");
    }

    pub fn is_initialized(&self) -> bool {
        self.biz_handler.is_some() && self.heartbeat_handler.is_some()
    }

    pub fn biz_filter_names(&self) -> Vec<String> {
        self.biz_filters.iter().map(|f| f.name().to_string()).collect()
    }

    pub fn heartbeat_filter_names(&self) -> Vec<String> {
        self.heartbeat_filters
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    pub fn services(&self) -> &Arc<ServiceRegistry> {
        &self.services
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory(monitor_enabled: bool) -> ProviderProcessHandlerFactory {
        ProviderProcessHandlerFactory::new(
            ProcessConfig { monitor_enabled },
            Arc::new(ServiceRegistry::new()),
        )
    }

    #[test]
    fn test_default_order() {
        let mut factory = factory(true);
        factory.init().unwrap();

        assert_eq!(
            factory.biz_filter_names(),
            vec![
                "monitor",
                "write-response",
                "context-transfer",
                "exception",
                "business"
            ]
        );
        assert_eq!(
            factory.heartbeat_filter_names(),
            vec!["write-response", "heartbeat"]
        );
        assert!(factory.is_initialized());
    }

    #[test]
    fn test_monitor_disabled() {
        let mut factory = factory(false);
        factory.init().unwrap();

        assert_eq!(factory.biz_filter_names()[0], "write-response");
        assert_eq!(factory.biz_filter_names().len(), 4);
    }

    #[test]
    fn test_double_init_fails_fast() {
        let mut factory = factory(true);
        factory.init().unwrap();

        let err = factory.init().unwrap_err();
        assert!(matches!(err, RemotingError::ChainAlreadyInitialized));
        assert_eq!(factory.biz_filter_names().len(), 5);
    }

    #[test]
    fn test_select_before_init() {
        let factory = factory(true);
        assert!(matches!(
            factory.select_invocation_handler(MessageType::Service),
            Err(RemotingError::ChainNotInitialized)
        ));
    }

    #[test]
    fn test_reset_then_rebuild() {
        let mut factory = factory(true);
        factory.init().unwrap();
        let before = factory.biz_filter_names();

        factory.clear_server_internal_filters();
        assert!(!factory.is_initialized());
        assert!(factory.select_invocation_handler(MessageType::Heartbeat).is_err());
        assert!(factory.select_invocation_handler(MessageType::Service).is_err());

        factory.init().unwrap();
        assert_eq!(factory.biz_filter_names(), before);
        assert!(factory.select_invocation_handler(MessageType::Service).is_ok());
    }

    #[test]
    fn test_init_with_rejects_empty_chain() {
        let mut factory = factory(true);
        let err = factory
            .init_with(Vec::new(), vec![Arc::new(HeartbeatProcessFilter)])
            .unwrap_err();
        assert!(matches!(err, RemotingError::InvalidChain(_)));
        assert!(!factory.is_initialized());
    }
}
