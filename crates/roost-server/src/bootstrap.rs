//! Provider runtime wiring
//!
//! Owns the invocation chains and the registry synchronizer for the lifetime
//! of the process. Inbound calls go through [`ProviderRuntime::dispatch`];
//! store notifications are drained by a background pump task.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use roost_common::RegistryPaths;
use roost_registry::{
    MemoryStore, RegistrySynchronizer, RoutingTableListener, WatchEvent, WatchEventKind,
};
use roost_remoting::{
    InvocationResponse, ProviderContext, ProviderProcessHandlerFactory, ServiceRegistry,
};
use tokio::task::JoinHandle;
use tracing::info;

use crate::model::Configuration;

pub struct ProviderRuntime {
    factory: RwLock<ProviderProcessHandlerFactory>,
    synchronizer: Arc<RegistrySynchronizer>,
    routing_table: Arc<RoutingTableListener>,
    store: Arc<MemoryStore>,
    paths: RegistryPaths,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl ProviderRuntime {
    /// Build both invocation chains and start the registry event pump over an
    /// in-process store. Must be called within a tokio runtime.
    pub fn start(
        configuration: Arc<Configuration>,
        services: Arc<ServiceRegistry>,
    ) -> anyhow::Result<Self> {
        let paths = configuration.registry_paths()?;

        let mut factory =
            ProviderProcessHandlerFactory::new(configuration.process_config(), services);
        factory.init()?;

        let (store, events) = MemoryStore::with_events();
        let store = Arc::new(store);
        let routing_table = Arc::new(RoutingTableListener::new());
        let synchronizer = Arc::new(RegistrySynchronizer::with_store_resolver(
            paths.clone(),
            store.clone(),
            configuration.clone(),
            routing_table.clone(),
        ));

        let pump = {
            let synchronizer = synchronizer.clone();
            tokio::spawn(async move { synchronizer.run(events).await })
        };

        info!(
            group = ?configuration.group(),
            service_path = %paths.service,
            weight_path = %paths.weight,
            ephemeral_path = %paths.ephemeral,
            "Provider runtime started"
        );

        Ok(Self {
            factory: RwLock::new(factory),
            synchronizer,
            routing_table,
            store,
            paths,
            pump: Mutex::new(Some(pump)),
        })
    }

    /// Run an inbound call through the chain selected by its message type.
    pub async fn dispatch(
        &self,
        context: &mut ProviderContext,
    ) -> roost_remoting::Result<InvocationResponse> {
        let handler = {
            let factory = self.factory.read();
            factory.select_invocation_handler(context.request().message_type)?
        };
        handler.handle(context).await
    }

    /// Clear and rebuild both chains. Calls dispatched meanwhile wait for the
    /// rebuild to finish.
    pub fn reset_filters(&self) -> roost_remoting::Result<()> {
        let mut factory = self.factory.write();
        factory.clear_server_internal_filters();
        factory.init()
    }

    pub fn biz_filter_names(&self) -> Vec<String> {
        self.factory.read().biz_filter_names()
    }

    pub fn heartbeat_filter_names(&self) -> Vec<String> {
        self.factory.read().heartbeat_filter_names()
    }

    /// Load a service's address node and keep watching it.
    pub async fn subscribe(&self, service_name: &str, group: &str) -> roost_registry::Result<()> {
        let path = self.paths.service_path(service_name, group);
        self.synchronizer
            .on_event(&WatchEvent::new(WatchEventKind::DataChanged, path))
            .await
    }

    /// Load a service's ephemeral host container and keep watching it.
    pub async fn subscribe_ephemeral(
        &self,
        service_name: &str,
        group: &str,
    ) -> roost_registry::Result<()> {
        let path = self.paths.ephemeral_service_path(service_name, group);
        self.synchronizer
            .on_event(&WatchEvent::new(WatchEventKind::ChildrenChanged, path))
            .await
    }

    /// Load a server's weight node and keep watching it.
    pub async fn subscribe_weight(&self, server: &str) -> roost_registry::Result<()> {
        let path = self.paths.weight_path(server);
        self.synchronizer
            .on_event(&WatchEvent::new(WatchEventKind::DataChanged, path))
            .await
    }

    pub fn routing_table(&self) -> &Arc<RoutingTableListener> {
        &self.routing_table
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    pub fn paths(&self) -> &RegistryPaths {
        &self.paths
    }

    /// Stop the event pump. Idempotent.
    pub async fn shutdown(&self) {
        let pump = self.pump.lock().take();
        if let Some(pump) = pump {
            pump.abort();
            let _ = pump.await;
            info!("Provider runtime stopped");
        }
    }
}
