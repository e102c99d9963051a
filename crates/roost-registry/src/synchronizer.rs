//! Registry watch synchronizer
//!
//! Turns raw store notifications into listener calls:
//!
//! | Path kind          | Event              | Action                                              |
//! |--------------------|--------------------|-----------------------------------------------------|
//! | service address    | any node change    | notify with host list if relevant, re-arm watch     |
//! | weight             | any node change    | notify with parsed weight, re-arm watch             |
//! | ephemeral address  | created            | watch children, then handle as children changed     |
//! | ephemeral address  | deleted            | watch the container for re-creation                 |
//! | ephemeral address  | children changed   | notify with resolved addresses if relevant, re-arm  |
//!
//! Watches are re-armed before the node is read, so a change landing during
//! the read fires the new watch instead of being lost.

use std::sync::Arc;

use metrics::counter;
use roost_common::RegistryPaths;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::{RegistryError, Result};
use crate::event::{WatchEvent, WatchEventKind};
use crate::group::GroupConfigAccessor;
use crate::host::parse_host_list;
use crate::listener::ServiceChangeListener;
use crate::path::{PathClassifier, PathDescriptor, PathKind};
use crate::policy::ChangeDecisionPolicy;
use crate::resolver::{AddressResolver, StoreAddressResolver};
use crate::store::StoreAccessor;

/// Keeps a [`ServiceChangeListener`] in sync with the coordination store.
///
/// Holds no mutable state; events for different paths may be processed
/// concurrently on separate tasks.
pub struct RegistrySynchronizer {
    classifier: PathClassifier,
    policy: ChangeDecisionPolicy,
    store: Arc<dyn StoreAccessor>,
    resolver: Arc<dyn AddressResolver>,
    listener: Arc<dyn ServiceChangeListener>,
}

impl RegistrySynchronizer {
    pub fn new(
        paths: RegistryPaths,
        store: Arc<dyn StoreAccessor>,
        group: Arc<dyn GroupConfigAccessor>,
        resolver: Arc<dyn AddressResolver>,
        listener: Arc<dyn ServiceChangeListener>,
    ) -> Self {
        Self {
            policy: ChangeDecisionPolicy::new(store.clone(), group, paths.clone()),
            classifier: PathClassifier::new(paths),
            store,
            resolver,
            listener,
        }
    }

    /// Create a synchronizer resolving ephemeral addresses from the same store.
    pub fn with_store_resolver(
        paths: RegistryPaths,
        store: Arc<dyn StoreAccessor>,
        group: Arc<dyn GroupConfigAccessor>,
        listener: Arc<dyn ServiceChangeListener>,
    ) -> Self {
        let resolver = Arc::new(StoreAddressResolver::new(store.clone(), paths.clone()));
        Self::new(paths, store, group, resolver, listener)
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    /// Handle one watch notification.
    ///
    /// Store failures and unrecognized paths are logged and the event is
    /// dropped. The only error returned is [`RegistryError::MalformedWeight`],
    /// which means the registry itself holds invalid data.
    pub async fn on_event(&self, event: &WatchEvent) -> Result<()> {
        let Some(path) = event.node_path() else {
            return Ok(());
        };

        info!("Registry event received, type: {}, path: {}", event.kind, path);
        counter!("roost_registry_events_total", "kind" => event.kind.as_str()).increment(1);

        match self.process(path, event.kind).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_data_integrity() => {
                error!(path, error = %e, "Registry holds invalid data");
                Err(e)
            }
            Err(e) => {
                error!(path, error = %e, "Failed to process registry event");
                Ok(())
            }
        }
    }

    /// Drain watch notifications until the sender side is dropped.
    ///
    /// Events are handled one at a time, preserving the store's per-path order.
    pub async fn run(&self, mut events: mpsc::UnboundedReceiver<WatchEvent>) {
        info!("Registry synchronizer started");
        while let Some(event) = events.recv().await {
            if self.on_event(&event).await.is_err() {
                counter!("roost_registry_integrity_errors_total").increment(1);
            }
        }
        info!("Registry event stream closed, synchronizer stopped");
    }

    async fn process(&self, path: &str, kind: WatchEventKind) -> Result<()> {
        let Some(descriptor) = self.classifier.classify(path) else {
            warn!("Failed to parse path {}", path);
            return Ok(());
        };

        match descriptor.kind() {
            PathKind::ServiceAddress => self.address_changed(&descriptor).await,
            PathKind::Weight => self.weight_changed(&descriptor).await,
            PathKind::EphemeralAddress => match kind {
                WatchEventKind::Created => {
                    self.store.watch_children(path).await?;
                    self.ephemeral_address_changed(&descriptor).await
                }
                WatchEventKind::Deleted => self.store.watch(path).await,
                WatchEventKind::ChildrenChanged => {
                    self.ephemeral_address_changed(&descriptor).await
                }
                _ => {
                    debug!(path, kind = %kind, "Ignoring data change on ephemeral container");
                    Ok(())
                }
            },
        }
    }

    async fn address_changed(&self, descriptor: &PathDescriptor) -> Result<()> {
        let Some(service_name) = descriptor.service_name() else {
            return Ok(());
        };
        let path = descriptor.raw_path();
        let current_group = self.policy.current_group();

        self.store.watch(path).await?;
        if !self.policy.should_notify(descriptor, &current_group).await? {
            debug!(
                path,
                group = descriptor.group(),
                current_group = %current_group,
                "Service address change not relevant to current group"
            );
            return Ok(());
        }

        let hosts = self.store.get(path).await?;
        info!("Service address changed, path {} value {:?}", path, hosts);
        let host_list = parse_host_list(hosts.as_deref());
        self.listener.on_service_host_change(service_name, &host_list);
        counter!("roost_registry_notifications_total", "kind" => PathKind::ServiceAddress.as_str())
            .increment(1);
        Ok(())
    }

    async fn ephemeral_address_changed(&self, descriptor: &PathDescriptor) -> Result<()> {
        let Some(service_name) = descriptor.service_name() else {
            return Ok(());
        };
        let group = descriptor.group();
        let container = self
            .classifier
            .paths()
            .ephemeral_service_path(service_name, group);

        // Host processes come and go, keep observing even when not notifying
        self.store.watch_children(&container).await?;

        let current_group = self.policy.current_group();
        if !self.policy.should_notify(descriptor, &current_group).await? {
            debug!(
                path = descriptor.raw_path(),
                group,
                current_group = %current_group,
                "Ephemeral address change not relevant to current group"
            );
            return Ok(());
        }

        let hosts = self.resolver.service_address(service_name, group).await?;
        info!(
            "Ephemeral service address changed, path {} value {:?}",
            descriptor.raw_path(),
            hosts
        );
        let host_list = parse_host_list(hosts.as_deref());
        self.listener.on_service_host_change(service_name, &host_list);
        counter!("roost_registry_notifications_total", "kind" => PathKind::EphemeralAddress.as_str())
            .increment(1);
        Ok(())
    }

    async fn weight_changed(&self, descriptor: &PathDescriptor) -> Result<()> {
        let Some(server) = descriptor.server() else {
            return Ok(());
        };
        let path = descriptor.raw_path();

        self.store.watch(path).await?;
        let value = self.store.get(path).await?;
        info!("Service weight changed, path {} value {:?}", path, value);

        let weight = parse_weight(server, value.as_deref())?;
        self.listener.on_host_weight_change(server, weight);
        counter!("roost_registry_notifications_total", "kind" => PathKind::Weight.as_str())
            .increment(1);
        Ok(())
    }
}

/// Absent or empty weight means 0; anything else must be a non-negative
/// integer with no surrounding whitespace.
pub fn parse_weight(server: &str, value: Option<&str>) -> Result<u32> {
    match value {
        None | Some("") => Ok(0),
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|source| RegistryError::MalformedWeight {
                server: server.to_string(),
                value: raw.to_string(),
                source,
            }),
    }
}
