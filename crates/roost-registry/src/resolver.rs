//! Resolution of a service's aggregate address from ephemeral host nodes

use std::sync::Arc;

use roost_common::RegistryPaths;

use crate::error::Result;
use crate::store::StoreAccessor;

/// The owning registry's view of a service's current addresses.
#[async_trait::async_trait]
pub trait AddressResolver: Send + Sync {
    /// Comma-separated `ip:port` list for `service_name` in `group`, `None`
    /// if the service has no registration.
    async fn service_address(&self, service_name: &str, group: &str) -> Result<Option<String>>;
}

/// Aggregates the children of a service's ephemeral container.
///
/// Each live process registers one ephemeral child named `ip:port`.
pub struct StoreAddressResolver {
    store: Arc<dyn StoreAccessor>,
    paths: RegistryPaths,
}

impl StoreAddressResolver {
    pub fn new(store: Arc<dyn StoreAccessor>, paths: RegistryPaths) -> Self {
        Self { store, paths }
    }
}

#[async_trait::async_trait]
impl AddressResolver for StoreAddressResolver {
    async fn service_address(&self, service_name: &str, group: &str) -> Result<Option<String>> {
        let container = self.paths.ephemeral_service_path(service_name, group);
        if !self.store.exists(&container).await? {
            return Ok(None);
        }
        let children = self.store.children(&container).await?;
        Ok(Some(children.join(",")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn test_resolves_ephemeral_children() {
        let store = Arc::new(MemoryStore::new());
        store.put("/DP/EPHEMERAL/svc@g1/10.0.0.1:4040", "");
        store.put("/DP/EPHEMERAL/svc@g1/10.0.0.2:4040", "");
        let resolver = StoreAddressResolver::new(store, RegistryPaths::default());

        assert_eq!(
            resolver.service_address("svc", "g1").await.unwrap(),
            Some("10.0.0.1:4040,10.0.0.2:4040".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_container_resolves_to_none() {
        let store = Arc::new(MemoryStore::new());
        let resolver = StoreAddressResolver::new(store, RegistryPaths::default());

        assert_eq!(resolver.service_address("svc", "").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_container_resolves_to_empty_list() {
        let store = Arc::new(MemoryStore::new());
        store.create_container("/DP/EPHEMERAL/svc");
        let resolver = StoreAddressResolver::new(store, RegistryPaths::default());

        assert_eq!(
            resolver.service_address("svc", "").await.unwrap(),
            Some(String::new())
        );
    }
}
