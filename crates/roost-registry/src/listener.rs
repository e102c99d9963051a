//! Service change listener trait and the default routing table

use dashmap::DashMap;

use crate::host::ServiceHost;

/// Receives accepted registry changes.
///
/// Both callbacks are idempotent upserts: the same notification may arrive
/// more than once when watches race, and must leave the same state behind.
/// Implementations must not block.
pub trait ServiceChangeListener: Send + Sync {
    /// The complete host list of a service has changed.
    fn on_service_host_change(&self, service_name: &str, hosts: &[ServiceHost]);

    /// The weight of a `host:port` server has changed.
    fn on_host_weight_change(&self, server: &str, weight: u32);
}

/// Local routing table fed by registry changes.
pub struct RoutingTableListener {
    /// key = service name
    service_hosts: DashMap<String, Vec<ServiceHost>>,
    /// key = "host:port"
    host_weights: DashMap<String, u32>,
}

impl RoutingTableListener {
    pub fn new() -> Self {
        Self {
            service_hosts: DashMap::new(),
            host_weights: DashMap::new(),
        }
    }

    /// Current hosts of a service.
    pub fn hosts(&self, service_name: &str) -> Option<Vec<ServiceHost>> {
        self.service_hosts.get(service_name).map(|e| e.clone())
    }

    /// Current weight of a server.
    pub fn weight(&self, server: &str) -> Option<u32> {
        self.host_weights.get(server).map(|e| *e)
    }

    /// All services with a known host list.
    pub fn services(&self) -> Vec<String> {
        self.service_hosts.iter().map(|e| e.key().clone()).collect()
    }
}

impl Default for RoutingTableListener {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceChangeListener for RoutingTableListener {
    fn on_service_host_change(&self, service_name: &str, hosts: &[ServiceHost]) {
        self.service_hosts
            .insert(service_name.to_string(), hosts.to_vec());
    }

    fn on_host_weight_change(&self, server: &str, weight: u32) {
        self.host_weights.insert(server.to_string(), weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_table_upserts() {
        let table = RoutingTableListener::new();
        assert!(table.hosts("svc").is_none());

        let hosts = vec![ServiceHost::new("10.0.0.1", 4040)];
        table.on_service_host_change("svc", &hosts);
        table.on_service_host_change("svc", &hosts);
        assert_eq!(table.hosts("svc"), Some(hosts));
        assert_eq!(table.services(), vec!["svc".to_string()]);

        table.on_service_host_change("svc", &[]);
        assert_eq!(table.hosts("svc"), Some(vec![]));
    }

    #[test]
    fn test_routing_table_weights() {
        let table = RoutingTableListener::new();
        table.on_host_weight_change("10.0.0.1:4040", 5);
        assert_eq!(table.weight("10.0.0.1:4040"), Some(5));

        table.on_host_weight_change("10.0.0.1:4040", 0);
        assert_eq!(table.weight("10.0.0.1:4040"), Some(0));
        assert_eq!(table.weight("10.0.0.2:4040"), None);
    }
}
