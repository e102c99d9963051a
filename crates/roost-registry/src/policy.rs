//! Group relevance of registry changes
//!
//! A process only reacts to changes in its own routing group, plus default
//! (empty) group changes to services that also have a node in its group.

use std::sync::Arc;

use roost_common::{RegistryPaths, normalize_group};

use crate::error::Result;
use crate::group::GroupConfigAccessor;
use crate::path::PathDescriptor;
use crate::store::StoreAccessor;

/// Outcome of comparing the local group with the group of a changed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupDecision {
    Notify,
    Suppress,
    /// Local group is set, change is in the default group: relevant only if
    /// the service has a node for the local group.
    CheckFallback,
}

impl GroupDecision {
    /// First matching rule wins.
    pub fn evaluate(current_group: &str, changed_group: &str) -> Self {
        if current_group == changed_group {
            GroupDecision::Notify
        } else if current_group.is_empty() {
            GroupDecision::Suppress
        } else if changed_group.is_empty() {
            GroupDecision::CheckFallback
        } else {
            GroupDecision::Suppress
        }
    }
}

/// Decides whether a change notification is relevant to this process.
pub struct ChangeDecisionPolicy {
    store: Arc<dyn StoreAccessor>,
    group: Arc<dyn GroupConfigAccessor>,
    paths: RegistryPaths,
}

impl ChangeDecisionPolicy {
    pub fn new(
        store: Arc<dyn StoreAccessor>,
        group: Arc<dyn GroupConfigAccessor>,
        paths: RegistryPaths,
    ) -> Self {
        Self {
            store,
            group,
            paths,
        }
    }

    /// The normalized routing group of this process.
    pub fn current_group(&self) -> String {
        normalize_group(self.group.current_group().as_deref())
    }

    /// Whether a change at `descriptor` should be forwarded, given `current_group`.
    ///
    /// The fallback case asks the store whether the service has a node for
    /// `current_group` and notifies only if it does.
    pub async fn should_notify(
        &self,
        descriptor: &PathDescriptor,
        current_group: &str,
    ) -> Result<bool> {
        match GroupDecision::evaluate(current_group, descriptor.group()) {
            GroupDecision::Notify => Ok(true),
            GroupDecision::Suppress => Ok(false),
            GroupDecision::CheckFallback => {
                let Some(service_name) = descriptor.service_name() else {
                    return Ok(false);
                };
                let group_path = self.paths.service_path(service_name, current_group);
                self.store.exists(&group_path).await
            }
        }
    }
}
