//! In-process coordination store
//!
//! Keeps nodes in memory and emulates one-shot watches: an armed watch fires
//! a single [`WatchEvent`] into the event channel and is then disarmed.
//! Used for standalone mode and tests.

use dashmap::{DashMap, DashSet};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::event::{WatchEvent, WatchEventKind};
use crate::store::StoreAccessor;

pub struct MemoryStore {
    /// path -> value, `None` for container nodes
    nodes: DashMap<String, Option<String>>,
    data_watches: DashSet<String>,
    child_watches: DashSet<String>,
    events: Option<mpsc::UnboundedSender<WatchEvent>>,
}

impl MemoryStore {
    /// A store whose watches fire into the void.
    pub fn new() -> Self {
        Self {
            nodes: DashMap::new(),
            data_watches: DashSet::new(),
            child_watches: DashSet::new(),
            events: None,
        }
    }

    /// A store delivering fired watches to the returned receiver.
    pub fn with_events() -> (Self, mpsc::UnboundedReceiver<WatchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let store = Self {
            events: Some(tx),
            ..Self::new()
        };
        (store, rx)
    }

    /// Create or update a value node, creating missing ancestors.
    pub fn put(&self, path: &str, value: impl Into<String>) {
        self.upsert(path, Some(value.into()));
    }

    /// Create a container node without a value.
    pub fn create_container(&self, path: &str) {
        self.upsert(path, None);
    }

    /// Delete a node and everything below it. Returns whether it existed.
    pub fn delete(&self, path: &str) -> bool {
        if self.nodes.remove(path).is_none() {
            return false;
        }
        let descendant_prefix = format!("{}/", path);
        self.nodes.retain(|key, _| !key.starts_with(&descendant_prefix));

        let data_armed = self.data_watches.remove(path).is_some();
        let child_armed = self.child_watches.remove(path).is_some();
        if data_armed || child_armed {
            self.emit(WatchEventKind::Deleted, path);
        }
        if let Some(parent) = parent_of(path) {
            self.fire(&self.child_watches, parent, WatchEventKind::ChildrenChanged);
        }
        true
    }

    pub fn is_watching(&self, path: &str) -> bool {
        self.data_watches.contains(path)
    }

    pub fn is_watching_children(&self, path: &str) -> bool {
        self.child_watches.contains(path)
    }

    fn upsert(&self, path: &str, value: Option<String>) {
        self.create_ancestors(path);
        let existed = self.nodes.insert(path.to_string(), value).is_some();
        if existed {
            self.fire(&self.data_watches, path, WatchEventKind::DataChanged);
        } else {
            self.fire(&self.data_watches, path, WatchEventKind::Created);
            if let Some(parent) = parent_of(path) {
                self.fire(&self.child_watches, parent, WatchEventKind::ChildrenChanged);
            }
        }
    }

    fn create_ancestors(&self, path: &str) {
        let mut current = parent_of(path);
        while let Some(ancestor) = current {
            if self.nodes.contains_key(ancestor) {
                break;
            }
            self.nodes.insert(ancestor.to_string(), None);
            current = parent_of(ancestor);
        }
    }

    fn fire(&self, watches: &DashSet<String>, path: &str, kind: WatchEventKind) {
        if watches.remove(path).is_some() {
            self.emit(kind, path);
        }
    }

    fn emit(&self, kind: WatchEventKind, path: &str) {
        if let Some(tx) = &self.events {
            // Receiver gone means nobody is synchronizing any more
            let _ = tx.send(WatchEvent::new(kind, path));
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl StoreAccessor for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<String>> {
        Ok(self.nodes.get(path).and_then(|value| value.clone()))
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.nodes.contains_key(path))
    }

    async fn watch(&self, path: &str) -> Result<()> {
        self.data_watches.insert(path.to_string());
        Ok(())
    }

    async fn watch_children(&self, path: &str) -> Result<()> {
        self.child_watches.insert(path.to_string());
        Ok(())
    }

    async fn children(&self, path: &str) -> Result<Vec<String>> {
        let prefix = format!("{}/", path);
        let mut children: Vec<String> = self
            .nodes
            .iter()
            .filter_map(|entry| {
                entry
                    .key()
                    .strip_prefix(&prefix)
                    .filter(|rest| !rest.is_empty() && !rest.contains('/'))
                    .map(str::to_string)
            })
            .collect();
        children.sort();
        Ok(children)
    }
}

fn parent_of(path: &str) -> Option<&str> {
    path.rsplit_once('/')
        .map(|(parent, _)| parent)
        .filter(|parent| !parent.is_empty())
}
