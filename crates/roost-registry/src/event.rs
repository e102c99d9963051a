//! Watch notifications delivered by the store client

use std::fmt;

/// Kind of change reported by a watch.
///
/// Only the four node-level kinds drive synchronization; the rest are
/// session or bookkeeping notifications and are dropped on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchEventKind {
    Created,
    DataChanged,
    Deleted,
    ChildrenChanged,
    /// Session state change, carries no node path
    SessionState,
    DataWatchRemoved,
    ChildWatchRemoved,
}

impl WatchEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchEventKind::Created => "NodeCreated",
            WatchEventKind::DataChanged => "NodeDataChanged",
            WatchEventKind::Deleted => "NodeDeleted",
            WatchEventKind::ChildrenChanged => "NodeChildrenChanged",
            WatchEventKind::SessionState => "SessionState",
            WatchEventKind::DataWatchRemoved => "DataWatchRemoved",
            WatchEventKind::ChildWatchRemoved => "ChildWatchRemoved",
        }
    }

    /// Whether this kind describes a mutation of a node.
    pub fn is_node_change(&self) -> bool {
        matches!(
            self,
            WatchEventKind::Created
                | WatchEventKind::DataChanged
                | WatchEventKind::Deleted
                | WatchEventKind::ChildrenChanged
        )
    }
}

impl fmt::Display for WatchEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single watch notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: Option<String>,
    pub kind: WatchEventKind,
}

impl WatchEvent {
    pub fn new(kind: WatchEventKind, path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            kind,
        }
    }

    /// A notification without a node path, e.g. a session state change.
    pub fn without_path(kind: WatchEventKind) -> Self {
        Self { path: None, kind }
    }

    /// The path of a node-level change, or `None` when the event should be ignored.
    pub fn node_path(&self) -> Option<&str> {
        if !self.kind.is_node_change() {
            return None;
        }
        self.path.as_deref().filter(|p| !p.is_empty())
    }
}
