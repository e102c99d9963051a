//! Access to the locally configured routing group

/// Source of the process's routing group.
///
/// The raw value may be absent or blank; callers normalize it.
pub trait GroupConfigAccessor: Send + Sync {
    fn current_group(&self) -> Option<String>;
}

/// A fixed routing group.
#[derive(Debug, Clone, Default)]
pub struct StaticGroup {
    group: Option<String>,
}

impl StaticGroup {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
        }
    }

    /// The default (empty) group.
    pub fn none() -> Self {
        Self { group: None }
    }
}

impl GroupConfigAccessor for StaticGroup {
    fn current_group(&self) -> Option<String> {
        self.group.clone()
    }
}
