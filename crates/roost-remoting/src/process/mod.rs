//! Invocation handler and filter abstractions, and chain composition

pub mod factory;
pub mod filter;

use std::sync::Arc;

use crate::context::ProviderContext;
use crate::domain::InvocationResponse;
use crate::error::{RemotingError, Result};

/// Turns a call into a response.
#[async_trait::async_trait]
pub trait InvocationHandler: Send + Sync {
    async fn handle(&self, context: &mut ProviderContext) -> Result<InvocationResponse>;
}

/// One stage of an invocation chain.
///
/// A filter may call `next` at most once. Returning without calling it
/// short-circuits everything further in. The innermost filter receives
/// `None`.
#[async_trait::async_trait]
pub trait InvocationFilter: Send + Sync {
    fn name(&self) -> &str;

    async fn invoke(
        &self,
        next: Option<&dyn InvocationHandler>,
        context: &mut ProviderContext,
    ) -> Result<InvocationResponse>;
}

/// A filter bound to the rest of its chain.
struct FilterHandler {
    filter: Arc<dyn InvocationFilter>,
    next: Option<Arc<dyn InvocationHandler>>,
}

#[async_trait::async_trait]
impl InvocationHandler for FilterHandler {
    async fn handle(&self, context: &mut ProviderContext) -> Result<InvocationResponse> {
        self.filter.invoke(self.next.as_deref(), context).await
    }
}

/// Composes filters into one handler, innermost first. The first filter in
/// the slice becomes the outermost. Returns `None` for an empty slice.
pub fn build_invocation_handler(
    filters: &[Arc<dyn InvocationFilter>],
) -> Option<Arc<dyn InvocationHandler>> {
    filters.iter().rev().fold(None, |next, filter| {
        Some(Arc::new(FilterHandler {
            filter: filter.clone(),
            next,
        }) as Arc<dyn InvocationHandler>)
    })
}

/// The next handler of a non-terminal filter.
pub(crate) fn require_next<'a>(
    next: Option<&'a dyn InvocationHandler>,
    filter_name: &str,
) -> Result<&'a dyn InvocationHandler> {
    next.ok_or_else(|| RemotingError::MissingNextHandler(filter_name.to_string()))
}
