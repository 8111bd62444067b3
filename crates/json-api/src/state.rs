//! State

use std::sync::Arc;

use storefront_app::context::AppContext;

/// Shared per-process state injected into every request.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext) -> Arc<Self> {
        Arc::new(Self { app })
    }
}
