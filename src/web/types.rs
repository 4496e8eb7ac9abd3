use std::sync::Arc;

use crate::core_state::CoreState;

/// Shared context for all routes and middleware.
#[derive(Clone)]
pub struct WebContext {
    pub core: Arc<CoreState>,
}

impl WebContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}
