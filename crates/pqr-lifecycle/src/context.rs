//! Capabilities handed to the controller.

use std::sync::Arc;

use pqr_model::{Clock, SystemClock};
use pqr_store::CaseStore;

/// Store, clock and identity of the operator the controller acts for.
#[derive(Clone)]
pub struct CaseContext {
    pub store: Arc<dyn CaseStore>,
    pub clock: Arc<dyn Clock>,
    pub user_id: String,
}

impl CaseContext {
    pub fn new(store: Arc<dyn CaseStore>, clock: Arc<dyn Clock>, user_id: impl Into<String>) -> Self {
        Self {
            store,
            clock,
            user_id: user_id.into(),
        }
    }

    /// Context on the system clock.
    pub fn with_system_clock(store: Arc<dyn CaseStore>, user_id: impl Into<String>) -> Self {
        Self::new(store, Arc::new(SystemClock), user_id)
    }
}

impl std::fmt::Debug for CaseContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseContext")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}
