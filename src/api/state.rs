use std::sync::Arc;

use crate::domain::catalog::{MemoryCatalog, ProductCatalog};
use crate::domain::group_order::{GroupOrderCommandHandler, GroupOrderEvent, OrderPolicy};
use crate::event_sourcing::EventStore;
use crate::metrics::Metrics;
use crate::utils::RetryConfig;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<GroupOrderCommandHandler>,
    pub catalog: Arc<MemoryCatalog>,
}

impl AppState {
    pub fn new(policy: OrderPolicy, retry: RetryConfig, metrics: Arc<Metrics>) -> Self {
        let catalog = Arc::new(MemoryCatalog::new());
        let store: Arc<EventStore<GroupOrderEvent>> = Arc::new(EventStore::new());

        let orders = Arc::new(GroupOrderCommandHandler::new(
            store,
            Arc::clone(&catalog) as Arc<dyn ProductCatalog>,
            policy,
            retry,
            metrics,
        ));

        Self { orders, catalog }
    }
}
