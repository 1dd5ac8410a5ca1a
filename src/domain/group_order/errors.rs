use uuid::Uuid;

use crate::event_sourcing::StoreError;
use crate::utils::IsTransient;
use super::value_objects::OrderStatus;

// ============================================================================
// Group Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GroupOrderError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),

    #[error("product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("group order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("group order is not open: {0:?}")]
    OrderNotOpen(OrderStatus),

    #[error("group order must be closed before delivery: {0:?}")]
    OrderNotClosed(OrderStatus),

    #[error("group order already finished: {0:?}")]
    AlreadyTerminal(OrderStatus),

    #[error("quantity {requested} would overshoot the target: {current}/{target}")]
    CapacityExceeded {
        current: u32,
        target: u32,
        requested: u32,
    },

    #[error("vendor {0} is not a participant")]
    NotAParticipant(Uuid),

    #[error("aggregate not initialized")]
    NotInitialized,

    #[error("concurrent updates kept conflicting after {0} attempts")]
    Conflict(u32),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IsTransient for GroupOrderError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Store(StoreError::VersionConflict { .. }))
    }
}
