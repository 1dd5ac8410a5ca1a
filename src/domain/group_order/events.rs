use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use crate::event_sourcing::DomainEvent;
use super::value_objects::{Participation, ProductSnapshot};

// ============================================================================
// Group Order Events - Domain Events for the Group Order Aggregate
// ============================================================================

/// Group Order Event - union type for all group order events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GroupOrderEvent {
    Opened(OrderOpened),
    Joined(ParticipantJoined),
    Adjusted(QuantityAdjusted),
    Closed(OrderClosed),
    Delivered(OrderDelivered),
    Cancelled(OrderCancelled),
}

impl GroupOrderEvent {
    /// Stable name used for envelope typing and the tracking timeline.
    pub fn kind(&self) -> &'static str {
        match self {
            GroupOrderEvent::Opened(_) => "GroupOrderOpened",
            GroupOrderEvent::Joined(_) => "ParticipantJoined",
            GroupOrderEvent::Adjusted(_) => "QuantityAdjusted",
            GroupOrderEvent::Closed(_) => "GroupOrderClosed",
            GroupOrderEvent::Delivered(_) => "GroupOrderDelivered",
            GroupOrderEvent::Cancelled(_) => "GroupOrderCancelled",
        }
    }
}

impl DomainEvent for GroupOrderEvent {
    fn event_type() -> &'static str { "GroupOrderEvent" }
}

// ============================================================================
// Individual Event Types
// ============================================================================

/// Order Opened - first event in the lifecycle; carries the catalog snapshot
/// and the initiator's stake.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderOpened {
    pub product: ProductSnapshot,
    pub target_qty: u32,
    pub initiator: Participation,
    pub delivery_date: DateTime<Utc>,
}

/// Participant Joined - `quantity` is the delta being added, which also
/// covers an existing participant topping up their stake.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ParticipantJoined {
    pub vendor_id: Uuid,
    pub quantity: u32,
}

/// Quantity Adjusted - a participant replaced their stake with a new value.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QuantityAdjusted {
    pub vendor_id: Uuid,
    pub new_quantity: u32,
}

/// Order Closed - the target was reached; no further joins.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderClosed {
    pub closed_at: DateTime<Utc>,
}

/// Order Delivered - the supplier fulfilled the pooled order.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderDelivered {
    pub delivered_at: DateTime<Utc>,
}

/// Order Cancelled - lifecycle ended without delivery.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderCancelled {
    pub reason: Option<String>,
    pub cancelled_by: Option<Uuid>,
}
