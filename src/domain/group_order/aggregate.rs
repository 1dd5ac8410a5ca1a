use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use crate::event_sourcing::{Aggregate, EventEnvelope};
use super::value_objects::{OrderStatus, Participation, ProductSnapshot};
use super::events::*;
use super::commands::GroupOrderCommand;
use super::errors::GroupOrderError;

// ============================================================================
// Group Order Aggregate - Domain Logic
// ============================================================================
//
// Sole owner of mutations to `current_qty`, `participants` and `status`.
// Enforced here, for every reachable state:
// - current_qty == sum of participant quantities
// - current_qty <= target_qty while the order is open
// - reaching the target closes the order in the same event batch
// - overshooting the target is rejected, never clamped
// - status only moves forward (open -> closed -> delivered, cancel from
//   open or closed)
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupOrderAggregate {
    // Identity
    pub id: Uuid,
    pub version: i64,

    // Current State (derived from events)
    pub product: ProductSnapshot,
    pub target_qty: u32,
    pub current_qty: u32,
    pub status: OrderStatus,
    pub participants: Vec<Participation>,

    // Fixed at creation
    pub delivery_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl GroupOrderAggregate {
    /// Validate an open request and produce its event batch.
    ///
    /// There is no aggregate yet at this point, so this is an associated
    /// function rather than a command on an instance.
    pub fn plan_open(
        product: ProductSnapshot,
        target_qty: u32,
        initiator_id: Uuid,
        initial_qty: u32,
        delivery_date: DateTime<Utc>,
    ) -> Result<Vec<GroupOrderEvent>, GroupOrderError> {
        if target_qty == 0 {
            return Err(GroupOrderError::InvalidQuantity(target_qty));
        }
        if initial_qty == 0 {
            return Err(GroupOrderError::InvalidQuantity(initial_qty));
        }
        if initial_qty > target_qty {
            return Err(GroupOrderError::CapacityExceeded {
                current: 0,
                target: target_qty,
                requested: initial_qty,
            });
        }

        let mut events = vec![GroupOrderEvent::Opened(OrderOpened {
            product,
            target_qty,
            initiator: Participation {
                vendor_id: initiator_id,
                quantity: initial_qty,
            },
            delivery_date,
        })];

        // A first stake that already fills the target closes immediately
        if initial_qty == target_qty {
            events.push(GroupOrderEvent::Closed(OrderClosed { closed_at: Utc::now() }));
        }

        Ok(events)
    }

    /// The stake a vendor currently holds, if any.
    pub fn participant_quantity(&self, vendor_id: Uuid) -> Option<u32> {
        self.participants
            .iter()
            .find(|p| p.vendor_id == vendor_id)
            .map(|p| p.quantity)
    }

    pub fn is_participant(&self, vendor_id: Uuid) -> bool {
        self.participant_quantity(vendor_id).is_some()
    }

    fn require_open(&self) -> Result<(), GroupOrderError> {
        match self.status {
            OrderStatus::Open => Ok(()),
            status => Err(GroupOrderError::OrderNotOpen(status)),
        }
    }

    /// Capacity check shared by join and modify: the resulting total must
    /// not pass the target. Closure happens exactly on equality.
    fn check_capacity(&self, new_total: u32, requested: u32) -> Result<(), GroupOrderError> {
        if new_total > self.target_qty {
            return Err(GroupOrderError::CapacityExceeded {
                current: self.current_qty,
                target: self.target_qty,
                requested,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Aggregate Trait Implementation
// ============================================================================

impl Aggregate for GroupOrderAggregate {
    type Event = GroupOrderEvent;
    type Command = GroupOrderCommand;
    type Error = GroupOrderError;

    fn apply_first_event(envelope: &EventEnvelope<Self::Event>) -> Result<Self, Self::Error> {
        match &envelope.event_data {
            GroupOrderEvent::Opened(e) => Ok(Self {
                id: envelope.aggregate_id,
                version: 0,
                product: e.product.clone(),
                target_qty: e.target_qty,
                current_qty: e.initiator.quantity,
                status: OrderStatus::Open,
                participants: vec![e.initiator.clone()],
                delivery_date: e.delivery_date,
                created_at: envelope.timestamp,
                updated_at: envelope.timestamp,
            }),
            _ => Err(GroupOrderError::NotInitialized),
        }
    }

    fn apply_event(&mut self, event: &Self::Event) -> Result<(), Self::Error> {
        self.updated_at = Utc::now();

        match event {
            GroupOrderEvent::Opened(_) => {
                // First event already applied
                Ok(())
            }
            GroupOrderEvent::Joined(e) => {
                match self.participants.iter_mut().find(|p| p.vendor_id == e.vendor_id) {
                    Some(existing) => existing.quantity += e.quantity,
                    None => self.participants.push(Participation {
                        vendor_id: e.vendor_id,
                        quantity: e.quantity,
                    }),
                }
                self.current_qty += e.quantity;
                Ok(())
            }
            GroupOrderEvent::Adjusted(e) => {
                match self.participants.iter_mut().find(|p| p.vendor_id == e.vendor_id) {
                    Some(existing) => existing.quantity = e.new_quantity,
                    None => return Err(GroupOrderError::NotAParticipant(e.vendor_id)),
                }
                self.current_qty = self.participants.iter().map(|p| p.quantity).sum();
                Ok(())
            }
            GroupOrderEvent::Closed(_) => {
                self.status = OrderStatus::Closed;
                Ok(())
            }
            GroupOrderEvent::Delivered(_) => {
                self.status = OrderStatus::Delivered;
                Ok(())
            }
            GroupOrderEvent::Cancelled(_) => {
                self.status = OrderStatus::Cancelled;
                Ok(())
            }
        }
    }

    fn handle_command(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            GroupOrderCommand::Join { vendor_id, quantity } => {
                self.require_open()?;

                if *quantity == 0 {
                    return Err(GroupOrderError::InvalidQuantity(*quantity));
                }

                let new_total = self
                    .current_qty
                    .checked_add(*quantity)
                    .ok_or(GroupOrderError::CapacityExceeded {
                        current: self.current_qty,
                        target: self.target_qty,
                        requested: *quantity,
                    })?;
                self.check_capacity(new_total, *quantity)?;

                let mut events = vec![GroupOrderEvent::Joined(ParticipantJoined {
                    vendor_id: *vendor_id,
                    quantity: *quantity,
                })];

                if new_total == self.target_qty {
                    events.push(GroupOrderEvent::Closed(OrderClosed { closed_at: Utc::now() }));
                }

                Ok(events)
            }

            GroupOrderCommand::Adjust { vendor_id, new_quantity } => {
                self.require_open()?;

                let current_stake = self
                    .participant_quantity(*vendor_id)
                    .ok_or(GroupOrderError::NotAParticipant(*vendor_id))?;

                if *new_quantity == 0 {
                    return Err(GroupOrderError::InvalidQuantity(*new_quantity));
                }

                // Redundant modify is a no-op
                if *new_quantity == current_stake {
                    return Ok(vec![]);
                }

                // The stake is part of current_qty, so this cannot underflow
                let new_total = (self.current_qty - current_stake)
                    .checked_add(*new_quantity)
                    .ok_or(GroupOrderError::CapacityExceeded {
                        current: self.current_qty,
                        target: self.target_qty,
                        requested: *new_quantity,
                    })?;
                self.check_capacity(new_total, *new_quantity)?;

                let mut events = vec![GroupOrderEvent::Adjusted(QuantityAdjusted {
                    vendor_id: *vendor_id,
                    new_quantity: *new_quantity,
                })];

                if new_total == self.target_qty {
                    events.push(GroupOrderEvent::Closed(OrderClosed { closed_at: Utc::now() }));
                }

                Ok(events)
            }

            GroupOrderCommand::Deliver => match self.status {
                OrderStatus::Closed => Ok(vec![GroupOrderEvent::Delivered(OrderDelivered {
                    delivered_at: Utc::now(),
                })]),
                OrderStatus::Open => Err(GroupOrderError::OrderNotClosed(self.status)),
                status => Err(GroupOrderError::AlreadyTerminal(status)),
            },

            GroupOrderCommand::Cancel { reason, cancelled_by } => {
                if self.status.is_terminal() {
                    return Err(GroupOrderError::AlreadyTerminal(self.status));
                }

                Ok(vec![GroupOrderEvent::Cancelled(OrderCancelled {
                    reason: reason.clone(),
                    cancelled_by: *cancelled_by,
                })])
            }
        }
    }

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
