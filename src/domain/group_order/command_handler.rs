use std::sync::Arc;
use std::time::Instant;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::catalog::ProductCatalog;
use crate::event_sourcing::{Aggregate, EventEnvelope, EventStore, StoreError};
use crate::metrics::Metrics;
use crate::utils::{retry_on_transient, RetryConfig, RetryResult};

use super::aggregate::GroupOrderAggregate;
use super::commands::GroupOrderCommand;
use super::errors::GroupOrderError;
use super::events::GroupOrderEvent;
use super::value_objects::ProductSnapshot;

// ============================================================================
// Group Order Command Handler
// ============================================================================
//
// Orchestrates: Command -> Aggregate -> Events -> Event Store
//
// Concurrency: every mutation is a load / validate / append cycle where the
// append carries the version the load observed. A concurrent writer makes
// the append fail with a version conflict; the whole cycle is then retried,
// so the capacity check always runs against the state it commits on top of.
// Two joins whose sum would overshoot the target can therefore never both
// land: the later one re-validates and is rejected.
//
// ============================================================================

/// Tunable order policy. The delivery date is a policy decision, not a
/// property of the aggregation logic.
#[derive(Clone, Debug)]
pub struct OrderPolicy {
    pub delivery_lead: chrono::Duration,
}

impl OrderPolicy {
    pub fn from_lead_days(days: i64) -> Self {
        Self {
            delivery_lead: chrono::Duration::days(days),
        }
    }
}

impl Default for OrderPolicy {
    fn default() -> Self {
        Self::from_lead_days(7)
    }
}

pub struct GroupOrderCommandHandler {
    store: Arc<EventStore<GroupOrderEvent>>,
    catalog: Arc<dyn ProductCatalog>,
    policy: OrderPolicy,
    retry: RetryConfig,
    metrics: Arc<Metrics>,
}

impl GroupOrderCommandHandler {
    pub fn new(
        store: Arc<EventStore<GroupOrderEvent>>,
        catalog: Arc<dyn ProductCatalog>,
        policy: OrderPolicy,
        retry: RetryConfig,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            store,
            catalog,
            policy,
            retry,
            metrics,
        }
    }

    /// Open a new group order seeded with the initiator's stake.
    pub async fn open(
        &self,
        initiator_id: Uuid,
        product_id: Uuid,
        target_qty: u32,
        initial_qty: u32,
    ) -> Result<GroupOrderAggregate, GroupOrderError> {
        let started = Instant::now();
        let result = self.try_open(initiator_id, product_id, target_qty, initial_qty).await;

        match &result {
            Ok(order) => {
                self.metrics.record_command("open", "ok", started.elapsed().as_secs_f64());
                tracing::info!(
                    order_id = %order.id,
                    product_id = %product_id,
                    initiator_id = %initiator_id,
                    target_qty = target_qty,
                    initial_qty = initial_qty,
                    status = ?order.status,
                    "group order opened"
                );
            }
            Err(err) => {
                if matches!(err, GroupOrderError::CapacityExceeded { .. }) {
                    self.metrics.record_capacity_rejection();
                }
                self.metrics.record_command("open", outcome_label(err), started.elapsed().as_secs_f64());
                tracing::warn!(
                    product_id = %product_id,
                    initiator_id = %initiator_id,
                    error = %err,
                    "open rejected"
                );
            }
        }

        result
    }

    async fn try_open(
        &self,
        initiator_id: Uuid,
        product_id: Uuid,
        target_qty: u32,
        initial_qty: u32,
    ) -> Result<GroupOrderAggregate, GroupOrderError> {
        let product = self
            .catalog
            .resolve(product_id)
            .await
            .map_err(|_| GroupOrderError::ProductNotFound(product_id))?;

        let delivery_date = Utc::now() + self.policy.delivery_lead;
        let events = GroupOrderAggregate::plan_open(
            ProductSnapshot::from(&product),
            target_qty,
            initiator_id,
            initial_qty,
            delivery_date,
        )?;

        let order_id = Uuid::new_v4();
        let envelopes = wrap_events(order_id, 0, events);
        let closes = contains_close(&envelopes);

        // Fold the batch into an aggregate before handing it to the store
        let order = GroupOrderAggregate::load_from_events(&envelopes)
            .map_err(|e| StoreError::Replay(e.to_string()))?;

        // A freshly drawn id has an empty stream; version 0 cannot conflict
        self.store.append_events(order_id, 0, envelopes).await?;

        self.metrics.record_order_opened();
        if closes {
            self.metrics.record_order_closed();
        }

        Ok(order)
    }

    /// Execute a command against an existing order, retrying the whole
    /// load/validate/append cycle when a concurrent writer wins the append.
    pub async fn execute(
        &self,
        order_id: Uuid,
        command: GroupOrderCommand,
    ) -> Result<GroupOrderAggregate, GroupOrderError> {
        let kind = command.kind();
        let started = Instant::now();

        let result = retry_on_transient(&self.retry, |_attempt| {
            let command = command.clone();
            async move { self.try_execute(order_id, command).await }
        })
        .await;

        match result {
            RetryResult::Success(order) => {
                self.metrics.record_command(kind, "ok", started.elapsed().as_secs_f64());
                tracing::info!(
                    order_id = %order_id,
                    command = kind,
                    current_qty = order.current_qty,
                    target_qty = order.target_qty,
                    status = ?order.status,
                    "command applied"
                );
                Ok(order)
            }
            RetryResult::PermanentFailure(err) => {
                if matches!(err, GroupOrderError::CapacityExceeded { .. }) {
                    self.metrics.record_capacity_rejection();
                }
                self.metrics.record_command(kind, outcome_label(&err), started.elapsed().as_secs_f64());
                tracing::warn!(
                    order_id = %order_id,
                    command = kind,
                    error = %err,
                    "command rejected"
                );
                Err(err)
            }
            RetryResult::Failed(_) => {
                self.metrics.record_command(kind, "conflict", started.elapsed().as_secs_f64());
                Err(GroupOrderError::Conflict(self.retry.max_attempts))
            }
        }
    }

    /// One optimistic attempt: load, validate, append with the loaded version.
    async fn try_execute(
        &self,
        order_id: Uuid,
        command: GroupOrderCommand,
    ) -> Result<GroupOrderAggregate, GroupOrderError> {
        let history = self.store.load_events(order_id).await;
        if history.is_empty() {
            return Err(GroupOrderError::OrderNotFound(order_id));
        }

        let order = GroupOrderAggregate::load_from_events(&history)
            .map_err(|e| StoreError::Replay(e.to_string()))?;
        let expected_version = order.version();

        let events = order.handle_command(&command)?;
        if events.is_empty() {
            // Idempotent no-op (e.g. modify to the current stake)
            return Ok(order);
        }

        let envelopes = wrap_events(order_id, expected_version, events);
        let closes = contains_close(&envelopes);

        let mut updated = order;
        for envelope in &envelopes {
            updated.apply_event(&envelope.event_data)?;
            updated.set_version(envelope.sequence_number);
        }

        match self.store.append_events(order_id, expected_version, envelopes).await {
            Ok(_) => {
                if closes {
                    self.metrics.record_order_closed();
                }
                Ok(updated)
            }
            Err(err) => {
                if matches!(err, StoreError::VersionConflict { .. }) {
                    self.metrics.record_append_conflict();
                }
                Err(err.into())
            }
        }
    }

    /// Latest committed state of one order.
    pub async fn get(&self, order_id: Uuid) -> Result<GroupOrderAggregate, GroupOrderError> {
        self.store
            .load_aggregate::<GroupOrderAggregate>(order_id)
            .await?
            .ok_or(GroupOrderError::OrderNotFound(order_id))
    }

    /// All orders, oldest first.
    pub async fn list(&self) -> Result<Vec<GroupOrderAggregate>, GroupOrderError> {
        let mut orders = Vec::new();
        for id in self.store.aggregate_ids().await {
            if let Some(order) = self.store.load_aggregate::<GroupOrderAggregate>(id).await? {
                orders.push(order);
            }
        }
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    /// Orders the vendor participates in, oldest first.
    pub async fn list_for(&self, vendor_id: Uuid) -> Result<Vec<GroupOrderAggregate>, GroupOrderError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|o| o.is_participant(vendor_id))
            .collect())
    }

    /// Full event history of one order, for the tracking timeline.
    pub async fn history(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<EventEnvelope<GroupOrderEvent>>, GroupOrderError> {
        let history = self.store.load_events(order_id).await;
        if history.is_empty() {
            return Err(GroupOrderError::OrderNotFound(order_id));
        }
        Ok(history)
    }
}

fn wrap_events(
    order_id: Uuid,
    base_version: i64,
    events: Vec<GroupOrderEvent>,
) -> Vec<EventEnvelope<GroupOrderEvent>> {
    let correlation_id = Uuid::new_v4();
    events
        .into_iter()
        .enumerate()
        .map(|(i, event)| {
            EventEnvelope::new(
                order_id,
                base_version + i as i64 + 1,
                event.kind().to_string(),
                event,
                correlation_id,
            )
        })
        .collect()
}

fn contains_close(envelopes: &[EventEnvelope<GroupOrderEvent>]) -> bool {
    envelopes
        .iter()
        .any(|e| matches!(e.event_data, GroupOrderEvent::Closed(_)))
}

fn outcome_label(err: &GroupOrderError) -> &'static str {
    match err {
        GroupOrderError::Store(_) => "error",
        GroupOrderError::Conflict(_) => "conflict",
        _ => "rejected",
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
