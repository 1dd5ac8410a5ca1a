use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::event_sourcing::core::{Aggregate, DomainEvent, EventEnvelope};

// ============================================================================
// Generic Event Store - Repository for Events
// ============================================================================
//
// Embedded event store holding one append-only stream per aggregate.
//
// Responsibilities:
// 1. Append events atomically (all events of a command, or none)
// 2. Load event history for aggregates
// 3. Ensure optimistic concurrency control: an append carries the version
//    the writer loaded, and fails with VersionConflict if another writer
//    advanced the stream in between
//
// The version check and the append happen under one write lock, so the
// read-check-write window the conflict protects against cannot reopen
// between them. No await happens while the lock is held.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("version conflict on {aggregate_id}: expected {expected}, current {current}")]
    VersionConflict {
        aggregate_id: Uuid,
        expected: i64,
        current: i64,
    },

    #[error("cannot append an empty event batch")]
    EmptyBatch,

    #[error("event replay failed: {0}")]
    Replay(String),
}

pub struct EventStore<E: DomainEvent> {
    streams: RwLock<HashMap<Uuid, Vec<EventEnvelope<E>>>>,
}

impl<E: DomainEvent> EventStore<E> {
    pub fn new() -> Self {
        Self {
            streams: RwLock::new(HashMap::new()),
        }
    }

    /// Append events to an aggregate's stream.
    ///
    /// `expected_version` is the stream version the caller loaded before
    /// producing `events`. Returns the new version after appending.
    pub async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: Vec<EventEnvelope<E>>,
    ) -> Result<i64, StoreError> {
        if events.is_empty() {
            return Err(StoreError::EmptyBatch);
        }

        let mut streams = self.streams.write().await;
        let stream = streams.entry(aggregate_id).or_default();

        let current = stream.last().map(|e| e.sequence_number).unwrap_or(0);
        if current != expected_version {
            return Err(StoreError::VersionConflict {
                aggregate_id,
                expected: expected_version,
                current,
            });
        }

        let new_version = expected_version + events.len() as i64;
        stream.extend(events);

        tracing::debug!(
            aggregate_id = %aggregate_id,
            new_version = new_version,
            "appended events to stream"
        );

        Ok(new_version)
    }

    /// Load all events for an aggregate, in sequence order.
    pub async fn load_events(&self, aggregate_id: Uuid) -> Vec<EventEnvelope<E>> {
        let streams = self.streams.read().await;
        streams.get(&aggregate_id).cloned().unwrap_or_default()
    }

    /// Current version of an aggregate's stream (0 = no events yet).
    pub async fn current_version(&self, aggregate_id: Uuid) -> i64 {
        let streams = self.streams.read().await;
        streams
            .get(&aggregate_id)
            .and_then(|s| s.last())
            .map(|e| e.sequence_number)
            .unwrap_or(0)
    }

    /// Rebuild an aggregate from its stream. `None` when the stream is empty.
    pub async fn load_aggregate<A>(&self, aggregate_id: Uuid) -> Result<Option<A>, StoreError>
    where
        A: Aggregate<Event = E>,
        <A as Aggregate>::Error: std::fmt::Display,
    {
        let events = self.load_events(aggregate_id).await;
        if events.is_empty() {
            return Ok(None);
        }

        A::load_from_events(&events)
            .map(Some)
            .map_err(|e| StoreError::Replay(e.to_string()))
    }

    /// Ids of every aggregate with at least one event.
    pub async fn aggregate_ids(&self) -> Vec<Uuid> {
        let streams = self.streams.read().await;
        streams
            .iter()
            .filter(|(_, s)| !s.is_empty())
            .map(|(id, _)| *id)
            .collect()
    }
}

impl<E: DomainEvent> Default for EventStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
