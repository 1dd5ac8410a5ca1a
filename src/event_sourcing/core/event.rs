use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

// ============================================================================
// Event Envelope - Event Metadata
// ============================================================================
//
// Wraps domain events with the metadata the store needs: identity, sequence
// number within the aggregate's stream, and a correlation id grouping all
// events emitted by a single command.
//
// ============================================================================

/// Generic Domain Event trait.
///
/// All domain events must implement this trait to be stored. The serde
/// bounds keep every stored event wire-ready for the API layer.
pub trait DomainEvent: Serialize + for<'de> Deserialize<'de> + Clone + Send + Sync {
    fn event_type() -> &'static str where Self: Sized;
}

/// Generic Event Envelope - wraps any domain event with metadata
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EventEnvelope<E> {
    pub event_id: Uuid,
    pub aggregate_id: Uuid,
    /// Position in the aggregate's stream, starting at 1.
    pub sequence_number: i64,

    pub event_type: String,
    pub event_data: E,

    /// Groups the events emitted by one command invocation.
    pub correlation_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        aggregate_id: Uuid,
        sequence_number: i64,
        event_type: String,
        event_data: E,
        correlation_id: Uuid,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            aggregate_id,
            sequence_number,
            event_type,
            event_data,
            correlation_id,
            timestamp: Utc::now(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, Clone, Debug)]
    struct TestEvent {
        data: String,
    }

    impl DomainEvent for TestEvent {
        fn event_type() -> &'static str { "TestEvent" }
    }

    #[test]
    fn test_event_envelope_creation() {
        let aggregate_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();

        let event = TestEvent {
            data: "test".to_string(),
        };

        let envelope = EventEnvelope::new(
            aggregate_id,
            1,
            TestEvent::event_type().to_string(),
            event,
            correlation_id,
        );

        assert_eq!(envelope.aggregate_id, aggregate_id);
        assert_eq!(envelope.sequence_number, 1);
        assert_eq!(envelope.event_type, "TestEvent");
        assert_eq!(envelope.correlation_id, correlation_id);
    }

    #[test]
    fn test_event_envelope_serialization() {
        let envelope = EventEnvelope::new(
            Uuid::new_v4(),
            3,
            "TestEvent".to_string(),
            TestEvent { data: "payload".to_string() },
            Uuid::new_v4(),
        );

        let json = serde_json::to_string(&envelope).unwrap();
        let deserialized: EventEnvelope<TestEvent> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.sequence_number, 3);
        assert_eq!(deserialized.event_data.data, "payload");
    }
}
