//! Domain event abstractions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name for deserialization routing.
    pub event_type: String,
    /// Stream this event belongs to.
    pub aggregate_id: Uuid,
    /// Position of the event in its stream, starting at 1.
    pub sequence_number: i64,
    /// Correlation ID of the command that produced the event.
    pub correlation_id: Uuid,
    /// Causation ID; commands are the only cause, so this equals the
    /// correlation ID.
    pub causation_id: Uuid,
    /// Time the event was recorded.
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Metadata for a new event recorded now by the command `correlation_id`.
    #[must_use]
    pub fn stamp(
        event_type: &str,
        aggregate_id: Uuid,
        sequence_number: i64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_owned(),
            aggregate_id,
            sequence_number,
            correlation_id,
            causation_id: correlation_id,
            occurred_at: clock.now(),
        }
    }
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name (used for serialization routing).
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;
}
