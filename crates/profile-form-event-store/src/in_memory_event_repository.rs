//! In-memory implementation of the `EventRepository` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use profile_form_core::error::DomainError;
use profile_form_core::repository::{EventRepository, StoredEvent};

/// Event repository holding every aggregate stream in process memory.
///
/// Streams live until they are deleted or the repository is dropped; nothing
/// is persisted across restarts.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    streams: RwLock<HashMap<Uuid, Vec<StoredEvent>>>,
}

impl InMemoryEventRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn last_sequence(streams: &HashMap<Uuid, Vec<StoredEvent>>, aggregate_id: Uuid) -> i64 {
    streams
        .get(&aggregate_id)
        .and_then(|stream| stream.last())
        .map_or(0, |event| event.sequence_number)
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.streams.read().await;
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut streams = self.streams.write().await;
        let actual = last_sequence(&streams, aggregate_id);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        let mut next = actual + 1;
        for event in events {
            if event.sequence_number != next {
                return Err(DomainError::ConcurrencyConflict {
                    aggregate_id,
                    expected: next,
                    actual: event.sequence_number,
                });
            }
            next += 1;
        }

        streams
            .entry(aggregate_id)
            .or_default()
            .extend_from_slice(events);
        debug!(%aggregate_id, appended = events.len(), version = next - 1, "events appended");
        Ok(())
    }

    async fn delete_stream(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
    ) -> Result<(), DomainError> {
        let mut streams = self.streams.write().await;
        if !streams.contains_key(&aggregate_id) {
            return Ok(());
        }

        let actual = last_sequence(&streams, aggregate_id);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        streams.remove(&aggregate_id);
        debug!(%aggregate_id, version = actual, "stream deleted");
        Ok(())
    }
}
