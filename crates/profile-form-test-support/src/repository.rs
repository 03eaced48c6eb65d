//! Test repositories: mock `EventRepository` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use profile_form_core::error::DomainError;
use profile_form_core::repository::{EventRepository, StoredEvent};
use uuid::Uuid;

/// Builds a `StoredEvent` with a JSON payload and fresh identifiers.
#[must_use]
pub fn stored_event(
    aggregate_id: Uuid,
    sequence_number: i64,
    payload: serde_json::Value,
) -> StoredEvent {
    StoredEvent {
        event_id: Uuid::new_v4(),
        aggregate_id,
        event_type: "TestEvent".to_owned(),
        payload,
        sequence_number,
        correlation_id: Uuid::new_v4(),
        causation_id: Uuid::new_v4(),
        occurred_at: Utc::now(),
    }
}

/// An event repository that records all `append_events` calls. Returns the
/// configured events from `load_events` on every call. Appends succeed unless
/// conflicts were queued with [`RecordingEventRepository::with_conflicts`].
#[derive(Debug)]
pub struct RecordingEventRepository {
    load_result: Mutex<Vec<StoredEvent>>,
    appended: Mutex<Vec<(Uuid, i64, Vec<StoredEvent>)>>,
    deleted: Mutex<Vec<(Uuid, i64)>>,
    conflicts_remaining: Mutex<usize>,
}

impl RecordingEventRepository {
    /// Creates a recording repository that returns `load_result` from every
    /// `load_events` call. Use `FailingEventRepository` for error scenarios.
    #[must_use]
    pub fn new(load_result: Vec<StoredEvent>) -> Self {
        Self::with_conflicts(load_result, 0)
    }

    /// Like [`RecordingEventRepository::new`], but the first `conflicts`
    /// appends fail with `DomainError::ConcurrencyConflict` and are not
    /// recorded.
    #[must_use]
    pub fn with_conflicts(load_result: Vec<StoredEvent>, conflicts: usize) -> Self {
        Self {
            load_result: Mutex::new(load_result),
            appended: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            conflicts_remaining: Mutex::new(conflicts),
        }
    }

    /// Returns a snapshot of all events that were appended.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_events(&self) -> Vec<(Uuid, i64, Vec<StoredEvent>)> {
        self.appended.lock().unwrap().clone()
    }

    /// Returns every `(aggregate_id, expected_version)` passed to
    /// `delete_stream`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn deleted_streams(&self) -> Vec<(Uuid, i64)> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventRepository for RecordingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self.load_result.lock().unwrap().clone())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        {
            let mut remaining = self.conflicts_remaining.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DomainError::ConcurrencyConflict {
                    aggregate_id,
                    expected: expected_version,
                    actual: expected_version + 1,
                });
            }
        }
        self.appended
            .lock()
            .unwrap()
            .push((aggregate_id, expected_version, events.to_vec()));
        Ok(())
    }

    async fn delete_stream(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
    ) -> Result<(), DomainError> {
        self.deleted
            .lock()
            .unwrap()
            .push((aggregate_id, expected_version));
        Ok(())
    }
}

/// An event repository that always returns an empty event list and silently
/// accepts appends and deletions. Useful for "form not found" scenarios and mounting.
#[derive(Debug)]
pub struct EmptyEventRepository;

#[async_trait]
impl EventRepository for EmptyEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(vec![])
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Ok(())
    }

    async fn delete_stream(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
    ) -> Result<(), DomainError> {
        Ok(())
    }
}

/// An event repository whose store is unreachable: every call returns an
/// infrastructure error.
#[derive(Debug)]
pub struct FailingEventRepository;

#[async_trait]
impl EventRepository for FailingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::Infrastructure("event store unavailable".into()))
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("event store unavailable".into()))
    }

    async fn delete_stream(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("event store unavailable".into()))
    }
}
