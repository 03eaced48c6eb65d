//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// An event-sourced aggregate: state is rebuilt by applying its stream and
/// changed by recording new, uncommitted events.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate records and applies.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Number of stored events applied during reconstitution.
    fn version(&self) -> i64;

    /// Applies a stored event, advancing the version.
    fn apply(&mut self, event: &Self::Event);

    /// Events recorded since the aggregate was loaded.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Clears uncommitted events after persistence.
    fn clear_uncommitted_events(&mut self);

    /// Sequence number the next recorded event will carry.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version() + self.uncommitted_events().len() as i64 + 1
    }

    /// `true` until the aggregate has any stored or recorded event.
    fn is_new(&self) -> bool {
        self.version() == 0 && self.uncommitted_events().is_empty()
    }
}
