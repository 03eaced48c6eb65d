//! Shared test mocks and utilities for the profile form.

mod clock;
mod gateway;
mod repository;

pub use clock::FixedClock;
pub use gateway::{FailingSubmitGateway, PendingSubmitGateway, RecordingSubmitGateway};
pub use repository::{
    EmptyEventRepository, FailingEventRepository, RecordingEventRepository, stored_event,
};
