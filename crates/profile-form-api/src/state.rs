//! Shared application state.

use std::fmt;
use std::sync::Arc;

use profile_form::domain::values::FormValues;
use profile_form_core::clock::Clock;
use profile_form_core::gateway::SubmitGateway;
use profile_form_core::repository::EventRepository;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock stamping every event.
    pub clock: Arc<dyn Clock>,
    /// Store holding mounted form streams.
    pub event_repository: Arc<dyn EventRepository>,
    /// Gateway completing submissions.
    pub submit_gateway: Arc<dyn SubmitGateway<FormValues>>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        event_repository: Arc<dyn EventRepository>,
        submit_gateway: Arc<dyn SubmitGateway<FormValues>>,
    ) -> Self {
        Self {
            clock,
            event_repository,
            submit_gateway,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
