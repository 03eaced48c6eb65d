//! Test gateways: `SubmitGateway` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use profile_form_core::error::DomainError;
use profile_form_core::gateway::SubmitGateway;
use tokio::sync::Semaphore;

/// A gateway that records every payload and echoes it back as accepted.
#[derive(Debug)]
pub struct RecordingSubmitGateway<P> {
    submitted: Mutex<Vec<P>>,
}

impl<P> RecordingSubmitGateway<P> {
    /// Creates a gateway with no recorded submissions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            submitted: Mutex::new(Vec::new()),
        }
    }
}

impl<P> Default for RecordingSubmitGateway<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone> RecordingSubmitGateway<P> {
    /// Returns a snapshot of every payload submitted so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn submitted(&self) -> Vec<P> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl<P> SubmitGateway<P> for RecordingSubmitGateway<P>
where
    P: Clone + Send + 'static,
{
    async fn submit(&self, payload: P) -> Result<P, DomainError> {
        self.submitted.lock().unwrap().push(payload.clone());
        Ok(payload)
    }
}

/// A gateway that rejects every submission with an infrastructure error.
#[derive(Debug)]
pub struct FailingSubmitGateway;

#[async_trait]
impl<P> SubmitGateway<P> for FailingSubmitGateway
where
    P: Send + 'static,
{
    async fn submit(&self, _payload: P) -> Result<P, DomainError> {
        Err(DomainError::Infrastructure("submit endpoint unavailable".into()))
    }
}

/// A gateway whose submissions stay in flight until the test releases them.
/// Each `release` lets exactly one pending submission complete.
#[derive(Debug)]
pub struct PendingSubmitGateway {
    releases: Semaphore,
}

impl PendingSubmitGateway {
    /// Creates a gateway with no releases granted.
    #[must_use]
    pub fn new() -> Self {
        Self {
            releases: Semaphore::new(0),
        }
    }

    /// Allows one in-flight or future submission to complete.
    pub fn release(&self) {
        self.releases.add_permits(1);
    }
}

impl Default for PendingSubmitGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<P> SubmitGateway<P> for PendingSubmitGateway
where
    P: Send + 'static,
{
    async fn submit(&self, payload: P) -> Result<P, DomainError> {
        let permit = self
            .releases
            .acquire()
            .await
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?;
        permit.forget();
        Ok(payload)
    }
}
