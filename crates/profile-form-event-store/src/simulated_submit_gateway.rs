//! Submit gateway that accepts every payload after a fixed delay.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use profile_form_core::error::DomainError;
use profile_form_core::gateway::SubmitGateway;

/// Delay applied when no other is configured.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(3000);

/// Gateway that waits `delay` and then echoes the payload back as accepted.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedSubmitGateway {
    delay: Duration,
}

impl SimulatedSubmitGateway {
    /// Creates a gateway that completes after `delay`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The configured completion delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedSubmitGateway {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

#[async_trait]
impl<P> SubmitGateway<P> for SimulatedSubmitGateway
where
    P: Send + 'static,
{
    async fn submit(&self, payload: P) -> Result<P, DomainError> {
        debug!(delay_ms = self.delay.as_millis(), "simulating submission");
        tokio::time::sleep(self.delay).await;
        Ok(payload)
    }
}
