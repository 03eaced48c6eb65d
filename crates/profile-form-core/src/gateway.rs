//! Submit gateway abstraction.
//!
//! The gateway stands between a validated form and wherever its values
//! go. The form only ever talks to this trait; the production adapter and
//! the test doubles live in other crates.

use async_trait::async_trait;

use crate::error::DomainError;

/// Asynchronous submission of a validated payload.
#[async_trait]
pub trait SubmitGateway<P>: Send + Sync
where
    P: Send + 'static,
{
    /// Submits `payload`, resolving to the accepted payload once the
    /// submission completes.
    async fn submit(&self, payload: P) -> Result<P, DomainError>;
}
