//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::AppError;

/// Host bound when `HOST` is unset.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Port bound when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Submit delay when `SUBMIT_DELAY_MS` is unset.
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 3000;

/// Runtime configuration for the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// How long the submit gateway takes to accept a submission.
    pub submit_delay: Duration,
}

impl AppConfig {
    /// Reads `HOST`, `PORT` and `SUBMIT_DELAY_MS` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };

        let delay_ms = match lookup("SUBMIT_DELAY_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::Config(format!("SUBMIT_DELAY_MS must be a whole number: {e}"))
            })?,
            None => DEFAULT_SUBMIT_DELAY_MS,
        };

        Ok(Self {
            host,
            port,
            submit_delay: Duration::from_millis(delay_ms),
        })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
