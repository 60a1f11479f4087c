//! Error types shared across the crate.
//!
//! None of these are fatal: pad writes and service calls are expected to
//! fail now and then, and every caller in the core degrades gracefully.

use thiserror::Error;

use crate::PadId;

/// Failure reported by the device port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    /// The device is not connected (or went away).
    #[error("pad device is disconnected")]
    Disconnected,

    /// A single LED write was rejected.
    #[error("failed to write pad {pad}: {reason}")]
    Write { pad: PadId, reason: String },

    /// Subscribing to pad events failed.
    #[error("failed to subscribe to pad events: {0}")]
    Subscribe(String),
}

/// Failure reported by the application-state or action service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service could not be reached or timed out.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something other than "ok".
    #[error("{action} on {target} was rejected: {reply}")]
    Rejected {
        action: &'static str,
        target: String,
        reply: String,
    },

    /// The reply could not be decoded.
    #[error("malformed service reply: {0}")]
    Malformed(String),
}

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
