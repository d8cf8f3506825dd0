//! # Error Module
//!
//! Typed failures for the runtime dispatch path. Generation-time tooling uses
//! `anyhow` with context chains instead; the two never mix — a generation
//! failure aborts the build long before any client exists.
//!
//! Every variant is surfaced to the immediate caller. The only transparent
//! path is cancellation-driven cleanup after a deadline expires: the in-flight
//! request is dropped and the caller sees a single [`ExchangeError::Timeout`].

use std::fmt;

/// Result alias used across the runtime client surface and by generated base
/// stubs (`httpexchange::Result<T>`).
pub type Result<T, E = ExchangeError> = std::result::Result<T, E>;

/// Failure taxonomy for declarative HTTP exchange clients.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// A generated server-side stub was invoked without being overridden.
    ///
    /// Carries the qualified endpoint name so every unimplemented endpoint
    /// fails loudly and identically (the 501 analog).
    #[error("not implemented: {endpoint}")]
    NotImplemented {
        /// Qualified endpoint, e.g. `UserApi::get_user`
        endpoint: String,
    },

    /// The per-call deadline expired before a response arrived.
    ///
    /// Shaped like an I/O failure regardless of call style; carries the
    /// configured timeout for diagnostics.
    #[error("request timeout after {timeout_ms} ms: {url}")]
    Timeout {
        /// The deadline that expired, in milliseconds
        timeout_ms: i64,
        /// Target URL of the cancelled request
        url: String,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code
        status: u16,
        /// Response body, kept verbatim for diagnostics
        body: String,
    },

    /// Connection or I/O failure in the underlying transport.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The call did not match the method descriptor: unknown method name,
    /// unbound path variable, or an argument with no binding.
    #[error("invalid invocation: {0}")]
    Invocation(String),

    /// Client-side configuration problem (no client registered, bad base
    /// URL, unusable TLS material).
    #[error("configuration error: {0}")]
    Config(String),

    /// The response body could not be deserialized into the declared type.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ExchangeError {
    /// Structured 501 for generated base stubs.
    pub fn not_implemented(endpoint: impl Into<String>) -> Self {
        ExchangeError::NotImplemented {
            endpoint: endpoint.into(),
        }
    }

    pub fn invocation(msg: impl fmt::Display) -> Self {
        ExchangeError::Invocation(msg.to_string())
    }

    pub fn config(msg: impl fmt::Display) -> Self {
        ExchangeError::Config(msg.to_string())
    }

    /// HTTP status this error maps to when it crosses a server boundary.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ExchangeError::NotImplemented { .. } => Some(501),
            ExchangeError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a retry budget may be spent on this failure.
    ///
    /// Network errors and timeouts are retryable; configured retryable
    /// statuses are decided by the retry policy, not here.
    pub(crate) fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            ExchangeError::Transport(_) | ExchangeError::Timeout { .. }
        )
    }
}
