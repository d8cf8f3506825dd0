use std::time::Duration;

use serde::Deserialize;

use super::proxy::RequestContext;
use crate::error::ExchangeError;

/// Reserved request header carrying a per-call read timeout in milliseconds.
///
/// The header is consumed by [`TimeoutFilter`] and never reaches the wire.
pub const TIMEOUT_HEADER: &str = "X-HttpExchange-Request-Timeout";

/// Hook invoked around every dispatched request.
///
/// `before` may rewrite the outgoing [`RequestContext`] or abort the call by
/// returning an error; `after` observes the outcome of each attempt.
pub trait ExchangeFilter: Send + Sync {
    fn before(&self, _ctx: &mut RequestContext) -> crate::Result<()> {
        Ok(())
    }

    /// `status` is `None` when the attempt failed before a response arrived.
    fn after(&self, _ctx: &RequestContext, _status: Option<u16>, _latency: Duration) {}
}

/// Resolves the effective read deadline for a call.
///
/// The reserved header wins over the configured default; a resolved value
/// ≤ 0 disables the deadline entirely.
pub struct TimeoutFilter {
    default_timeout_ms: i64,
}

impl TimeoutFilter {
    pub fn new(default_timeout_ms: i64) -> Self {
        TimeoutFilter { default_timeout_ms }
    }
}

impl ExchangeFilter for TimeoutFilter {
    fn before(&self, ctx: &mut RequestContext) -> crate::Result<()> {
        let mut resolved = self.default_timeout_ms;
        let mut keep = Vec::with_capacity(ctx.headers.len());
        for (name, value) in ctx.headers.drain(..) {
            if name.eq_ignore_ascii_case(TIMEOUT_HEADER) {
                match value.trim().parse::<i64>() {
                    Ok(ms) => resolved = ms,
                    Err(_) => {
                        return Err(ExchangeError::invocation(format!(
                            "invalid {TIMEOUT_HEADER} value: {value:?}"
                        )));
                    }
                }
            } else {
                keep.push((name, value));
            }
        }
        ctx.headers = keep;
        ctx.timeout_ms = (resolved > 0).then_some(resolved);
        Ok(())
    }
}

/// Client-side retry budget.
///
/// `max_attempts` counts the initial attempt, so `max_attempts: 1` means no
/// retry. Transport failures always qualify; response statuses only retry
/// when listed in `retry_on_status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_on_status: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            retry_on_status: vec![502, 503, 504],
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        RetryPolicy {
            max_attempts,
            ..RetryPolicy::default()
        }
    }

    pub fn on_status(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.retry_on_status = statuses.into_iter().collect();
        self
    }

    pub(crate) fn wants_retry(&self, outcome: &crate::Result<(u16, String)>) -> bool {
        match outcome {
            Ok((status, _)) => self.retry_on_status.contains(status),
            Err(e) => e.is_transport_failure(),
        }
    }
}
