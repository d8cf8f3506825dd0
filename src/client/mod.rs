//! # Client Module
//!
//! Runtime dispatch for declared HTTP interfaces. The scanner's output is
//! condensed into a per-interface [`ExchangeDescriptor`] table, and a
//! [`ClientProxy`] drives the whole pipeline for each call:
//!
//! 1. Resolve the method descriptor and bind arguments (path, query, header,
//!    body) into a [`RequestContext`]
//! 2. Run the filter chain; the built-in [`TimeoutFilter`] resolves the
//!    effective deadline from the reserved header or the configured default
//! 3. Send over the shared transport, spending the retry budget on transport
//!    failures and configured retryable statuses
//! 4. Map the response: 2xx deserializes, anything else is a status error
//!
//! Both call styles — `invoke` (async) and `invoke_blocking` — share the
//! same descriptor table and the same pipeline, so a call behaves
//! identically whichever style dispatched it.

mod descriptor;
mod filter;
mod proxy;
mod registry;
mod transport;

pub use descriptor::{Binding, ExchangeDescriptor, MethodDescriptor};
pub use filter::{ExchangeFilter, RetryPolicy, TimeoutFilter, TIMEOUT_HEADER};
pub use proxy::{build_client, CallArgs, ClientProxy, RequestContext};
pub use registry::{name_matches, ClientEntry, ClientRegistry, ClientsConfig};
pub use transport::{TlsConfig, TransportConfig};
