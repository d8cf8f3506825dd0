//! # httpexchange
//!
//! **httpexchange** turns route-annotated Rust trait declarations into two
//! artifacts: server-side base traits with not-implemented stubs, and
//! descriptor-driven HTTP clients with per-call timeout and retry handling.
//!
//! ## Overview
//!
//! A declarative HTTP interface is an ordinary trait whose methods carry
//! route markers:
//!
//! ```rust,ignore
//! #[http_exchange(path = "/api/v1")]
//! pub trait UserApi {
//!     #[get_exchange("/users/{id}")]
//!     fn get_user(&self, id: i64) -> httpexchange::Result<User>;
//!
//!     #[post_exchange("/users")]
//!     fn create_user(&self, #[body] user: User) -> httpexchange::Result<User>;
//! }
//! ```
//!
//! At build time the scanner walks a source tree, classifies such traits and
//! hands them to the generator, which writes one base trait per interface.
//! Every stub answers with a structured not-implemented error until the
//! server author overrides it, so forgotten endpoints fail loudly instead of
//! silently.
//!
//! At runtime the same declarations condense into [`client::ExchangeDescriptor`]
//! tables; a [`client::ClientProxy`] binds call arguments into a request,
//! runs the filter chain and dispatches over `reqwest`, in either async or
//! blocking style.
//!
//! ## Architecture
//!
//! - **[`scan`]** - Source scanning and route-marker classification (`syn`)
//! - **[`generator`]** - Base-trait synthesis from scanned declarations (Askama)
//! - **[`config`]** - Properties-file discovery and parsing for the generator
//! - **[`client`]** - Descriptor tables, dispatch proxy, filters, registry
//! - **[`cli`]** - The `httpexchange-gen` command-line frontend
//! - **[`error`]** - Runtime failure taxonomy ([`ExchangeError`])
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(httpexchange-gen)
//!     participant Scan as scan::scan_dir
//!     participant Classify as scan::classify_trait
//!     participant Templates as generator::templates
//!     participant FS as File System
//!
//!     User->>CLI: httpexchange-gen generate<br/>--dir src --out src/generated
//!     CLI->>Scan: scan_dir(src, config)
//!     Scan->>Scan: Parse .rs files (syn)
//!     Scan->>Classify: classify_trait(item, package)
//!     Classify-->>Scan: Vec<RouteGroupDecl>
//!     Scan-->>CLI: declarations
//!     CLI->>Templates: render base trait per interface
//!     Templates->>FS: <out>/<package>/<name>_base.rs + mod.rs
//! ```
//!
//! ## Timeouts
//!
//! Every client call resolves a read deadline from the reserved
//! `X-HttpExchange-Request-Timeout` header (per call) or the configured
//! default (per client); a value ≤ 0 disables the deadline. The header is
//! consumed client-side and never sent. See [`client::TimeoutFilter`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use httpexchange::client::{build_client, CallArgs, ExchangeDescriptor, TransportConfig};
//!
//! let descriptor = ExchangeDescriptor::from_decl(&decl);
//! let client = build_client(descriptor, TransportConfig::new("http://localhost:8080"))?;
//! let user: User = client.invoke("get_user", CallArgs::new().arg("id", 42)).await?;
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod scan;

pub use client::{build_client, CallArgs, ClientProxy, ClientRegistry, ClientsConfig};
pub use config::ProcessorConfig;
pub use error::{ExchangeError, Result};
