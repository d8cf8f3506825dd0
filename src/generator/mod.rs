//! # Generator Module
//!
//! Build-time synthesis of server-side base units from scanned interface
//! declarations.
//!
//! ## What gets generated
//!
//! For every candidate that needs generation — it carries the group marker or
//! has at least one annotated, non-default method — one source unit is
//! rendered through an Askama template and written under the output root:
//!
//! ```text
//! <out>/<package path>/<snake_name>.rs   # trait with 501 default bodies
//! <out>/<package path>/mod.rs            # module declarations per directory
//! ```
//!
//! A server controller implements the generated trait and overrides the
//! methods it supports; everything left in place fails loudly and identically
//! with `ExchangeError::NotImplemented`.
//!
//! ## Policies
//!
//! - Naming: `<Name>Base` by default, `<prefix><Name><suffix>` when either is
//!   configured; pure and deterministic.
//! - Visibility mirrors the origin: public interface, public base.
//! - Colliding generated names within one output package abort the pass.
//! - Default-bodied methods are never synthesized, even when annotated.
//! - Write failures are fatal; configuration problems never are.
//!
//! ## Flow
//!
//! ```text
//! source tree → scan::scan_dir → RouteGroupDecl[] → generate_bases → files
//! ```

mod naming;
mod project;
mod templates;
#[cfg(test)]
mod tests;

pub use naming::{generated_name, to_snake_case};
pub use project::{generate, generate_bases, GeneratedBase};
pub use templates::{write_base, BaseTemplateData, ModRsTemplateData, StubMethod};
