//! # Interface Scanner Module
//!
//! Discovery side of the pipeline: walks a tree of Rust source files, parses
//! them with `syn`, and produces [`RouteGroupDecl`] candidates — trait
//! declarations carrying the route-group marker or route-verb markers.
//!
//! ## Rules
//!
//! - Only trait declarations are candidates; generic traits are always
//!   skipped, even when their methods are annotated.
//! - Traversal recurses into nested modules regardless of the enclosing item,
//!   so a trait declared deep inside ordinary modules is still found.
//! - The package allow-list from [`ProcessorConfig`](crate::config::ProcessorConfig)
//!   is applied during the walk; an empty list is permissive.
//! - A trait with no marker and no annotated methods is recorded but yields
//!   no generated output — the default ignore path, not an error.
//!
//! The same scan result feeds both pipelines: the
//! [`generator`](crate::generator) consumes it at build time and
//! [`ExchangeDescriptor`](crate::client::ExchangeDescriptor) derives dispatch
//! tables from it at registration time.

mod matcher;
mod package;
mod types;
mod walk;

pub use matcher::{classify_trait, render_type};
pub use package::package_matches;
pub use types::{
    path_variables, BindingLocation, ParamBinding, RouteGroupDecl, RouteMethod, Verb,
};
pub use walk::scan_dir;
