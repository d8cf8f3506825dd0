//! # CLI Module
//!
//! Command-line interface for the httpexchange code generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Scan a source tree for route-annotated interface traits and write the
//! server-side base modules:
//!
//! ```bash
//! httpexchange-gen generate --dir src --out src/generated
//! ```
//!
//! Options:
//! - `--dir <DIR>` - Source directory to scan (required)
//! - `--out <DIR>` - Output directory for generated modules (required)
//! - `--config <FILE>` - Explicit properties file; otherwise resolved by
//!   walking up from `--dir`
//!
//! ### `scan`
//!
//! Print the interfaces and routes the scanner picks up, without writing
//! anything:
//!
//! ```bash
//! httpexchange-gen scan --dir src
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use httpexchange::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! run_cli(cli)?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands};
