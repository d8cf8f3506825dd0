//! # Processor Configuration Module
//!
//! Generation-time configuration for the base-stub synthesizer, loaded once
//! per run from `httpexchange-processor.properties`.
//!
//! ## Lookup
//!
//! The file is located by walking upward from a start directory (typically the
//! build output or scan root) until a directory containing a build-system
//! marker (`Cargo.toml`) is found, bounded to [`MAX_SEARCH_DEPTH`] levels.
//! That directory is treated as the project root and the properties file is
//! read from it if present.
//!
//! ## Failure policy
//!
//! Lookup and parse failures are never fatal: a missing file, an unreadable
//! file, or a malformed individual value all fall back to defaults, so code
//! generation proceeds unless the author explicitly opts out with
//! `enabled=false`.
//!
//! ## Keys
//!
//! ```properties
//! enabled=true
//! prefix=
//! suffix=
//! generatedType=ABSTRACT_CLASS
//! packages=example.foo.*, example.bar
//! outputSubpackage=
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Maximum number of parent directories inspected while looking for the
/// project root.
pub const MAX_SEARCH_DEPTH: usize = 20;

/// File read from the detected project root.
pub const CONFIG_FILE_NAME: &str = "httpexchange-processor.properties";

/// Marker identifying a project root during the upward search.
const BUILD_MARKER: &str = "Cargo.toml";

/// Shape of the generated output. Only the abstract-trait form (the
/// abstract-class analog) is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratedType {
    /// A trait with default 501 method bodies for a controller to override.
    #[default]
    AbstractTrait,
}

/// Configuration for one generation run. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Master switch; `false` suppresses all output.
    pub enabled: bool,
    /// Prepended to the interface name when non-empty.
    pub prefix: String,
    /// Appended to the interface name when non-empty.
    pub suffix: String,
    /// Output shape; only `ABSTRACT_CLASS` is recognized.
    pub generated_type: GeneratedType,
    /// Package allow-list as glob patterns over dot-joined module paths.
    /// Empty matches everything.
    pub packages: Vec<String>,
    /// Extra subpackage appended to each interface's package on output.
    pub output_subpackage: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            enabled: true,
            prefix: String::new(),
            suffix: String::new(),
            generated_type: GeneratedType::AbstractTrait,
            packages: Vec::new(),
            output_subpackage: String::new(),
        }
    }
}

static RESOLVED: OnceLock<ProcessorConfig> = OnceLock::new();

impl ProcessorConfig {
    /// Resolve configuration for a run starting from `start_dir`.
    ///
    /// Walks up to find the project root, then reads the properties file if
    /// one exists. Every failure path yields defaults.
    pub fn resolve(start_dir: &Path) -> ProcessorConfig {
        let Some(root) = find_project_root(start_dir) else {
            return ProcessorConfig::default();
        };
        let file = root.join(CONFIG_FILE_NAME);
        match fs::read_to_string(&file) {
            Ok(text) => ProcessorConfig::from_properties(&text),
            Err(_) => ProcessorConfig::default(),
        }
    }

    /// Resolve once and memoize for the remainder of the process.
    ///
    /// Generation is single-threaded per build invocation; the `OnceLock`
    /// guards the lazy load for hosts that do not guarantee it.
    pub fn resolve_cached(start_dir: &Path) -> &'static ProcessorConfig {
        RESOLVED.get_or_init(|| ProcessorConfig::resolve(start_dir))
    }

    /// Parse a `key=value` properties document.
    ///
    /// Lines starting with `#` or `!` are comments. Unknown keys are ignored;
    /// malformed values fall back per field with a logged warning.
    pub fn from_properties(text: &str) -> ProcessorConfig {
        let mut cfg = ProcessorConfig::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!(line, "ignoring malformed property line");
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "enabled" => match value.parse::<bool>() {
                    Ok(v) => cfg.enabled = v,
                    Err(_) => {
                        tracing::warn!(value, "invalid `enabled` value, keeping default");
                    }
                },
                "prefix" => cfg.prefix = value.to_string(),
                "suffix" => cfg.suffix = value.to_string(),
                "generatedType" => match value {
                    "ABSTRACT_CLASS" => cfg.generated_type = GeneratedType::AbstractTrait,
                    other => {
                        tracing::warn!(value = other, "unknown `generatedType`, keeping default");
                    }
                },
                "packages" => {
                    cfg.packages = value
                        .split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "outputSubpackage" => cfg.output_subpackage = value.to_string(),
                _ => {}
            }
        }
        cfg
    }
}

/// Find the nearest ancestor directory (including `start` itself) containing
/// a build-system marker file, searching at most [`MAX_SEARCH_DEPTH`] levels.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    for _ in 0..=MAX_SEARCH_DEPTH {
        let d = dir?;
        if d.join(BUILD_MARKER).is_file() {
            return Some(d.to_path_buf());
        }
        dir = d.parent();
    }
    None
}
