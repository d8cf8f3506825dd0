use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use syn::Item;

use super::matcher::classify_trait;
use super::package::package_matches;
use super::types::RouteGroupDecl;
use crate::config::ProcessorConfig;

/// Walk a source tree and produce the set of route-group candidates.
///
/// The declaration index is the file system: every `.rs` file under `root`
/// is parsed and its items are walked depth-first, recursing into inline
/// `mod` blocks. The package of a declaration is its dot-joined module path
/// relative to the scan root (`api/users.rs` + `mod v2` → `api.users.v2`).
///
/// Files that fail to parse are skipped with a warning — they will fail the
/// host compile on their own, and one broken file must not hide the rest of
/// the tree from generation.
pub fn scan_dir(root: &Path, config: &ProcessorConfig) -> anyhow::Result<Vec<RouteGroupDecl>> {
    let mut files = Vec::new();
    collect_rs_files(root, &mut files)
        .with_context(|| format!("failed to read source tree at {root:?}"))?;
    files.sort();

    let mut decls = Vec::new();
    for file in &files {
        let package = file_package(root, file);
        let source = fs::read_to_string(file)
            .with_context(|| format!("failed to read source file {file:?}"))?;
        let parsed = match syn::parse_file(&source) {
            Ok(p) => p,
            Err(err) => {
                println!("⚠️  Skipping unparseable file {file:?}: {err}");
                continue;
            }
        };
        walk_items(&parsed.items, &package, config, &mut decls)?;
    }
    Ok(decls)
}

fn collect_rs_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out)?;
        } else if path.extension().is_some_and(|e| e == "rs") {
            out.push(path);
        }
    }
    Ok(())
}

/// Dot-joined package for a file, relative to the scan root.
///
/// Directory components become segments; the file stem is a segment too,
/// except for the crate/module roots (`lib.rs`, `main.rs`, `mod.rs`), which
/// belong to their directory's package.
fn file_package(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    let mut segments: Vec<String> = rel
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    let stem = rel
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !matches!(stem.as_str(), "lib" | "main" | "mod") {
        segments.push(stem);
    }
    segments.join(".")
}

/// Depth-first item walk. Recurses into nested modules regardless of what
/// encloses them, so interface declarations buried inside ordinary modules
/// are still discovered. Generic traits are always skipped; non-generic
/// traits found beside or beneath them are processed independently.
fn walk_items(
    items: &[Item],
    package: &str,
    config: &ProcessorConfig,
    out: &mut Vec<RouteGroupDecl>,
) -> anyhow::Result<()> {
    for item in items {
        match item {
            Item::Trait(t) => {
                if !t.generics.params.is_empty() {
                    continue;
                }
                if !package_matches(&config.packages, package) {
                    continue;
                }
                out.push(classify_trait(t, package)?);
            }
            Item::Mod(m) => {
                if let Some((_, nested)) = &m.content {
                    let nested_package = if package.is_empty() {
                        m.ident.to_string()
                    } else {
                        format!("{package}.{}", m.ident)
                    };
                    walk_items(nested, &nested_package, config, out)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}
