use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use super::naming::{generated_name, to_snake_case};
use super::templates::{write_base, write_mod_rs};
use crate::config::ProcessorConfig;
use crate::scan::{scan_dir, RouteGroupDecl};

/// One emitted base source unit.
#[derive(Debug, Clone)]
pub struct GeneratedBase {
    /// Originating interface, qualified
    pub interface: String,
    /// Output package (origin package plus `output_subpackage`)
    pub package: String,
    /// Generated trait name
    pub name: String,
    /// File the unit was written to
    pub path: PathBuf,
    /// Number of synthesized stubs
    pub stub_count: usize,
}

/// Build-time entry point: scan a source tree and synthesize base units.
pub fn generate(src_dir: &Path, out_dir: &Path, config: &ProcessorConfig) -> anyhow::Result<Vec<GeneratedBase>> {
    let decls = scan_dir(src_dir, config)?;
    generate_bases(&decls, config, out_dir)
}

/// Synthesize one base per declaration that needs generation.
///
/// Two interfaces resolving to the same generated name in the same output
/// package abort the pass — a silent overwrite would hide one of them.
pub fn generate_bases(
    decls: &[RouteGroupDecl],
    config: &ProcessorConfig,
    out_dir: &Path,
) -> anyhow::Result<Vec<GeneratedBase>> {
    if !config.enabled {
        println!("ℹ️  httpexchange generation disabled (enabled=false), skipping");
        return Ok(Vec::new());
    }

    let targets: Vec<&RouteGroupDecl> = decls.iter().filter(|d| d.needs_generation()).collect();

    // collision check before any file is touched
    let mut seen: HashMap<(String, String), &RouteGroupDecl> = HashMap::new();
    for decl in &targets {
        let key = (output_package(decl, config), generated_name(&decl.name, config));
        if let Some(previous) = seen.insert(key.clone(), decl) {
            bail!(
                "generated name collision: `{}` and `{}` both resolve to `{}` in package `{}`",
                previous.qualified_name(),
                decl.qualified_name(),
                key.1,
                key.0,
            );
        }
    }

    let mut generated = Vec::new();
    let mut modules_by_dir: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();

    for decl in targets {
        let package = output_package(decl, config);
        let name = generated_name(&decl.name, config);
        let dir = package_dir(out_dir, &package);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create output directory {dir:?}"))?;

        let module = to_snake_case(&name);
        let path = dir.join(format!("{module}.rs"));
        write_base(&path, decl, &name)?;

        modules_by_dir.entry(dir).or_default().push(module);
        generated.push(GeneratedBase {
            interface: decl.qualified_name(),
            package,
            name,
            path,
            stub_count: decl.matched_methods().count(),
        });
    }

    for (dir, modules) in &modules_by_dir {
        write_mod_rs(dir, modules)?;
    }

    Ok(generated)
}

/// Origin package with the configured output subpackage appended.
fn output_package(decl: &RouteGroupDecl, config: &ProcessorConfig) -> String {
    match (
        decl.package.is_empty(),
        config.output_subpackage.is_empty(),
    ) {
        (true, true) => String::new(),
        (true, false) => config.output_subpackage.clone(),
        (false, true) => decl.package.clone(),
        (false, false) => format!("{}.{}", decl.package, config.output_subpackage),
    }
}

fn package_dir(out_dir: &Path, package: &str) -> PathBuf {
    let mut dir = out_dir.to_path_buf();
    for segment in package.split('.').filter(|s| !s.is_empty()) {
        dir.push(segment);
    }
    dir
}
