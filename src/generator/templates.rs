use askama::Template;
use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::scan::{RouteGroupDecl, RouteMethod};

/// One synthesized stub, prerendered to source-text fragments so the template
/// stays declarative.
#[derive(Debug, Clone)]
pub struct StubMethod {
    /// Method name
    pub name: String,
    /// Full argument list including the receiver, e.g. `&self, id: i64`
    pub args: String,
    /// Rendered return type; empty for `()`
    pub ret: String,
    /// Qualified endpoint used in the 501 message, e.g. `UserApi::get_user`
    pub endpoint: String,
}

/// Template data for one generated base source unit.
///
/// The stub bodies return the structured 501 error; the generated trait
/// expects `Result` returns whose error type converts from
/// [`ExchangeError`](crate::ExchangeError).
#[derive(Template)]
#[template(path = "base.rs.txt", escape = "none")]
pub struct BaseTemplateData {
    /// Generated trait name (after the naming policy)
    pub name: String,
    /// Qualified name of the originating interface
    pub qualified: String,
    /// `pub ` when the origin is public, empty otherwise
    pub vis: String,
    /// Synthesized stubs, one per matched method
    pub methods: Vec<StubMethod>,
}

/// Template data for the per-directory `mod.rs` listing generated modules.
#[derive(Template)]
#[template(path = "mod.rs.txt", escape = "none")]
pub struct ModRsTemplateData {
    /// Module names to declare
    pub modules: Vec<String>,
}

impl StubMethod {
    pub fn from_route_method(m: &RouteMethod, interface: &str) -> StubMethod {
        let mut args = String::from("&self");
        for p in &m.params {
            args.push_str(", ");
            args.push_str(&p.name);
            args.push_str(": ");
            args.push_str(&p.ty);
        }
        StubMethod {
            name: m.name.clone(),
            args,
            ret: m.ret.clone().unwrap_or_default(),
            endpoint: format!("{interface}::{}", m.name),
        }
    }
}

/// Write one generated base source unit.
///
/// A write failure is build-breaking: the error carries the path and aborts
/// the generation pass.
pub fn write_base(path: &Path, decl: &RouteGroupDecl, generated_name: &str) -> anyhow::Result<()> {
    let methods = decl
        .matched_methods()
        .map(|m| StubMethod::from_route_method(m, &decl.name))
        .collect();
    let rendered = BaseTemplateData {
        name: generated_name.to_string(),
        qualified: decl.qualified_name(),
        vis: if decl.is_public {
            "pub ".into()
        } else {
            String::new()
        },
        methods,
    }
    .render()
    .with_context(|| format!("failed to render base for `{}`", decl.qualified_name()))?;
    fs::write(path, rendered)
        .with_context(|| format!("failed to write generated base to {path:?}"))?;
    println!("✅ Generated base: {path:?}");
    Ok(())
}

/// Write a `mod.rs` declaring the generated modules of one output directory.
pub(crate) fn write_mod_rs(dir: &Path, modules: &[String]) -> anyhow::Result<()> {
    let path = dir.join("mod.rs");
    let rendered = ModRsTemplateData {
        modules: modules.to_vec(),
    }
    .render()
    .context("failed to render mod.rs")?;
    fs::write(&path, rendered).with_context(|| format!("failed to write {path:?}"))?;
    println!("✅ Updated mod.rs → {path:?}");
    Ok(())
}
