use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::ProcessorConfig;
use crate::generator;
use crate::scan;

#[derive(Parser)]
#[command(name = "httpexchange-gen")]
#[command(about = "httpexchange code generator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate server-side base stubs from annotated interface traits
    Generate {
        /// Source directory to scan for declarations
        #[arg(short, long)]
        dir: PathBuf,

        /// Output directory for generated modules
        #[arg(short, long)]
        out: PathBuf,

        /// Explicit properties file; otherwise resolved upward from --dir
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the interfaces and routes the scanner would pick up
    Scan {
        /// Source directory to scan for declarations
        #[arg(short, long)]
        dir: PathBuf,

        /// Explicit properties file; otherwise resolved upward from --dir
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Generate { dir, out, config } => {
            let config = load_config(config.as_deref(), dir)?;
            let generated = generator::generate(dir, out, &config)?;
            println!(
                "✅ Generated {} base module(s) in {}",
                generated.len(),
                out.display()
            );
            Ok(())
        }
        Commands::Scan { dir, config } => {
            let config = load_config(config.as_deref(), dir)?;
            let decls = scan::scan_dir(dir, &config)?;
            for decl in decls.iter().filter(|d| d.needs_generation()) {
                println!("{}", decl.qualified_name());
                for m in decl.matched_methods() {
                    let verb = m.verb.map(|v| v.as_method().to_string()).unwrap_or_default();
                    println!("  {verb} {}  ({})", m.path.as_deref().unwrap_or("/"), m.name);
                }
            }
            Ok(())
        }
    }
}

fn load_config(explicit: Option<&std::path::Path>, dir: &std::path::Path) -> anyhow::Result<ProcessorConfig> {
    match explicit {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            Ok(ProcessorConfig::from_properties(&text))
        }
        // one resolution per process; repeated subcommand plumbing reuses it
        None => Ok(ProcessorConfig::resolve_cached(dir).clone()),
    }
}
