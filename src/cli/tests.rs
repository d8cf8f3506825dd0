//! Unit tests for CLI command parsing

use crate::cli::{Cli, Commands};
use clap::Parser;

#[test]
fn generate_command_parses() {
    let cli = Cli::try_parse_from([
        "httpexchange-gen",
        "generate",
        "--dir",
        "src",
        "--out",
        "src/generated",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate { dir, out, config } => {
            assert_eq!(dir.to_string_lossy(), "src");
            assert_eq!(out.to_string_lossy(), "src/generated");
            assert!(config.is_none());
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn generate_accepts_explicit_config() {
    let cli = Cli::try_parse_from([
        "httpexchange-gen",
        "generate",
        "--dir",
        "src",
        "--out",
        "out",
        "--config",
        "httpexchange-processor.properties",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate { config, .. } => {
            assert_eq!(
                config.unwrap().to_string_lossy(),
                "httpexchange-processor.properties"
            );
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn scan_command_parses() {
    let cli = Cli::try_parse_from(["httpexchange-gen", "scan", "--dir", "src"]).unwrap();
    assert!(matches!(cli.command, Commands::Scan { .. }));
}

#[test]
fn missing_required_args_fail() {
    assert!(Cli::try_parse_from(["httpexchange-gen", "generate", "--dir", "src"]).is_err());
    assert!(Cli::try_parse_from(["httpexchange-gen"]).is_err());
}
