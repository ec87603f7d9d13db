//! CLI module for urltrace.
//!
//! Commands:
//! - scan: analyse every supported file under one or more roots
//! - file: analyse a single file
//! - patterns: print the effective call patterns

pub mod format;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::{UrlTraceConfig, CONFIG_FILE_NAME};
use crate::scan::{analyze_file, scan};

#[derive(Parser)]
#[command(name = "urltrace")]
#[command(about = "urltrace - find HTTP client calls and the endpoints they target", long_about = None)]
pub struct Cli {
    /// Config file (default: ./urltrace.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan directories for HTTP client call sites
    Scan {
        /// Directories or files to scan
        #[arg(default_value = ".")]
        roots: Vec<PathBuf>,
    },

    /// Analyse a single file
    File {
        /// Source file (.js, .jsx, .ts, .tsx, ...)
        path: PathBuf,
    },

    /// Print the call patterns in effect
    Patterns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Resolve the config: an explicit path must exist, the default one may not.
pub fn load_config(path: Option<&Path>) -> Result<UrlTraceConfig> {
    match path {
        Some(path) => UrlTraceConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(UrlTraceConfig::load_or_default(Path::new(CONFIG_FILE_NAME))?),
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan { roots } => {
            let report = scan(&roots, &config);
            match cli.format {
                OutputFormat::Text => print!("{}", format::format_scan(&report)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }

        Commands::File { path } => {
            let report = analyze_file(&path, &config.analyzer())
                .with_context(|| format!("failed to analyse {}", path.display()))?;
            match cli.format {
                OutputFormat::Text => {
                    if report.findings.is_empty() {
                        println!("No call sites found in {}", path.display());
                    } else {
                        let mut output = String::new();
                        format::format_file(&mut output, &report);
                        print!("{output}");
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }

        Commands::Patterns => match cli.format {
            OutputFormat::Text => {
                for pattern in &config.patterns {
                    let path = pattern.object_path.join(".");
                    if pattern.is_bare_function() {
                        println!("{path}(arg {})", pattern.endpoint_arg);
                    } else {
                        let methods: Vec<&str> =
                            pattern.methods.iter().map(String::as_str).collect();
                        println!(
                            "{path}.{{{}}}(arg {})",
                            methods.join(","),
                            pattern.endpoint_arg
                        );
                    }
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&config.patterns)?)
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_command() {
        let cli = Cli::try_parse_from(["urltrace", "--format", "json", "scan", "web", "api"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Scan { roots } => {
                assert_eq!(roots, vec![PathBuf::from("web"), PathBuf::from("api")])
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_scan_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["urltrace", "scan"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(matches!(cli.command, Commands::Scan { roots } if roots == vec![PathBuf::from(".")]));
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
