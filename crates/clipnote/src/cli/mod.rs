//! Command-line interface for clipnote.
//!
//! This module provides the CLI structure and command definitions for the
//! `clipnote` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, HealthcheckCommand};

/// clipnote - file tagged clipboard lines into a remote document
///
/// Watches the system clipboard for lines like `todo: buy milk` and posts
/// each one into the matching section of a remote document.
#[derive(Debug, Parser)]
#[command(name = "clipnote")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Watch the clipboard and deliver tagged entries
    Watch,

    /// Validate setup and optionally send a probe entry
    Healthcheck(HealthcheckCommand),

    /// Create missing section headings in the remote document
    Prepare,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "clipnote");
    }

    #[test]
    fn test_parse_watch() {
        let cli = Cli::try_parse_from(["clipnote", "watch"]).unwrap();
        assert!(matches!(cli.command, Command::Watch));
    }

    #[test]
    fn test_parse_healthcheck_with_probe() {
        let cli = Cli::try_parse_from(["clipnote", "healthcheck", "--probe"]).unwrap();
        match cli.command {
            Command::Healthcheck(cmd) => assert!(cmd.probe),
            other => panic!("expected Healthcheck, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_prepare() {
        let cli = Cli::try_parse_from(["clipnote", "prepare"]).unwrap();
        assert!(matches!(cli.command, Command::Prepare));
    }

    #[test]
    fn test_parse_config_path() {
        let cli = Cli::try_parse_from(["clipnote", "config", "path"]).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Path)));
    }

    #[test]
    fn test_parse_with_config_file() {
        let cli = Cli::try_parse_from(["clipnote", "-c", "/custom/config.toml", "watch"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli::try_parse_from(["clipnote", "-q", "watch"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::try_parse_from(["clipnote", "watch"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);

        let cli = Cli::try_parse_from(["clipnote", "-v", "watch"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);

        let cli = Cli::try_parse_from(["clipnote", "-vv", "watch"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }
}
