//! Command-line interface definition for docmerge.
//!
//! This module defines the CLI structure using clap derive macros,
//! including all subcommands and their arguments.

use crate::config::Config;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// docmerge - Client for a remote PDF-merge service
///
/// Merges PDFs from URLs, fetches stored reports, and relays the results
/// over HTTP.
#[derive(Debug, Parser)]
#[command(name = "docmerge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "DOCMERGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the merge service (overrides the config file)
    #[arg(short, long, global = true, env = "DOCMERGE_URL")]
    pub url: Option<String>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    /// Extra request header, e.g. "Authorization: Bearer TOKEN" (repeatable)
    #[arg(short = 'H', long = "header", global = true)]
    pub headers: Vec<String>,

    /// Increase verbosity (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Returns the log level forced by verbose/quiet flags, if any.
    pub fn log_level(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }

        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }

    /// Applies the client overrides given on the command line.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.client.base_url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.client.timeout_seconds = timeout;
        }
        config.client.headers.extend(self.headers.iter().cloned());
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge PDFs from URLs into one document
    Merge(MergeArgs),

    /// Fetch the PDF for a stored report
    Report(ReportArgs),

    /// Run the HTTP relay in front of the merge service
    Serve(ServeArgs),

    /// Configuration file operations
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Arguments for the `merge` subcommand.
#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Source PDF URLs, in merge order
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Name for the merged PDF
    #[arg(short, long)]
    pub name: Option<String>,

    /// Write the PDF to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `report` subcommand.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Report identifier
    pub id: String,

    /// Write the PDF to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `serve` subcommand.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Bind address (overrides the config file)
    #[arg(long)]
    pub bind: Option<String>,

    /// Listen port (overrides the config file)
    #[arg(long)]
    pub port: Option<u16>,
}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Validate the configuration file
    Validate,

    /// Show the effective configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_merge_command() {
        let cli = Cli::parse_from([
            "docmerge",
            "merge",
            "https://a.example/1.pdf",
            "https://a.example/2.pdf",
            "--name",
            "handout",
            "-o",
            "out/handout.pdf",
        ]);

        match cli.command {
            Commands::Merge(args) => {
                assert_eq!(args.urls.len(), 2);
                assert_eq!(args.name, Some("handout".to_string()));
                assert_eq!(args.output, Some(PathBuf::from("out/handout.pdf")));
            }
            _ => panic!("Expected Merge command"),
        }
    }

    #[test]
    fn test_merge_requires_urls() {
        assert!(Cli::try_parse_from(["docmerge", "merge"]).is_err());
    }

    #[test]
    fn test_report_command() {
        let cli = Cli::parse_from(["docmerge", "report", "1234"]);

        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.id, "1234");
                assert!(args.output.is_none());
            }
            _ => panic!("Expected Report command"),
        }
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::parse_from(["docmerge", "serve", "--bind", "127.0.0.1", "--port", "9090"]);

        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.bind, Some("127.0.0.1".to_string()));
                assert_eq!(args.port, Some(9090));
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_config_show() {
        let cli = Cli::parse_from(["docmerge", "config", "show"]);

        match cli.command {
            Commands::Config(ConfigCommands::Show) => {}
            _ => panic!("Expected Config Show command"),
        }
    }

    #[test]
    fn test_global_client_options() {
        let cli = Cli::parse_from([
            "docmerge",
            "report",
            "7",
            "--url",
            "http://merge.local:8585",
            "-t",
            "10",
            "-H",
            "Authorization: Bearer a",
            "-H",
            "X-Trace: 1",
        ]);

        let mut config = Config::default();
        config.client.headers = vec!["X-From-File: yes".to_string()];
        cli.apply_overrides(&mut config);

        assert_eq!(config.client.base_url, "http://merge.local:8585");
        assert_eq!(config.client.timeout_seconds, 10);
        assert_eq!(
            config.client.headers,
            vec!["X-From-File: yes", "Authorization: Bearer a", "X-Trace: 1"]
        );
    }

    #[test]
    fn test_verbose_levels() {
        let cli = Cli::parse_from(["docmerge", "serve"]);
        assert_eq!(cli.log_level(), None);

        let cli = Cli::parse_from(["docmerge", "-v", "serve"]);
        assert_eq!(cli.log_level(), Some("debug"));

        let cli = Cli::parse_from(["docmerge", "-vvv", "serve"]);
        assert_eq!(cli.log_level(), Some("trace"));
    }

    #[test]
    fn test_quiet_mode() {
        let cli = Cli::parse_from(["docmerge", "-q", "serve"]);
        assert_eq!(cli.log_level(), Some("error"));
    }
}
