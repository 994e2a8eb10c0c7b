//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// appctl - manage applications hosted on the platform.
#[derive(Parser, Debug, Clone)]
#[command(name = "appctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Platform API URL.
    #[arg(long, global = true, env = "APPCTL_API_URL")]
    pub api_url: Option<String>,

    /// API token sent as a bearer token.
    #[arg(long, global = true, env = "APPCTL_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Path to the TOML configuration file.
    #[arg(short, long, global = true, env = "APPCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether the command takes over the terminal.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        match &self.command {
            Commands::Stats(args) => args.stream,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show CPU, memory and swap usage of an application's containers.
    Stats(StatsArgs),
}

/// Arguments for the stats command.
#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Application name, detected from the git remote when omitted.
    #[arg(short, long, env = "APPCTL_APP")]
    pub app: Option<String>,

    /// Open a live dashboard refreshed every interval.
    #[arg(short, long)]
    pub stream: bool,

    /// Seconds between two refreshes of the live dashboard.
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_args(cli: &Cli) -> &StatsArgs {
        match &cli.command {
            Commands::Stats(args) => args,
        }
    }

    #[test]
    fn parses_plain_stats() {
        let cli = Cli::parse_from(["appctl", "stats", "--app", "my-app"]);
        let args = stats_args(&cli);
        assert_eq!(args.app.as_deref(), Some("my-app"));
        assert!(!args.stream);
        assert!(args.interval.is_none());
        assert!(!cli.is_interactive());
    }

    #[test]
    fn parses_stream_with_interval() {
        let cli = Cli::parse_from(["appctl", "stats", "-a", "my-app", "--stream", "--interval", "5"]);
        let args = stats_args(&cli);
        assert!(args.stream);
        assert_eq!(args.interval, Some(5));
        assert!(cli.is_interactive());
    }

    #[test]
    fn rejects_zero_interval() {
        let result = Cli::try_parse_from(["appctl", "stats", "--stream", "--interval", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "appctl",
            "stats",
            "--format",
            "json",
            "--api-url",
            "http://localhost:8080",
            "--log-file",
            "/tmp/appctl.log",
        ]);
        assert_eq!(cli.format, Format::Json);
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/appctl.log")));
    }

    #[test]
    fn format_defaults_to_table() {
        let cli = Cli::parse_from(["appctl", "stats"]);
        assert_eq!(cli.format, Format::Table);
    }

    #[test]
    fn command_is_required() {
        assert!(Cli::try_parse_from(["appctl"]).is_err());
    }
}
