//! appctl CLI binary entrypoint.

use std::fs::OpenOptions;
use std::io;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use appctl_api::ApiClient;
use appctl_tui::MonitorConfig;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use appctl_cli::cli::{Cli, Commands};
use appctl_cli::commands::StatsCommand;
use appctl_cli::config::Config;
use appctl_cli::detect::detect_app;
use appctl_cli::output::OutputFormat;
use appctl_cli::CliError;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to `--log-file` when given. Otherwise to stderr, unless the
/// dashboard owns the terminal, in which case they are dropped.
fn init_tracing(cli: &Cli) -> Result<(), CliError> {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());

    match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None if cli.is_interactive() => builder.with_writer(io::sink).init(),
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let format = OutputFormat::new(cli.format);
    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.api_url, cli.api_token)?;
    debug!(api_url = %config.api_url, "Configuration loaded");

    match cli.command {
        Commands::Stats(args) => {
            let cwd = std::env::current_dir()?;
            let app = detect_app(args.app.as_deref(), &cwd, &config.git_remote)?;
            let client = ApiClient::with_timeout(
                &config.api_url,
                config.api_token.clone(),
                config.request_timeout(),
            )?;
            let cmd = StatsCommand::new(Arc::new(client));

            if args.stream {
                let interval = args
                    .interval
                    .map_or_else(|| config.poll_interval(), Duration::from_secs);
                cmd.stream(MonitorConfig::new(app).with_poll_interval(interval))
                    .await?;
            } else {
                let mut stdout = io::stdout().lock();
                cmd.execute(&mut stdout, &format, &app).await?;
            }
        }
    }

    Ok(())
}
