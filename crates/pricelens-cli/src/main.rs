mod cli;
mod commands;
mod config;
mod error;
mod output;
mod render;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::Settings;
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "pricelens=warn,pricelens_core=warn";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            let source = cli.source_provider();
            if let Err(render_error) = output::render_error(&error, source, cli.format, cli.pretty) {
                eprintln!("error: {render_error}");
            }
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let settings = Settings::from_cli(cli)?;

    if matches!(cli.command, Command::Shell) {
        return commands::shell::run(&settings, cli.format, cli.pretty).await;
    }

    let result = commands::run(cli, &settings).await?;
    output::render(&result, settings.source.provider(), cli.format, cli.pretty)
}

/// `--log-level`, then `RUST_LOG`, then warnings only. Logs go to stderr.
fn init_logging(directive: Option<&str>) {
    let filter = directive
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
