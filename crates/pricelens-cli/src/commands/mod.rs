mod betas;
mod correlations;
mod fetch;
mod latest;
mod prices;
mod returns;
pub mod shell;

use std::time::Instant;

use pricelens_core::{AnalysisRequest, AnalysisSession, EnvelopeError, Symbol};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command, RangeArgs};
use crate::config::Settings;
use crate::error::CliError;

/// Output of one command, independent of the output format.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub data: Value,
    pub text: String,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
}

impl CommandResult {
    pub fn ok(data: Value, text: String) -> Self {
        Self {
            data,
            text,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

/// Run a one-shot command against a fresh session.
///
/// `shell` is interactive and handled by [`shell::run`].
pub async fn run(cli: &Cli, settings: &Settings) -> Result<CommandResult, CliError> {
    let started = Instant::now();
    let mut session = AnalysisSession::new(settings.build_source()?);

    let mut result = match &cli.command {
        Command::Fetch(args) => {
            let request = analysis_request(args, &settings.benchmark)?;
            fetch::run(&mut session, &request).await?
        }
        Command::Prices(args) => {
            let request = analysis_request(&args.range, &settings.benchmark)?;
            session.fetch(&request).await?;
            prices::run(&session, args.output.as_deref())?
        }
        Command::Correlations(args) => {
            let request = analysis_request(&args.range, &settings.benchmark)?;
            session.fetch(&request).await?;
            correlations::run(&session, args.output.as_deref())?
        }
        Command::Betas(args) => {
            let request = analysis_request(args, &settings.benchmark)?;
            session.fetch(&request).await?;
            betas::run(&session)?
        }
        Command::Returns(args) => {
            let request = analysis_request(args, &settings.benchmark)?;
            session.fetch(&request).await?;
            returns::run(&session)?
        }
        Command::Latest(args) => latest::run(&session, &args.tickers).await?,
        Command::Shell => {
            return Err(CliError::Config(String::from(
                "the shell command runs interactively",
            )))
        }
    };

    // Fetch warnings travel with every view computed from that fetch.
    if !matches!(cli.command, Command::Fetch(_) | Command::Latest(_)) {
        if let Ok(snapshot) = session.snapshot() {
            result = result.with_warnings(snapshot.warnings.clone());
        }
    }

    let latency_ms = elapsed_ms(started);
    debug!(latency_ms, warnings = result.warnings.len(), "command finished");
    Ok(result.with_latency(latency_ms))
}

fn analysis_request(args: &RangeArgs, benchmark: &Symbol) -> Result<AnalysisRequest, CliError> {
    Ok(AnalysisRequest::parse(
        &args.tickers,
        &args.start,
        &args.end,
        benchmark.as_str(),
    )?)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
