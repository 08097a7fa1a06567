use std::io::{self, Write};

use pricelens_core::{Envelope, EnvelopeError, EnvelopeMeta, ProviderId};
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

/// Print a command result to stdout; text-mode warnings go to stderr.
pub fn render(
    result: &CommandResult,
    source: ProviderId,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    write_result(
        &mut stdout.lock(),
        &mut stderr.lock(),
        result,
        source,
        format,
        pretty,
    )
}

pub fn write_result<W: Write, D: Write>(
    out: &mut W,
    diagnostics: &mut D,
    result: &CommandResult,
    source: ProviderId,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let envelope = build_envelope(result, source)?;
            writeln!(out, "{}", envelope.to_json(pretty)?)?;
        }
        OutputFormat::Text => {
            out.write_all(result.text.as_bytes())?;
            for warning in &result.warnings {
                writeln!(diagnostics, "warning: {warning}")?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// JSON mode only: an error envelope on stdout so callers always get JSON.
pub fn render_error(
    error: &CliError,
    source: ProviderId,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    if format != OutputFormat::Json {
        return Ok(());
    }
    let envelope = error_envelope(error, source)?;
    println!("{}", envelope.to_json(pretty)?);
    Ok(())
}

pub fn build_envelope(
    result: &CommandResult,
    source: ProviderId,
) -> Result<Envelope<Value>, CliError> {
    let mut meta = EnvelopeMeta::new(source, result.latency_ms);
    for warning in &result.warnings {
        meta.push_warning(warning.clone());
    }

    let mut envelope = Envelope::success(meta, result.data.clone());
    for error in &result.errors {
        envelope.push_error(error.clone())?;
    }
    Ok(envelope)
}

pub fn error_envelope(error: &CliError, source: ProviderId) -> Result<Envelope<Value>, CliError> {
    let mut envelope = Envelope::success(EnvelopeMeta::new(source, 0), Value::Null);
    envelope.push_error(EnvelopeError::new(error.code(), error.to_string())?)?;
    if let CliError::Fetch(fetch) = error {
        for failure in EnvelopeError::from_fetch_error(fetch) {
            envelope.push_error(failure)?;
        }
    }
    Ok(envelope)
}
