//! Interactive session.
//!
//! The shell owns one [`AnalysisSession`]; every view reads the most recent
//! successful fetch. Errors never end the loop, they print as warnings.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use pricelens_core::{AnalysisRequest, AnalysisSession, ProviderId, Symbol};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::{betas, correlations, elapsed_ms, fetch, latest, prices, returns, CommandResult};

const PROMPT: &str = "pricelens> ";

const HELP: &str = "\
Commands:
  fetch <tickers> <start> <end>   fetch prices, e.g. fetch AAPL, MSFT 2023-01-01 2023-12-01
  metrics [path]                  correlation table and heatmap (default correlations.svg)
  prices [path]                   closing-price chart (default prices.svg)
  betas                           beta of each ticker against the benchmark
  returns                         daily and cumulative returns
  latest [tickers]                latest closes (defaults to the fetched tickers)
  clear                           drop the fetched data
  help                            show this message
  quit                            leave the shell
";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Fetch {
        tickers: String,
        start: String,
        end: String,
    },
    Metrics(Option<PathBuf>),
    Prices(Option<PathBuf>),
    Betas,
    Returns,
    Latest(Option<String>),
    Clear,
    Help,
    Quit,
}

impl ShellCommand {
    /// `Ok(None)` for a blank line.
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "fetch" => {
                if args.len() < 3 {
                    return Err(String::from("usage: fetch <tickers> <start> <end>"));
                }
                let (tickers, dates) = args.split_at(args.len() - 2);
                Self::Fetch {
                    tickers: tickers.join(" "),
                    start: dates[0].to_owned(),
                    end: dates[1].to_owned(),
                }
            }
            "metrics" | "correlations" => Self::Metrics(args.first().map(PathBuf::from)),
            "prices" => Self::Prices(args.first().map(PathBuf::from)),
            "betas" => Self::Betas,
            "returns" => Self::Returns,
            "latest" => Self::Latest((!args.is_empty()).then(|| args.join(" "))),
            "clear" => Self::Clear,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command '{other}', type 'help'")),
        };
        Ok(Some(command))
    }
}

/// Run the shell on stdin/stdout until `quit` or end of input.
pub async fn run(settings: &Settings, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let mut session = AnalysisSession::new(settings.build_source()?);
    let input = BufReader::new(tokio::io::stdin());
    let mut out = io::stdout();
    let mut diagnostics = io::stderr();

    run_loop(
        &mut session,
        &settings.benchmark,
        input,
        &mut out,
        &mut diagnostics,
        format,
        pretty,
    )
    .await
}

async fn run_loop<R, W, D>(
    session: &mut AnalysisSession,
    benchmark: &Symbol,
    input: R,
    out: &mut W,
    diagnostics: &mut D,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    D: Write,
{
    let source = session.source_id();
    let mut lines = input.lines();
    writeln!(out, "pricelens shell ({source}). Type 'help' for commands.")?;

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(diagnostics, "warning: {message}")?;
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => out.write_all(HELP.as_bytes())?,
            ShellCommand::Clear => {
                session.clear();
                writeln!(out, "Cleared fetched data.")?;
            }
            command => {
                let started = Instant::now();
                match execute(session, benchmark, command).await {
                    Ok(result) => {
                        let result = result.with_latency(elapsed_ms(started));
                        output::write_result(out, diagnostics, &result, source, format, pretty)?;
                    }
                    Err(error) => report_error(diagnostics, &error, source, format, pretty)?,
                }
            }
        }
    }

    Ok(())
}

async fn execute(
    session: &mut AnalysisSession,
    benchmark: &Symbol,
    command: ShellCommand,
) -> Result<CommandResult, CliError> {
    match command {
        ShellCommand::Fetch {
            tickers,
            start,
            end,
        } => {
            let request = AnalysisRequest::parse(&tickers, &start, &end, benchmark.as_str())?;
            fetch::run(session, &request).await
        }
        ShellCommand::Metrics(path) => correlations::run(session, path.as_deref()),
        ShellCommand::Prices(path) => prices::run(session, path.as_deref()),
        ShellCommand::Betas => betas::run(session),
        ShellCommand::Returns => returns::run(session),
        ShellCommand::Latest(Some(tickers)) => latest::run(session, &tickers).await,
        ShellCommand::Latest(None) => {
            let tickers = session
                .snapshot()
                .map(|snapshot| {
                    snapshot
                        .request
                        .symbols
                        .iter()
                        .map(Symbol::as_str)
                        .collect::<Vec<_>>()
                        .join(",")
                })
                .map_err(CliError::from)?;
            latest::run(session, &tickers).await
        }
        ShellCommand::Clear | ShellCommand::Help | ShellCommand::Quit => {
            Ok(CommandResult::ok(serde_json::Value::Null, String::new()))
        }
    }
}

fn report_error<D: Write>(
    diagnostics: &mut D,
    error: &CliError,
    source: ProviderId,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    writeln!(diagnostics, "warning: {error}")?;
    if format == OutputFormat::Json {
        let envelope = output::error_envelope(error, source)?;
        writeln!(diagnostics, "{}", envelope.to_json(pretty)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use pricelens_core::CsvSource;

    const PRICES: &str = "\
Date,Ticker,Close
2023-01-03,^GSPC,3824.14
2023-01-04,^GSPC,3852.97
2023-01-05,^GSPC,3808.10
2023-01-06,^GSPC,3895.08
2023-01-03,AAPL,125.07
2023-01-04,AAPL,126.36
2023-01-05,AAPL,125.02
2023-01-06,AAPL,129.62
2023-01-03,MSFT,239.58
2023-01-04,MSFT,229.10
2023-01-05,MSFT,222.31
2023-01-06,MSFT,224.93
";

    fn session() -> AnalysisSession {
        let source = CsvSource::from_reader(PRICES.as_bytes()).expect("csv source");
        AnalysisSession::new(Arc::new(source))
    }

    async fn drive(session: &mut AnalysisSession, script: &str) -> (String, String) {
        let benchmark = Symbol::parse("^GSPC").expect("symbol");
        let mut out = Vec::new();
        let mut diagnostics = Vec::new();
        run_loop(
            session,
            &benchmark,
            script.as_bytes(),
            &mut out,
            &mut diagnostics,
            OutputFormat::Text,
            false,
        )
        .await
        .expect("shell loop");
        (
            String::from_utf8(out).expect("utf8"),
            String::from_utf8(diagnostics).expect("utf8"),
        )
    }

    #[test]
    fn parses_fetch_with_spaced_ticker_list() {
        let command = ShellCommand::parse("fetch AAPL, MSFT 2023-01-01 2023-02-01")
            .expect("parse")
            .expect("command");
        assert_eq!(
            command,
            ShellCommand::Fetch {
                tickers: String::from("AAPL, MSFT"),
                start: String::from("2023-01-01"),
                end: String::from("2023-02-01"),
            }
        );
        assert_eq!(ShellCommand::parse("   ").expect("parse"), None);
        assert!(ShellCommand::parse("fetch AAPL").is_err());
        assert!(ShellCommand::parse("plot").is_err());
    }

    #[tokio::test]
    async fn views_before_fetch_warn_and_keep_running() {
        // Given: a shell with no fetched data
        let mut session = session();

        // When: the user asks for betas, then quits
        let (out, diagnostics) = drive(&mut session, "betas\nreturns\nquit\n").await;

        // Then: both views warn about the missing fetch and the loop survives
        assert_eq!(
            diagnostics.matches("please fetch stock data first").count(),
            2
        );
        assert!(out.starts_with("pricelens shell (csv)."));
    }

    #[tokio::test]
    async fn fetch_then_betas_prints_summary() {
        // Given: a shell over CSV data that includes the benchmark
        let mut session = session();

        // When: the user fetches two tickers and asks for betas
        let (out, diagnostics) = drive(
            &mut session,
            "fetch AAPL, MSFT 2023-01-01 2023-02-01\nbetas\nlatest\n",
        )
        .await;

        // Then: the fetch succeeds and each ticker gets a numeric beta
        assert!(diagnostics.is_empty(), "unexpected warnings: {diagnostics}");
        assert!(out.contains("Data fetched successfully! Betas calculated."));
        assert!(out.contains("Total: 8 rows across 2 tickers"));
        assert!(out.contains("Beta values for selected stocks:"));
        assert!(out.contains("Today's Closing Prices:"));
        assert!(out.contains("AAPL: $129.62"));
        assert!(session.snapshot().is_ok());
    }

    #[tokio::test]
    async fn invalid_input_is_reported_and_state_kept() {
        // Given: a shell that already holds a dataset
        let mut session = session();
        let (_, _) = drive(&mut session, "fetch AAPL 2023-01-01 2023-02-01\n").await;

        // When: the next fetch has an invalid date
        let (_, diagnostics) = drive(&mut session, "fetch MSFT 2023-13-01 2023-02-01\n").await;

        // Then: the error is a warning and the earlier dataset survives
        assert!(diagnostics.starts_with("warning: "));
        let snapshot = session.snapshot().expect("snapshot kept");
        assert_eq!(snapshot.request.symbols[0].as_str(), "AAPL");
    }

    #[tokio::test]
    async fn failed_fetch_and_clear_drop_state() {
        // Given: a shell that already holds a dataset
        let mut session = session();
        let (_, _) = drive(&mut session, "fetch AAPL 2023-01-01 2023-02-01\n").await;

        // When: a fetch returns nothing for every ticker
        let (_, diagnostics) = drive(&mut session, "fetch ZZZZ 2023-01-01 2023-02-01\n").await;

        // Then: the previous dataset is gone
        assert!(diagnostics.contains("no data found for any ticker: ZZZZ"));
        assert!(session.snapshot().is_err());

        // And: clear on a fresh fetch also empties the session
        let (out, _) = drive(&mut session, "fetch AAPL 2023-01-01 2023-02-01\nclear\n").await;
        assert!(out.contains("Cleared fetched data."));
        assert!(session.snapshot().is_err());
    }
}
