//! CLI argument definitions for pricelens.
//!
//! Every command takes a comma-separated ticker list and, except `latest`, a
//! `YYYY-MM-DD` date range whose end date is exclusive.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Fetch prices and summarize betas |
//! | `prices` | Write a closing-price line chart (SVG) |
//! | `correlations` | Correlation table plus heatmap (SVG) |
//! | `betas` | Beta of each ticker against the benchmark |
//! | `returns` | Daily and cumulative returns |
//! | `latest` | Most recent closing price per ticker |
//! | `shell` | Interactive session keeping the last fetch |
//!
//! # Global Options
//!
//! | Option | Env | Default | Description |
//! |--------|-----|---------|-------------|
//! | `--format` | `PRICELENS_FORMAT` | `text` | Output format (text, json) |
//! | `--pretty` | | `false` | Pretty-print JSON output |
//! | `--source` | `PRICELENS_SOURCE` | `yahoo` | Price source (yahoo, csv) |
//! | `--csv-path` | `PRICELENS_CSV_PATH` | | CSV file for `--source csv` |
//! | `--benchmark` | `PRICELENS_BENCHMARK` | `^GSPC` | Index used for betas |
//! | `--timeout-ms` | `PRICELENS_TIMEOUT_MS` | `10000` | HTTP request timeout |
//! | `--unadjusted` | `PRICELENS_UNADJUSTED` | `false` | Use raw closes |
//! | `--log-level` | `PRICELENS_LOG` | `pricelens=warn` | Tracing filter (stderr) |
//!
//! # Examples
//!
//! ```bash
//! pricelens fetch --tickers "AAPL, MSFT" --start 2023-01-01 --end 2023-12-01
//! pricelens correlations -t AAPL,MSFT,GOOG --start 2023-01-01 --end 2023-12-01 --output corr.svg
//! pricelens betas -t AAPL --start 2023-01-01 --end 2023-12-01 --format json --pretty
//! pricelens --source csv --csv-path prices.csv shell
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pricelens_core::{ProviderId, DEFAULT_BENCHMARK};

/// Pricelens - equity price history, returns, correlation and beta
#[derive(Debug, Parser)]
#[command(
    name = "pricelens",
    author,
    version,
    about = "Equity price history, returns, correlation and beta",
    long_about = "Pricelens fetches daily closing prices for a list of tickers and derives \
simple return and risk statistics:\n\
\n\
  • Daily and cumulative returns\n\
  • Pairwise Pearson correlation of closing prices\n\
  • Beta against a benchmark index via linear regression\n\
  • SVG price charts and correlation heatmaps\n\
\n\
Use 'pricelens <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    ///
    /// - text: Human-readable summary (default)
    /// - json: Single JSON envelope
    #[arg(long, global = true, value_enum, env = "PRICELENS_FORMAT", default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Price source.
    #[arg(long, global = true, value_enum, env = "PRICELENS_SOURCE", default_value_t = SourceSelector::Yahoo)]
    pub source: SourceSelector,

    /// Long-format CSV file (Date,Ticker,Close) used with `--source csv`.
    #[arg(long, global = true, env = "PRICELENS_CSV_PATH")]
    pub csv_path: Option<PathBuf>,

    /// Benchmark index for beta regressions.
    #[arg(long, global = true, env = "PRICELENS_BENCHMARK", default_value = DEFAULT_BENCHMARK)]
    pub benchmark: String,

    /// HTTP request timeout in milliseconds.
    #[arg(long, global = true, env = "PRICELENS_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Use raw closes instead of split/dividend adjusted closes.
    #[arg(long, global = true, env = "PRICELENS_UNADJUSTED", default_value_t = false)]
    pub unadjusted: bool,

    /// Tracing filter directive, e.g. `debug` or `pricelens_core=info`.
    ///
    /// Falls back to `RUST_LOG`, then `pricelens=warn`. Logs go to stderr.
    #[arg(long, global = true, env = "PRICELENS_LOG")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub const fn source_provider(&self) -> ProviderId {
        match self.source {
            SourceSelector::Yahoo => ProviderId::Yahoo,
            SourceSelector::Csv => ProviderId::Csv,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Single JSON envelope.
    Json,
}

/// Price source selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// Yahoo Finance chart API.
    Yahoo,
    /// Local CSV file given by `--csv-path`.
    Csv,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch prices for the tickers and benchmark, then summarize betas.
    ///
    /// # Examples
    ///
    ///   pricelens fetch -t "AAPL, MSFT" --start 2023-01-01 --end 2023-12-01
    Fetch(RangeArgs),

    /// Write a line chart of closing prices per ticker.
    ///
    /// # Examples
    ///
    ///   pricelens prices -t AAPL,MSFT --start 2023-01-01 --end 2023-12-01 --output prices.svg
    Prices(ChartArgs),

    /// Print the correlation matrix and write an annotated heatmap.
    ///
    /// # Examples
    ///
    ///   pricelens correlations -t AAPL,MSFT,GOOG --start 2023-01-01 --end 2023-12-01
    Correlations(ChartArgs),

    /// Print the beta of each ticker against the benchmark.
    ///
    /// Tickers without enough overlapping data show `N/A`.
    Betas(RangeArgs),

    /// Print daily and cumulative returns per ticker.
    Returns(RangeArgs),

    /// Print the most recent closing price per ticker.
    ///
    /// # Examples
    ///
    ///   pricelens latest -t AAPL,MSFT
    Latest(LatestArgs),

    /// Start an interactive session that keeps the last fetched dataset.
    ///
    /// Type `help` inside the shell for the available commands.
    Shell,
}

/// Ticker list and date range shared by the analysis commands.
#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// Comma-separated tickers (e.g. "AAPL, MSFT").
    #[arg(long, short = 't')]
    pub tickers: String,

    /// Start date, YYYY-MM-DD (inclusive).
    #[arg(long)]
    pub start: String,

    /// End date, YYYY-MM-DD (exclusive).
    #[arg(long)]
    pub end: String,
}

/// Arguments for commands that write an SVG chart.
#[derive(Debug, Clone, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// SVG output path. Defaults to `<command>.svg` in the working directory.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `latest` command.
#[derive(Debug, Clone, Args)]
pub struct LatestArgs {
    /// Comma-separated tickers.
    #[arg(long, short = 't')]
    pub tickers: String,
}
