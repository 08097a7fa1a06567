//! Behavior-driven tests for CLI user journeys
//!
//! These tests run the `pricelens` binary against a CSV price file and check
//! what a user sees: stdout payloads, stderr warnings and exit codes.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::{tempdir, TempDir};

const PRICES: &str = "\
Date,Ticker,Close
2023-01-03 00:00:00-05:00,^GSPC,3824.14
2023-01-04 00:00:00-05:00,^GSPC,3852.97
2023-01-05 00:00:00-05:00,^GSPC,3808.10
2023-01-06 00:00:00-05:00,^GSPC,3895.08
2023-01-09 00:00:00-05:00,^GSPC,3892.09
2023-01-03,AAPL,125.07
2023-01-04,AAPL,126.36
2023-01-05,AAPL,125.02
2023-01-06,AAPL,129.62
2023-01-09,AAPL,130.15
2023-01-03,MSFT,239.58
2023-01-04,MSFT,229.10
2023-01-05,MSFT,222.31
2023-01-06,MSFT,224.93
2023-01-09,MSFT,227.12
";

struct Fixture {
    dir: TempDir,
    csv: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().expect("temp dir");
        let csv = dir.path().join("prices.csv");
        std::fs::write(&csv, PRICES).expect("write fixture");
        Self { dir, csv }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_pricelens"));
        for key in [
            "PRICELENS_FORMAT",
            "PRICELENS_SOURCE",
            "PRICELENS_CSV_PATH",
            "PRICELENS_BENCHMARK",
            "PRICELENS_TIMEOUT_MS",
            "PRICELENS_UNADJUSTED",
            "PRICELENS_LOG",
            "RUST_LOG",
        ] {
            command.env_remove(key);
        }
        command
            .current_dir(self.dir.path())
            .arg("--source")
            .arg("csv")
            .arg("--csv-path")
            .arg(&self.csv);
        command
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("binary runs")
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("output file exists")
}

// =============================================================================
// CLI User Journey: Betas
// =============================================================================

#[test]
fn user_gets_betas_as_a_json_envelope() {
    // Given: a CSV file with two stocks and the S&P 500
    let fixture = Fixture::new();

    // When: they ask for betas in JSON
    let output = fixture.run(&[
        "betas",
        "--tickers",
        "AAPL, MSFT",
        "--start",
        "2023-01-01",
        "--end",
        "2023-02-01",
        "--format",
        "json",
    ]);

    // Then: the command succeeds with one envelope on stdout
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let envelope: Value = serde_json::from_str(&stdout(&output)).expect("valid json");
    assert_eq!(envelope["meta"]["source"], "csv");
    assert_eq!(envelope["meta"]["schema_version"], "v1.0.0");
    assert_eq!(envelope["data"]["benchmark"], "^GSPC");

    // And: every requested ticker has a defined beta, in request order
    let estimates = envelope["data"]["estimates"].as_array().expect("estimates");
    assert_eq!(estimates.len(), 2);
    assert_eq!(estimates[0]["symbol"], "AAPL");
    assert_eq!(estimates[1]["symbol"], "MSFT");
    assert_eq!(estimates[0]["status"], "defined");
    assert!(estimates[0]["beta"].is_f64());
}

#[test]
fn user_sees_text_beta_summary() {
    // Given: a CSV file with prices
    let fixture = Fixture::new();

    // When: they ask for betas in the default text format
    let output = fixture.run(&[
        "betas",
        "-t",
        "AAPL",
        "--start",
        "2023-01-01",
        "--end",
        "2023-02-01",
    ]);

    // Then: a readable summary is printed
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Beta values for selected stocks:\n\nAAPL: "));
}

// =============================================================================
// CLI User Journey: Partial and failed fetches
// =============================================================================

#[test]
fn unknown_ticker_is_a_warning_not_a_failure() {
    // Given: one real ticker and one the file does not contain
    let fixture = Fixture::new();

    // When: they fetch both
    let output = fixture.run(&[
        "fetch",
        "-t",
        "AAPL, ZZZZ",
        "--start",
        "2023-01-01",
        "--end",
        "2023-02-01",
    ]);

    // Then: the fetch succeeds for AAPL and ZZZZ is reported on stderr
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Data fetched successfully! Betas calculated."));
    assert!(stderr(&output).contains("warning: ZZZZ: no data found for ticker: ZZZZ"));
}

#[test]
fn fetch_with_no_data_exits_with_fetch_code() {
    // Given: tickers absent from the file
    let fixture = Fixture::new();

    // When: they fetch them
    let output = fixture.run(&[
        "fetch",
        "-t",
        "ZZZZ, YYYY",
        "--start",
        "2023-01-01",
        "--end",
        "2023-02-01",
    ]);

    // Then: the process exits with the fetch error code
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("no data found for any ticker: ZZZZ, YYYY"));
}

#[test]
fn invalid_date_exits_with_validation_code() {
    // Given: a start date with month 13
    let fixture = Fixture::new();

    // When: they run any analysis command
    let output = fixture.run(&[
        "returns",
        "-t",
        "AAPL",
        "--start",
        "2023-13-01",
        "--end",
        "2023-12-01",
        "--format",
        "json",
    ]);

    // Then: validation fails with exit code 2 and a JSON error envelope
    assert_eq!(output.status.code(), Some(2));
    let envelope: Value = serde_json::from_str(&stdout(&output)).expect("valid json");
    assert_eq!(envelope["errors"][0]["code"], "cli.validation");
}

// =============================================================================
// CLI User Journey: Charts
// =============================================================================

#[test]
fn correlations_print_a_table_and_write_a_heatmap() {
    // Given: a CSV file with two stocks
    let fixture = Fixture::new();
    let heatmap = fixture.path("out/corr.svg");

    // When: they request correlations with an output path
    let output = fixture.run(&[
        "correlations",
        "-t",
        "AAPL,MSFT",
        "--start",
        "2023-01-01",
        "--end",
        "2023-02-01",
        "--output",
        heatmap.to_str().expect("utf8 path"),
    ]);

    // Then: the table is printed and the heatmap file exists
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Correlation Matrix:"));
    let svg = read(&heatmap);
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(">1.00</text>"));
}

#[test]
fn prices_chart_defaults_to_working_directory() {
    // Given: a CSV file with prices
    let fixture = Fixture::new();

    // When: they request the price chart without --output
    let output = fixture.run(&[
        "prices",
        "-t",
        "AAPL,MSFT",
        "--start",
        "2023-01-01",
        "--end",
        "2023-02-01",
    ]);

    // Then: prices.svg is written next to where they ran the command
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let svg = read(&fixture.path("prices.svg"));
    assert_eq!(svg.matches("<polyline").count(), 2);
}

// =============================================================================
// CLI User Journey: Interactive shell
// =============================================================================

#[test]
fn shell_session_keeps_data_between_commands() {
    // Given: a shell over the CSV file
    let fixture = Fixture::new();
    let mut child = fixture
        .command()
        .arg("shell")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("shell starts");

    // When: they ask for betas too early, then fetch and ask again
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"betas\nfetch AAPL, MSFT 2023-01-01 2023-02-01\nbetas\nquit\n")
        .expect("write script");
    let output = child.wait_with_output().expect("shell exits");

    // Then: the first request warns, the second prints betas
    assert!(output.status.success());
    assert!(stderr(&output).contains("please fetch stock data first to view betas"));
    assert!(stdout(&output).contains("Beta values for selected stocks:"));
}
