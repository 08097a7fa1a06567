//! Resolved runtime settings.
//!
//! Flags and `PRICELENS_*` environment variables are merged by clap; this
//! module validates the result and builds the data source.

use std::path::PathBuf;
use std::sync::Arc;

use pricelens_core::{CsvSource, DataSource, ProviderId, ReqwestHttpClient, Symbol, YahooAdapter};
use tracing::debug;

use crate::cli::{Cli, SourceSelector};
use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSettings {
    Yahoo { timeout_ms: u64, adjusted: bool },
    Csv { path: PathBuf },
}

impl SourceSettings {
    pub const fn provider(&self) -> ProviderId {
        match self {
            Self::Yahoo { .. } => ProviderId::Yahoo,
            Self::Csv { .. } => ProviderId::Csv,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: SourceSettings,
    pub benchmark: Symbol,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let benchmark = Symbol::parse(&cli.benchmark)?;
        let source = match cli.source {
            SourceSelector::Yahoo => {
                if cli.timeout_ms == 0 {
                    return Err(CliError::Config(String::from(
                        "--timeout-ms must be greater than zero",
                    )));
                }
                SourceSettings::Yahoo {
                    timeout_ms: cli.timeout_ms,
                    adjusted: !cli.unadjusted,
                }
            }
            SourceSelector::Csv => {
                let path = cli.csv_path.clone().ok_or_else(|| {
                    CliError::Config(String::from("--csv-path is required with --source csv"))
                })?;
                SourceSettings::Csv { path }
            }
        };

        Ok(Self { source, benchmark })
    }

    pub fn build_source(&self) -> Result<Arc<dyn DataSource>, CliError> {
        debug!(source = ?self.source, benchmark = %self.benchmark, "building data source");
        match &self.source {
            SourceSettings::Yahoo {
                timeout_ms,
                adjusted,
            } => Ok(Arc::new(
                YahooAdapter::new(Arc::new(ReqwestHttpClient::new()))
                    .with_timeout_ms(*timeout_ms)
                    .with_adjusted(*adjusted),
            )),
            SourceSettings::Csv { path } => Ok(Arc::new(CsvSource::open(path)?)),
        }
    }
}
