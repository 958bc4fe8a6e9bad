//! CLI configuration

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use masar::points::{DEFAULT_POINTS_PER_STAMP, Points};
use masar_app::{context::AppSettings, domain::accounts::records::UserId};

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub(crate) log_format: LogFormat,
}

/// Ledger settings.
#[derive(Debug, Args)]
pub(crate) struct LedgerConfig {
    /// Signed-in user, as reported by the identity provider
    #[arg(short, long, env = "MASAR_USER")]
    pub(crate) user: UserId,

    /// JSON file holding the ledger; kept in memory when omitted
    #[arg(long, env = "MASAR_DATA_FILE")]
    pub(crate) data_file: Option<PathBuf>,

    /// Points awarded for each newly collected stamp
    #[arg(long, env = "MASAR_POINTS_PER_STAMP", default_value_t = DEFAULT_POINTS_PER_STAMP)]
    pub(crate) points_per_stamp: u64,

    /// YAML reward catalog; the built-in catalog when omitted
    #[arg(long, env = "MASAR_REWARDS_FILE")]
    pub(crate) rewards_file: Option<PathBuf>,
}

impl LedgerConfig {
    pub(crate) fn settings(&self) -> AppSettings {
        AppSettings {
            data_file: self.data_file.clone(),
            rewards_file: self.rewards_file.clone(),
            points_per_stamp: Points::new(self.points_per_stamp),
        }
    }
}
