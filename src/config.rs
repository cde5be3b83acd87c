use std::path::PathBuf;

use clap::Parser;

use crate::data::dashboard::DEFAULT_TOP_N;
use crate::data::sample::{DEFAULT_SAMPLE_SIZE, DEFAULT_SEED};

/// Command-line arguments of the dashboard.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "trade-dash",
    version,
    about = "Imports and Exports Dashboard",
    after_help = r#"
EXAMPLES:
  trade-dash Imports_Exports_Dataset.csv
  trade-dash data.parquet --sample-size 500 --seed 7
  RUST_LOG=debug trade-dash data.json
"#
)]
pub struct Cli {
    /// Transactions file (.csv, .json or .parquet) to load at startup.
    #[arg(env = "TRADE_DASH_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Number of rows drawn from the file for the session.
    #[arg(long, env = "TRADE_DASH_SAMPLE_SIZE", default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Seed of the sampling generator.
    #[arg(long, env = "TRADE_DASH_SEED", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of customers shown in the ranking chart.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,
}

/// Settings the application runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub dataset: Option<PathBuf>,
    pub sample_size: usize,
    pub seed: u64,
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: DEFAULT_SEED,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl From<Cli> for DashboardConfig {
    fn from(cli: Cli) -> Self {
        Self {
            dataset: cli.dataset,
            sample_size: cli.sample_size,
            seed: cli.seed,
            top_n: cli.top_n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_session_parameters() {
        let cli = Cli::try_parse_from(["trade-dash"]).unwrap();
        let config = DashboardConfig::from(cli);
        if std::env::var_os("TRADE_DASH_SEED").is_none()
            && std::env::var_os("TRADE_DASH_SAMPLE_SIZE").is_none()
        {
            assert_eq!(config.sample_size, 3001);
            assert_eq!(config.seed, 55011);
        }
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn explicit_arguments_override_defaults() {
        let cli = Cli::try_parse_from([
            "trade-dash",
            "trades.csv",
            "--sample-size",
            "250",
            "--seed",
            "9",
            "--top-n",
            "5",
        ])
        .unwrap();
        let config = DashboardConfig::from(cli);
        assert_eq!(config.dataset, Some(PathBuf::from("trades.csv")));
        assert_eq!(config.sample_size, 250);
        assert_eq!(config.seed, 9);
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn non_numeric_seed_is_rejected() {
        assert!(Cli::try_parse_from(["trade-dash", "--seed", "abc"]).is_err());
    }
}
