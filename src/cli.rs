//! Command-line interface parsing for the APOD viewer
//!
//! This module handles parsing of CLI arguments using clap. An optional
//! `--start`/`--end` pair opens the viewer on a date range instead of the
//! default feed; the pair goes through the same validation as the interactive
//! date fields, before the terminal is touched.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::apod::DEFAULT_RANDOM_COUNT;
use crate::range::{parse_date, DateRange, DateRangeSelection, RangeRejection};

/// Error types for CLI argument parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// A date argument is not `YYYY-MM-DD`
    #[error("Invalid date for --{flag}: '{value}'. Expected YYYY-MM-DD")]
    InvalidDate { flag: &'static str, value: String },

    /// Only one of --start / --end was given
    #[error("--start and --end must be given together")]
    IncompleteRange,

    /// --start is after --end
    #[error("Invalid range: {0}")]
    InvertedRange(RangeRejection),
}

/// APOD viewer - browse NASA's Astronomy Picture of the Day in the terminal
#[derive(Parser, Debug)]
#[command(name = "apodview")]
#[command(about = "Browse NASA's Astronomy Picture of the Day with Wikipedia context")]
#[command(version)]
pub struct Cli {
    /// Number of entries fetched by a random reload
    #[arg(long, value_name = "N", default_value_t = DEFAULT_RANDOM_COUNT,
          value_parser = clap::value_parser!(u32).range(1..=100))]
    pub count: u32,

    /// Open on a date range starting at this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: Option<String>,

    /// Last date of the range to open on (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end: Option<String>,

    /// Directory for the feed cache and log file
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Batch size for random reloads
    pub random_count: u32,
    /// Range to query instead of the default feed
    pub initial_range: Option<DateRange>,
    /// Cache directory override
    pub cache_dir: Option<PathBuf>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            random_count: DEFAULT_RANDOM_COUNT,
            initial_range: None,
            cache_dir: None,
        }
    }
}

fn parse_date_arg(flag: &'static str, value: Option<&str>) -> Result<Option<chrono::NaiveDate>, CliError> {
    value
        .map(|v| {
            parse_date(v).ok_or_else(|| CliError::InvalidDate {
                flag,
                value: v.to_string(),
            })
        })
        .transpose()
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let start = parse_date_arg("start", cli.start.as_deref())?;
        let end = parse_date_arg("end", cli.end.as_deref())?;

        let initial_range = match (start, end) {
            (None, None) => None,
            _ => match DateRangeSelection::new(start, end).validate() {
                Ok(range) => Some(range),
                Err(RangeRejection::Incomplete) => return Err(CliError::IncompleteRange),
                Err(rejection) => return Err(CliError::InvertedRange(rejection)),
            },
        };

        Ok(StartupConfig {
            random_count: cli.count,
            initial_range,
            cache_dir: cli.cache_dir.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["apodview"]);
        assert_eq!(cli.count, 5);
        assert!(cli.start.is_none());
        assert!(cli.end.is_none());
        assert!(cli.cache_dir.is_none());
    }

    #[test]
    fn test_cli_count_bounds() {
        assert!(Cli::try_parse_from(["apodview", "--count", "0"]).is_err());
        assert!(Cli::try_parse_from(["apodview", "--count", "101"]).is_err());
        assert_eq!(Cli::parse_from(["apodview", "--count", "100"]).count, 100);
    }

    #[test]
    fn test_startup_config_default() {
        let config = StartupConfig::default();
        assert_eq!(config.random_count, 5);
        assert!(config.initial_range.is_none());
    }

    #[test]
    fn test_startup_config_from_cli_no_range() {
        let cli = Cli::parse_from(["apodview", "--count", "8"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.random_count, 8);
        assert!(config.initial_range.is_none());
    }

    #[test]
    fn test_startup_config_from_cli_with_range() {
        let cli = Cli::parse_from(["apodview", "--start", "2025-08-01", "--end", "2025-08-03"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        let range = config.initial_range.unwrap();
        assert_eq!(range.to_string(), "2025-08-01..2025-08-03");
    }

    #[test]
    fn test_startup_config_single_day_range() {
        let cli = Cli::parse_from(["apodview", "--start", "2025-08-02", "--end", "2025-08-02"]);
        assert!(StartupConfig::from_cli(&cli).unwrap().initial_range.is_some());
    }

    #[test]
    fn test_startup_config_inverted_range() {
        let cli = Cli::parse_from(["apodview", "--start", "2025-08-03", "--end", "2025-08-01"]);
        let err = StartupConfig::from_cli(&cli).unwrap_err();
        assert!(matches!(err, CliError::InvertedRange(_)));
        assert!(err.to_string().contains("on or before"));
    }

    #[test]
    fn test_startup_config_incomplete_range() {
        let cli = Cli::parse_from(["apodview", "--start", "2025-08-03"]);
        assert_eq!(StartupConfig::from_cli(&cli), Err(CliError::IncompleteRange));
    }

    #[test]
    fn test_startup_config_invalid_date() {
        let cli = Cli::parse_from(["apodview", "--start", "yesterday", "--end", "2025-08-01"]);
        let err = StartupConfig::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("--start"));
        assert!(err.to_string().contains("yesterday"));
    }
}
