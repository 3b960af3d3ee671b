//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::pool::QualityProfile;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// Bookscout - query-expansion book candidate aggregator
///
/// Turns a loose set of hints (free-text seed, genre, mood) into a
/// deduplicated pool of book candidates from the Google Books API,
/// ready for a downstream ranker.
///
/// Examples:
///   bookscout --seed "Gone Girl" --genre thriller
///   bookscout --genre romantasy --mood cozy --profile strict --format json
///   bookscout --seed dragons --dry-run
///   bookscout --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Free-text seed, e.g. a title fragment or topic
    #[arg(short, long, default_value = "", value_name = "TEXT")]
    pub seed: String,

    /// Genre hint, e.g. thriller, romantasy, nonfiction
    #[arg(short, long, default_value = "", value_name = "GENRE")]
    pub genre: String,

    /// Mood hint, e.g. cozy, dark, fast-paced
    #[arg(short, long, default_value = "", value_name = "MOOD")]
    pub mood: String,

    /// Google Books API key
    ///
    /// Resolved here and injected into the provider client; the pipeline
    /// itself never reads the environment.
    #[arg(long, env = "GOOGLE_BOOKS_API_KEY", value_name = "KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Quality profile applied to the pool
    ///
    /// Values: strict, lenient, description-required.
    /// Default: from config or "lenient".
    #[arg(short, long, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Stop issuing provider calls once this many raw items were fetched
    ///
    /// Default: from config or 120.
    #[arg(long, value_name = "COUNT")]
    pub max_items: Option<usize>,

    /// Maximum number of planned search terms
    ///
    /// Default: from config or 8.
    #[arg(long, value_name = "COUNT")]
    pub max_terms: Option<usize>,

    /// Send the seed as an exact-title match (intitle:)
    #[arg(long)]
    pub exact_title: bool,

    /// Issue provider calls in concurrent batches of this size
    ///
    /// Omit for strictly sequential fetching (gentler on rate limits).
    #[arg(long, value_name = "BATCH")]
    pub parallel: Option<usize>,

    /// Request timeout per provider call, in seconds
    ///
    /// Default: from config or 10.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Overall deadline for the aggregation run, in seconds
    ///
    /// Default: from config or 60.
    #[arg(long, value_name = "SECS")]
    pub deadline: Option<u64>,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .bookscout.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the query plan without calling the provider
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .bookscout.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Exit with code 2 when the pool comes back empty
    #[arg(long)]
    pub fail_empty: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the aggregation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text summary (default)
    #[default]
    Text,
    /// JSON, shaped for a downstream ranker
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.seed.trim().is_empty()
            && self.genre.trim().is_empty()
            && self.mood.trim().is_empty()
        {
            return Err(
                "Provide at least one of --seed, --genre, or --mood".to_string(),
            );
        }

        if let Some(ref profile) = self.profile {
            if let Err(e) = QualityProfile::from_str(profile) {
                return Err(e);
            }
        }

        if self.max_items == Some(0) {
            return Err("Max items must be at least 1".to_string());
        }

        if self.max_terms == Some(0) {
            return Err("Max terms must be at least 1".to_string());
        }

        if let Some(batch) = self.parallel {
            if batch == 0 {
                return Err("Parallel batch size must be at least 1".to_string());
            }
        }

        if self.timeout == Some(0) || self.deadline == Some(0) {
            return Err("Timeouts must be at least 1 second".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            seed: "Gone Girl".to_string(),
            genre: "thriller".to_string(),
            mood: String::new(),
            api_key: Some("test-key".to_string()),
            profile: None,
            max_items: None,
            max_terms: None,
            exact_title: false,
            parallel: None,
            timeout: None,
            deadline: None,
            format: OutputFormat::Text,
            output: None,
            config: None,
            dry_run: false,
            init_config: false,
            fail_empty: false,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_validation_requires_a_hint() {
        let mut args = make_args();
        args.seed = String::new();
        args.genre = "  ".to_string();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_profile() {
        let mut args = make_args();
        args.profile = Some("draconian".to_string());
        assert!(args.validate().is_err());

        // No explicit profile defers to the config default.
        args.profile = None;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_bounds() {
        let mut args = make_args();
        args.max_items = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.parallel = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.deadline = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.seed = String::new();
        args.genre = String::new();
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
