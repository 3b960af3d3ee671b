//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.bookscout.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Query planner settings.
    #[serde(default)]
    pub planner: PlannerSection,

    /// Fetch executor settings.
    #[serde(default)]
    pub fetch: FetchSection,

    /// Provider query options.
    #[serde(default)]
    pub provider: ProviderSection,

    /// Quality gate settings.
    #[serde(default)]
    pub gate: GateSection,
}

/// Query planner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerSection {
    /// Maximum number of planned terms.
    #[serde(default = "default_max_terms")]
    pub max_terms: usize,

    /// Signals shorter than this trigger the vagueness widening rule.
    #[serde(default = "default_min_signal_len")]
    pub min_signal_len: usize,

    /// Send the seed as an exact-title match.
    #[serde(default)]
    pub seed_as_title: bool,
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            max_terms: default_max_terms(),
            min_signal_len: default_min_signal_len(),
            seed_as_title: false,
        }
    }
}

fn default_max_terms() -> usize {
    8
}

fn default_min_signal_len() -> usize {
    4
}

/// Fetch executor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSection {
    /// Early-stop budget: stop issuing calls after this many raw items.
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Concurrent batch size; 1 means strictly sequential.
    #[serde(default = "default_batch")]
    pub batch: usize,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Overall run deadline in seconds.
    #[serde(default = "default_deadline")]
    pub deadline_seconds: u64,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
            batch: default_batch(),
            timeout_seconds: default_timeout(),
            deadline_seconds: default_deadline(),
        }
    }
}

fn default_max_items() -> usize {
    120
}

fn default_batch() -> usize {
    1
}

fn default_timeout() -> u64 {
    10
}

fn default_deadline() -> u64 {
    60
}

/// Provider query options, fixed per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSection {
    /// BCP-47 language restriction.
    #[serde(default = "default_language")]
    pub language: String,

    /// Result ordering ("relevance" or "newest").
    #[serde(default = "default_order_by")]
    pub order_by: String,

    /// Print type filter.
    #[serde(default = "default_print_type")]
    pub print_type: String,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            language: default_language(),
            order_by: default_order_by(),
            print_type: default_print_type(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_order_by() -> String {
    "relevance".to_string()
}

fn default_print_type() -> String {
    "books".to_string()
}

/// Quality gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSection {
    /// Default profile name when the CLI does not pick one.
    #[serde(default = "default_profile")]
    pub profile: String,
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            profile: default_profile(),
        }
    }
}

fn default_profile() -> String {
    "lenient".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".bookscout.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values;
    /// otherwise the config file (or its serde defaults) stands.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(max_terms) = args.max_terms {
            self.planner.max_terms = max_terms;
        }
        if args.exact_title {
            self.planner.seed_as_title = true;
        }

        if let Some(max_items) = args.max_items {
            self.fetch.max_items = max_items;
        }
        if let Some(timeout) = args.timeout {
            self.fetch.timeout_seconds = timeout;
        }
        if let Some(deadline) = args.deadline {
            self.fetch.deadline_seconds = deadline;
        }
        if let Some(batch) = args.parallel {
            self.fetch.batch = batch;
        }

        if let Some(ref profile) = args.profile {
            self.gate.profile = profile.clone();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.planner.max_terms, 8);
        assert_eq!(config.fetch.max_items, 120);
        assert_eq!(config.fetch.batch, 1);
        assert_eq!(config.provider.language, "en");
        assert_eq!(config.gate.profile, "lenient");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[planner]
max_terms = 5
seed_as_title = true

[fetch]
max_items = 60
batch = 3

[provider]
order_by = "newest"

[gate]
profile = "strict"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.planner.max_terms, 5);
        assert!(config.planner.seed_as_title);
        assert_eq!(config.planner.min_signal_len, 4);
        assert_eq!(config.fetch.max_items, 60);
        assert_eq!(config.fetch.batch, 3);
        assert_eq!(config.provider.order_by, "newest");
        assert_eq!(config.gate.profile, "strict");
    }

    #[test]
    fn test_merge_keeps_config_values_without_explicit_cli() {
        use clap::Parser;

        let toml_content = r#"
[planner]
max_terms = 5

[fetch]
max_items = 60
timeout_seconds = 30
deadline_seconds = 90

[gate]
profile = "strict"
"#;

        let mut config: Config = toml::from_str(toml_content).unwrap();
        let args = crate::cli::Args::parse_from(["bookscout", "--genre", "thriller"]);
        config.merge_with_args(&args);

        // A bare invocation must not clobber the edited config file.
        assert_eq!(config.planner.max_terms, 5);
        assert_eq!(config.fetch.max_items, 60);
        assert_eq!(config.fetch.timeout_seconds, 30);
        assert_eq!(config.fetch.deadline_seconds, 90);
        assert_eq!(config.gate.profile, "strict");
    }

    #[test]
    fn test_merge_explicit_cli_overrides_config() {
        use clap::Parser;

        let mut config: Config = toml::from_str("[planner]\nmax_terms = 5").unwrap();
        let args = crate::cli::Args::parse_from([
            "bookscout",
            "--genre",
            "thriller",
            "--max-terms",
            "3",
            "--profile",
            "strict",
        ]);
        config.merge_with_args(&args);

        assert_eq!(config.planner.max_terms, 3);
        assert_eq!(config.gate.profile, "strict");
        // Untouched sections keep their defaults.
        assert_eq!(config.fetch.max_items, 120);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[planner]"));
        assert!(toml_str.contains("[fetch]"));
        assert!(toml_str.contains("[provider]"));
        assert!(toml_str.contains("[gate]"));
    }
}
