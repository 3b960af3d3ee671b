//! Bookscout - book candidate aggregator for the Google Books API
//!
//! A CLI tool that expands loose user hints (seed, genre, mood) into a
//! bounded set of search terms, fans them out against Google Books, and
//! assembles a deduplicated, quality-gated candidate pool for a downstream
//! ranker.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime or configuration error (e.g. missing API key)
//!   2 - Empty pool with --fail-empty set

mod cli;
mod config;
mod error;
mod models;
mod planner;
mod pool;
mod provider;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use models::UserHint;
use planner::PlannerConfig;
use pool::{Aggregator, FetchStrategy, QualityProfile};
use provider::google::SearchOptions;
use provider::GoogleBooksClient;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Bookscout v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_pool(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Aggregation failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .bookscout.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".bookscout.toml");

    if path.exists() {
        eprintln!("⚠️  .bookscout.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .bookscout.toml")?;

    println!("✅ Created .bookscout.toml with default settings.");
    println!("   Edit it to customize planner, fetch, provider, and gate settings.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete aggregation workflow. Returns exit code (0 or 2).
async fn run_pool(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let hint = UserHint::new(&args.seed, &args.genre, &args.mood);
    let planner_config = PlannerConfig {
        max_terms: config.planner.max_terms,
        min_signal_len: config.planner.min_signal_len,
        seed_as_title: config.planner.seed_as_title,
    };

    // Handle --dry-run: print the plan and exit
    if args.dry_run {
        return handle_dry_run(&hint, &planner_config);
    }

    let profile = QualityProfile::from_str(&config.gate.profile)
        .map_err(|e| anyhow::anyhow!(e))?;

    // Credential is resolved here and injected; absence is a configuration
    // error, not a request failure.
    let api_key = args.api_key.clone().unwrap_or_default();
    let client = GoogleBooksClient::new(
        &api_key,
        SearchOptions {
            language: config.provider.language.clone(),
            order_by: config.provider.order_by.clone(),
            print_type: config.provider.print_type.clone(),
        },
        Duration::from_secs(config.fetch.timeout_seconds),
    )?;

    let strategy = if config.fetch.batch > 1 {
        FetchStrategy::Parallel {
            batch: config.fetch.batch,
        }
    } else {
        FetchStrategy::Sequential
    };

    info!(
        "Aggregating with profile '{}', budget {} items, {:?}",
        profile, config.fetch.max_items, strategy
    );

    let aggregator = Aggregator::new(
        &client,
        planner_config,
        profile,
        config.fetch.max_items,
        strategy,
    );

    // The run either completes within the deadline or reports a timeout;
    // no partial result is surfaced.
    let deadline = Duration::from_secs(config.fetch.deadline_seconds);
    let result = tokio::time::timeout(deadline, aggregator.run(&hint))
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "aggregation did not complete within {}s",
                config.fetch.deadline_seconds
            )
        })?;

    let failed_terms = result.diagnostics.iter().filter(|d| !d.succeeded).count();
    if failed_terms > 0 {
        warn!("{} of {} terms failed", failed_terms, result.diagnostics.len());
    }

    // Render and write the result
    let output = match args.format {
        OutputFormat::Json => report::render_json(&result)?,
        OutputFormat::Text => report::render_text(&result),
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write result to {}", path.display()))?;
            println!("✅ Pool saved to: {}", path.display());
        }
        None => print!("{}", output),
    }

    if args.fail_empty && result.candidates.is_empty() {
        eprintln!("\n⛔ Candidate pool is empty. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Handle --dry-run: print the query plan, no provider calls.
fn handle_dry_run(hint: &UserHint, planner_config: &PlannerConfig) -> Result<i32> {
    println!("\n🔍 Dry run: planning terms (no provider call)...\n");

    let plan = planner::plan(hint, planner_config);
    for (i, term) in plan.iter().enumerate() {
        println!("  {}. {}", i + 1, term);
    }
    println!("\n  Total: {} terms", plan.len());

    println!("\n✅ Dry run complete. No provider calls were made.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .bookscout.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
