//! Main entry point for the esports league manager
//!
//! Parses the command line, loads and validates configuration, sets up
//! logging, opens the league store and runs the interactive console until the
//! user exits or input ends.

use anyhow::{Context, Result};
use clap::Parser;
use esports_league::config::{validate_config, AppConfig};
use esports_league::console::Console;
use esports_league::league::{LeagueManager, RngOutcomeSource};
use esports_league::rating::EloRatingCalculator;
use esports_league::storage::InMemoryLeagueStore;
use esports_league::utils::today;
use std::io;
use std::path::PathBuf;
use tracing::{error, info};

/// Esports League - manage teams, players, matches and Elo standings
#[derive(Parser)]
#[command(
    name = "esports-league",
    version,
    about = "A terminal manager for esports teams, players and matches",
    long_about = "Esports League tracks teams, their players and scheduled matches, simulates \
                 pending matches with an Elo rating update, and shows ranked standings with \
                 win rates and recent form."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Database path override
    #[arg(long, value_name = "FILE", help = "Override the league database file")]
    database: Option<PathBuf>,

    /// Keep data in memory only
    #[arg(long, help = "Run without a database file; nothing is saved")]
    in_memory: bool,

    /// Simulation seed override
    #[arg(long, value_name = "SEED", help = "Seed match simulations for reproducible results")]
    seed: Option<u64>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without opening the database")]
    dry_run: bool,
}

/// Initialize structured logging on stderr with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Display startup banner with session information
fn display_startup_banner(config: &AppConfig) {
    info!("Esports League v{}", esports_league::VERSION);
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    if config.storage.in_memory {
        info!("   Database: in memory");
    } else {
        info!("   Database: {}", config.storage.database_path.display());
    }
    info!(
        "   Elo: K={} initial={}",
        config.rating.k_factor, config.rating.initial_rating
    );
    match config.simulation.seed {
        Some(seed) => info!("   Simulation seed: {}", seed),
        None => info!("   Simulation seed: random"),
    }
}

/// Load and merge configuration from file or environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(database) = &args.database {
        config.storage.database_path = database.clone();
    }

    if args.in_memory {
        config.storage.in_memory = true;
    }

    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }

    validate_config(&config)?;
    Ok(config)
}

fn open_store(config: &AppConfig) -> Result<InMemoryLeagueStore> {
    if config.storage.in_memory {
        return Ok(InMemoryLeagueStore::new());
    }

    let path = &config.storage.database_path;
    InMemoryLeagueStore::open(path)
        .with_context(|| format!("Failed to open league database {}", path.display()))
}

fn run(config: AppConfig) -> Result<()> {
    let calculator = EloRatingCalculator::new(config.rating.clone())?;
    let store = open_store(&config)?;
    let mut manager = LeagueManager::with_calculator(store, calculator);

    let mut source = match config.simulation.seed {
        Some(seed) => RngOutcomeSource::seeded(seed),
        None => RngOutcomeSource::from_entropy(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = {
        let mut console = Console::new(
            &mut manager,
            &mut source,
            stdin.lock(),
            stdout.lock(),
            today(),
        );
        console.run()
    };

    // Close even if the console failed so an open transaction is discarded
    let closed = manager.close();
    outcome?;
    closed?;

    info!("Session closed");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!("Configuration validation successful");
        display_startup_banner(&config);
        println!("Configuration is valid");
        return Ok(());
    }

    display_startup_banner(&config);

    if let Err(e) = run(config) {
        error!("League session failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
