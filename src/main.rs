//! Grid estimator - command line entry point
//!
//! This binary provides four subcommands:
//! - levels: Compute grid price levels
//! - project: Project daily and monthly profit for a grid
//! - validate: Validate a bot form submission (JSON)
//! - overlay: Suggest a range and grid lines from a candle CSV

use anyhow::Result;
use clap::{Parser, Subcommand};
use grid_estimator::GridType;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "grid-estimator")]
#[command(about = "Grid trading bot estimator: levels, profit projection, and form validation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (JSON). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to {command}_{timestamp}.log in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute grid price levels
    Levels {
        /// Lower price limit
        #[arg(long)]
        lower: f64,

        /// Upper price limit
        #[arg(long)]
        upper: f64,

        /// Number of grid lines
        #[arg(short, long, default_value = "20")]
        lines: u32,

        /// Grid spacing (arithmetic or geometric)
        #[arg(short, long, default_value = "geometric")]
        grid_type: GridType,

        /// Write levels to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Project daily and monthly profit
    Project {
        /// Investment amount in quote currency
        #[arg(short, long)]
        investment: Decimal,

        /// Profit per grid in percent (e.g. 0.53)
        #[arg(short, long, default_value = "0.53")]
        profit_per_grid: Decimal,

        /// Lower price limit
        #[arg(long)]
        lower: f64,

        /// Upper price limit
        #[arg(long)]
        upper: f64,

        /// Number of grid lines
        #[arg(short, long, default_value = "20")]
        lines: u32,

        /// Grid spacing (arithmetic or geometric)
        #[arg(short, long, default_value = "geometric")]
        grid_type: GridType,

        /// Completed grid cycles assumed per day (overrides config)
        #[arg(long)]
        crossings: Option<Decimal>,
    },

    /// Validate a bot form submission
    Validate {
        /// JSON file with the raw form values
        #[arg(short, long)]
        input: PathBuf,

        /// Registered API key ids (comma-separated). E.g. "1,2"
        #[arg(short, long, default_value = "")]
        keys: String,
    },

    /// Suggest a grid range and overlay lines from candle data
    Overlay {
        /// CSV file with datetime,open,high,low,close,volume columns
        #[arg(long)]
        candles: PathBuf,
    },
}

fn setup_logging(verbose: bool, command_name: &str, log_dir: Option<&Path>) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Console goes to stderr so command output on stdout stays machine-readable
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let log_filename = format!(
                "{}_{}.log",
                command_name,
                chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
            );
            let file_appender = tracing_appender::rolling::never(dir, log_filename);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_appender)
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_dir {
        info!("Logging to {}", dir.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let command_name = match &cli.command {
        Commands::Levels { .. } => "levels",
        Commands::Project { .. } => "project",
        Commands::Validate { .. } => "validate",
        Commands::Overlay { .. } => "overlay",
    };

    setup_logging(cli.verbose, command_name, cli.log_dir.as_deref())?;

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Levels {
            lower,
            upper,
            lines,
            grid_type,
            output,
        } => commands::levels::run(lower, upper, lines, grid_type, output),

        Commands::Project {
            investment,
            profit_per_grid,
            lower,
            upper,
            lines,
            grid_type,
            crossings,
        } => commands::project::run(
            &config,
            investment,
            profit_per_grid,
            lower,
            upper,
            lines,
            grid_type,
            crossings,
        ),

        Commands::Validate { input, keys } => commands::validate::run(&config, input, &keys),

        Commands::Overlay { candles } => commands::overlay::run(&config, candles),
    }
}
