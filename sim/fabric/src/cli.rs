//! Parses the command line arguments.
//!
//! Basic usage for running the generic simulation with logging on:
//!
//! ```cargo run -- --sim generic --upper 4 --log```

use crate::{simulations, SimError};
use clap::{Parser, ValueEnum};
use std::{
    fs::{create_dir_all, OpenOptions},
    io,
    sync::Arc,
};
use thiserror::Error as ThisError;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::FmtSubscriber;

/// Stores the different command line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Runs a prebuilt layer-dispatch simulation")]
struct Args {
    /// Logging flag. Used to turn logging on or off.
    #[arg(short, long)]
    log: bool,
    /// The simulation to run.
    #[arg(short, long, value_enum, default_value_t = Simulation::Basic)]
    sim: Simulation,
    /// How many layers to attach above the dispatcher: applications for
    /// the basic stack, upper layers for the generic one.
    #[arg(short, long, default_value_t = 2)]
    upper: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Simulation {
    Basic,
    Generic,
    UnknownDestination,
}

/// Parses command line arguments and runs the chosen simulation.
pub fn initialize_from_arguments() -> Result<(), CliError> {
    run(Args::parse())
}

fn run(args: Args) -> Result<(), CliError> {
    if args.log {
        initialize_logging()?;
    }
    match args.sim {
        Simulation::Basic => simulations::basic(args.upper)?,
        Simulation::Generic => simulations::generic(args.upper)?,
        Simulation::UnknownDestination => simulations::unknown_destination()?,
    }
    Ok(())
}

/// Initializes the event subscriber. Should be called only once, before the
/// sim starts. Events are written as JSON to a timestamped file in `./logs`.
fn initialize_logging() -> Result<(), CliError> {
    let main_path = "./logs";
    create_dir_all(main_path)?;
    let file_path = format!(
        "{}/debug-{}.log",
        main_path,
        chrono::offset::Local::now().format("%y-%m-%d_%H-%M-%S")
    );
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(file_path)?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(Arc::new(file))
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("Could not open the log file: {0}")]
    Log(#[from] io::Error),
    #[error("A global subscriber is already set: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
    #[error("Simulation failed: {0}")]
    Sim(#[from] SimError),
}
