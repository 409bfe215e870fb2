//! CLI command definitions and handlers.

pub mod route;
pub mod slots;

use clap::{Parser, Subcommand};

/// Predict API - Route prediction requests to IR and audio models
#[derive(Parser)]
#[command(name = "predict-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared route arguments (paths, slot toggles, output flags).
    #[command(flatten)]
    pub route: route::RouteArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Route prediction requests and print aggregate responses
    Route(route::RouteArgs),
    /// List prediction slots and their predictors
    Slots(slots::SlotsArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every slot of every response succeeded or was absent.
    Success = 0,
    /// At least one slot reported an in-band error.
    SlotErrors = 1,
    /// The command itself failed.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
