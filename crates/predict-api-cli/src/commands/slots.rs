//! Slots command - list prediction slots and their predictors.

use anyhow::Result;
use clap::Args;
use predict_api_core::Slot;
use serde::Serialize;

use super::route::{build_router, RouteArgs};
use crate::config::AppConfig;

/// Arguments for the slots command
#[derive(Args)]
pub struct SlotsArgs {
    /// Print as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// One row of the slot listing.
#[derive(Debug, Serialize)]
struct SlotInfo {
    slot: Slot,
    input_key: &'static str,
    output_key: &'static str,
    predictor: &'static str,
    enabled: bool,
}

/// Run the slots command.
pub fn run(args: &SlotsArgs, config: &AppConfig) -> Result<()> {
    let route_args = RouteArgs::with_config(RouteArgs::default(), config);
    let router = build_router(&route_args)?;

    let rows: Vec<SlotInfo> = router
        .slots()
        .into_iter()
        .map(|(slot, predictor)| SlotInfo {
            slot,
            input_key: slot.input_key(),
            output_key: slot.output_key(),
            predictor,
            enabled: !route_args.is_disabled(slot),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        let status = if row.enabled { "✓" } else { "✗" };
        println!(
            "  {status} {:<6} {} -> {} ({})",
            row.slot.name(),
            row.input_key,
            row.output_key,
            row.predictor
        );
    }

    println!();
    let enabled = rows.iter().filter(|row| row.enabled).count();
    println!("{}/{} slots enabled", enabled, rows.len());

    Ok(())
}
