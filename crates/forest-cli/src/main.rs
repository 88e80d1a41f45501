//! forest-plan - least-cost route across a terrain image.

use anyhow::{Context, Result};
use clap::Parser;
use forest_cli::cli::Args;
use forest_cli::config::Config;
use forest_cli::raster::{load_raster, resolve_endpoints};
use forest_core::{plan, PlanRequest};

fn main() -> Result<()> {
    let args = Args::parse();
    let env = Config::from_env();
    forest_cli::init_tracing(env.json_logs)?;

    let config = args.planner_config(&env)?;
    let raster = load_raster(&args.image)?;
    let rows = raster.len();
    let cols = raster.first().map(Vec::len).unwrap_or(0);
    let (start, target) = resolve_endpoints(args.start, args.target, rows, cols);
    tracing::info!(rows, cols, %start, %target, "planning route");

    let result = plan(&raster, &PlanRequest::new(start, target), &config)
        .with_context(|| format!("planning failed on {}", args.image.display()))?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");
    Ok(())
}
