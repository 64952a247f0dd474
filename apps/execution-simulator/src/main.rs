//! Execution Simulator Binary
//!
//! Runs one simulated execution session and logs the run summary.
//!
//! # Usage
//!
//! ```bash
//! # Built-in defaults, no config file needed
//! cargo run --bin execution-simulator
//!
//! # Explicit configuration
//! cargo run --bin execution-simulator -- session.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use anyhow::Result;
use tracing::info;

use execution_simulator::{ExecutionSimulator, load_config};

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let config = load_config(args.get(1).map(String::as_str))?;

    info!(
        ticker = %config.order.ticker,
        side = ?config.order.side,
        quantity = config.order.total_quantity,
        periods = config.session.participation_curve.len(),
        venues = config.venues.len(),
        seed = config.rng_seed,
        "starting execution session"
    );

    let mut simulator = ExecutionSimulator::new(&config)?;
    let report = simulator.run();

    let vwap = report
        .average_price
        .map_or_else(|| "n/a".to_string(), |price| price.to_string());
    info!(
        status = %report.final_status,
        filled = %report.filled_quantity,
        remaining = %report.remaining_quantity,
        vwap = %vwap,
        slices = report.slices_released,
        routes = report.routes_created,
        records = report.records_written,
        "execution session finished"
    );

    Ok(())
}

/// Initialize tracing from `RUST_LOG`, with the simulator's own crate
/// defaulting to info.
///
/// Uses a static directive string that is a compile-time constant
/// guaranteed to parse.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "execution_simulator=info"
                    .parse()
                    .expect("static directive 'execution_simulator=info' is valid"),
            ),
        )
        .init();
}
