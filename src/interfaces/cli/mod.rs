//! CLI demo driver.
//!
//! `spec.md` §1 excludes "the command-line driver, logging, and
//! human-readable string formatting" from the core; this module supplies
//! them, grounded on the teacher's `interfaces::cli` shape (a
//! `clap`-derived config, a `tracing_subscriber` logging init, a thin
//! `run()` entry point) but driving the actual `ContinuousEngine`
//! instead of the teacher's network server. It contains no matching
//! logic of its own; everything here is wiring and printing.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;

use crate::continuous::{ContinuousEngine, ContinuousEngineConfig};
use crate::domain::order::Side;
use crate::shared::order_factory::OrderFactory;

/// Configuration recognized by the dispatcher plus the demo driver's own
/// knobs. `num_threads` is the one option `spec.md` §6 actually names.
#[derive(Parser, Debug, Clone)]
#[command(name = "continuous-matching-engine")]
#[command(version = "0.1.0")]
#[command(about = "Continuous limit-order matching engine demo", long_about = None)]
pub struct CliConfig {
    /// Number of dispatcher lanes. `0` auto-detects the CPU count.
    #[arg(short = 'n', long, default_value_t = 4)]
    pub num_threads: usize,

    /// Per-lane bounded-channel capacity.
    #[arg(short = 'q', long, default_value_t = 10_000)]
    pub queue_capacity: usize,

    /// Symbol the scripted demo submits orders against.
    #[arg(short = 's', long, default_value = "AAPL")]
    pub symbol: String,

    /// Log level passed to `tracing_subscriber`'s env filter.
    #[arg(short = 'l', long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,

    /// Print the resolved configuration and exit without running the
    /// engine.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

fn resolve_num_threads(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get()
    } else {
        requested
    }
}

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}

/// Runs a short scripted sequence against a real `ContinuousEngine`,
/// printing every trade and order result as it is delivered: a resting
/// sell, a crossing buy that fills it, a market order that sweeps
/// whatever remains, and a cancel against an order that no longer rests.
fn run_demo_sequence(engine: &Arc<ContinuousEngine>, symbol: &str) {
    let factory = OrderFactory::new();
    let symbol: crate::domain::order::Symbol = Arc::from(symbol);

    engine.register_trade_observer(|trade| {
        println!(
            "trade: {}",
            serde_json::to_string(trade).unwrap_or_default()
        );
    });
    engine.register_order_observer(|result| {
        println!(
            "result: {}",
            serde_json::to_string(result).unwrap_or_default()
        );
    });

    let resting = factory
        .create_limit_order(symbol.clone(), Side::Sell, 150_0000, 100)
        .expect("valid demo order");
    let resting_id = resting.id().clone();
    engine.submit_order(resting);

    let crossing = factory
        .create_limit_order(symbol.clone(), Side::Buy, 150_0000, 60)
        .expect("valid demo order");
    engine.submit_order(crossing);

    let sweep = factory
        .create_market_order(symbol.clone(), Side::Buy, 1000)
        .expect("valid demo order");
    engine.submit_order(sweep);

    engine.cancel_order(resting_id, symbol);

    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        thread::sleep(Duration::from_millis(20));
    }
}

/// Entry point delegated to from `main`.
pub fn run() {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    let num_threads = resolve_num_threads(config.num_threads);
    tracing::info!(?config, num_threads, "starting continuous matching engine");

    if config.dry_run {
        println!("{config:#?}");
        println!("resolved num_threads: {num_threads}");
        return;
    }

    let engine = Arc::new(ContinuousEngine::new(ContinuousEngineConfig {
        num_threads,
        queue_capacity: config.queue_capacity,
    }));
    engine.start();

    run_demo_sequence(&engine, &config.symbol);

    engine.stop();
    tracing::info!("continuous matching engine stopped");
}
