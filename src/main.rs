//! Thin binary entry point; all logic lives in `interfaces::cli`.

use continuous_matching_engine::interfaces::cli;

fn main() {
    cli::run();
}
