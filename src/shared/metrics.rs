//! Prometheus metrics for the matching engine.
//!
//! Counters for orders processed, trades generated and cancellations
//! (split by hit/miss), plus a histogram of per-task lane latency. No
//! transport- or connection-level metrics: this crate has no network
//! layer to instrument.

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

lazy_static! {
    pub static ref METRICS: Metrics = Metrics::new();
}

pub struct Metrics {
    /// Orders submitted, labeled by side and symbol.
    pub orders_total: CounterVec,

    /// Trades produced, labeled by symbol.
    pub trades_total: CounterVec,

    /// Cancel requests, labeled by symbol and outcome (`hit`/`miss`).
    pub cancellations_total: CounterVec,

    /// Wall-clock time a lane spends processing one task, in
    /// microseconds, labeled by symbol.
    pub lane_task_duration: HistogramVec,

    /// Observer callbacks that panicked, labeled by symbol.
    pub observer_faults_total: CounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            orders_total: register_counter_vec!(
                "matching_engine_orders_total",
                "Total number of orders submitted",
                &["side", "symbol"]
            )
            .unwrap(),

            trades_total: register_counter_vec!(
                "matching_engine_trades_total",
                "Total number of trades executed",
                &["symbol"]
            )
            .unwrap(),

            cancellations_total: register_counter_vec!(
                "matching_engine_cancellations_total",
                "Total number of cancel requests",
                &["symbol", "outcome"]
            )
            .unwrap(),

            lane_task_duration: register_histogram_vec!(
                "matching_engine_lane_task_duration_microseconds",
                "Per-task lane processing duration in microseconds",
                &["symbol"],
                vec![1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0]
            )
            .unwrap(),

            observer_faults_total: register_counter_vec!(
                "matching_engine_observer_faults_total",
                "Total number of observer callbacks that panicked",
                &["symbol"]
            )
            .unwrap(),
        }
    }

    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        let mut buffer = vec![];
        encoder.encode(&metric_families, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[cfg(test)]
    pub fn reset(&self) {
        self.orders_total.reset();
        self.trades_total.reset();
        self.cancellations_total.reset();
        self.observer_faults_total.reset();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
