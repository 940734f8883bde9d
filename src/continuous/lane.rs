//! Per-lane task and worker loop.
//!
//! Each lane owns one `crossbeam_channel` receiver and a dedicated
//! `std::thread`. `crossbeam_channel::Receiver::recv` blocks the worker
//! when the lane is idle and wakes it the instant a task arrives, giving
//! a FIFO, single-consumer, blocking-when-idle queue without hand-rolling
//! a mutex/condvar pair. See `DESIGN.md` for why this departs from a
//! busy-polling lane loop.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crossbeam::channel::Receiver;
use parking_lot::Mutex;
use serde::Serialize;
use smallvec::SmallVec;

use crate::domain::order::{Order, OrderId, Symbol};
use crate::domain::orderbook::MatchOutcome;
use crate::domain::trade::Trade;
use crate::engine::MatchingEngine;
use crate::shared::metrics::METRICS;

/// Work item routed to a single lane.
pub enum Task {
    Submit(Order),
    Cancel { symbol: Symbol, order_id: OrderId },
    /// Pushed after `running` flips false; drains behind any task already
    /// queued ahead of it, then the worker exits.
    Shutdown,
}

/// Outcome classification for a submitted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    /// Fully matched, or rested with no error. Also covers a limit order
    /// that partially fills and rests, see the Open Question resolution
    /// in `DESIGN.md`.
    Success,
    /// A market order matched some quantity but exhausted the opposite
    /// side before being fully filled.
    PartialFill,
    /// A market order found no resting liquidity at all.
    NoMatch,
    /// A cancel request found no such resting order (unknown symbol or
    /// unknown id).
    Error,
}

/// Reported to order-result observers once a submitted task has been
/// processed by its lane. Carries the trades the task produced (empty
/// for a cancel, or a submit with no cross).
#[derive(Debug, Clone, Serialize)]
pub struct OrderResult {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub status: Status,
    pub trades: SmallVec<[Trade; 8]>,
    pub message: Option<String>,
}

pub type TradeObserver = Box<dyn Fn(&Trade) + Send + Sync>;
pub type OrderResultObserver = Box<dyn Fn(&OrderResult) + Send + Sync>;

fn notify_trade(observers: &Mutex<Vec<TradeObserver>>, trade: &Trade) {
    for observer in observers.lock().iter() {
        if catch_unwind(AssertUnwindSafe(|| observer(trade))).is_err() {
            tracing::error!(symbol = %trade.symbol(), "trade observer panicked");
            METRICS
                .observer_faults_total
                .with_label_values(&[trade.symbol()])
                .inc();
        }
    }
}

fn notify_result(observers: &Mutex<Vec<OrderResultObserver>>, result: &OrderResult) {
    for observer in observers.lock().iter() {
        if catch_unwind(AssertUnwindSafe(|| observer(result))).is_err() {
            tracing::error!(symbol = %result.symbol, "order result observer panicked");
            METRICS
                .observer_faults_total
                .with_label_values(&[&result.symbol])
                .inc();
        }
    }
}

fn classify(outcome: MatchOutcome) -> Status {
    match outcome {
        MatchOutcome::NoLiquidity => Status::NoMatch,
        MatchOutcome::PartialFill => Status::PartialFill,
        MatchOutcome::Filled | MatchOutcome::Rested => Status::Success,
    }
}

/// The body of a lane's dedicated worker thread.
pub fn run(
    receiver: Receiver<Task>,
    engine: Arc<MatchingEngine>,
    trade_observers: Arc<Mutex<Vec<TradeObserver>>>,
    result_observers: Arc<Mutex<Vec<OrderResultObserver>>>,
) {
    while let Ok(task) = receiver.recv() {
        match task {
            Task::Submit(order) => {
                let order_id = order.id().clone();
                let symbol = order.symbol().clone();
                let side_label = match order.side() {
                    crate::domain::order::Side::Buy => "buy",
                    crate::domain::order::Side::Sell => "sell",
                };
                METRICS
                    .orders_total
                    .with_label_values(&[side_label, &symbol])
                    .inc();

                let started = Instant::now();
                let (trades, outcome) = engine.process_order(order);
                METRICS
                    .lane_task_duration
                    .with_label_values(&[&symbol])
                    .observe(started.elapsed().as_micros() as f64);
                for _ in &trades {
                    METRICS.trades_total.with_label_values(&[&symbol]).inc();
                }

                // Order-result observer sees the whole task once, before
                // trade observers see the individual fills it produced.
                let result = OrderResult {
                    order_id,
                    symbol,
                    status: classify(outcome),
                    trades: trades.clone(),
                    message: None,
                };
                notify_result(&result_observers, &result);
                for trade in &trades {
                    notify_trade(&trade_observers, trade);
                }
            }
            Task::Cancel { symbol, order_id } => {
                let hit = engine.cancel_order(&symbol, &order_id);
                METRICS
                    .cancellations_total
                    .with_label_values(&[&symbol, if hit { "hit" } else { "miss" }])
                    .inc();

                let result = OrderResult {
                    order_id,
                    symbol,
                    status: if hit { Status::Success } else { Status::Error },
                    trades: SmallVec::new(),
                    message: if hit {
                        None
                    } else {
                        Some("no such resting order".to_string())
                    },
                };
                notify_result(&result_observers, &result);
            }
            Task::Shutdown => break,
        }
    }
}
