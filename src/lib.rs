//! A multi-symbol continuous limit-order matching engine.
//!
//! Three layers, leaves first:
//!
//! - [`domain`]: the data model and the `OrderBook` trait plus its
//!   price-time priority implementation. No concurrency, no I/O.
//! - [`engine`]: the shared, multi-symbol `MatchingEngine`, a
//!   symbol→book map and the `process_order`/`cancel_order` primitives.
//!   Single-threaded per symbol; callers serialize.
//! - [`continuous`]: the symbol-sharded dispatcher (`ContinuousEngine`),
//!   routes submit/cancel requests onto a fixed worker lane chosen by a
//!   stable hash of the symbol, and fans results out to registered trade
//!   and order-result observers.
//!
//! [`shared`] holds cross-cutting concerns (id/timestamp minting, order
//! construction and validation, symbol interning, error types, metrics)
//! used across all three layers. [`interfaces`] is the crate's CLI demo
//! driver; it contains no matching logic.

pub mod continuous;
pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod shared;

pub use continuous::{ContinuousEngine, ContinuousEngineConfig};
pub use domain::{Order, OrderBook, PriceTimeOrderBook, Side, Symbol, Trade};
pub use engine::MatchingEngine;
pub use shared::OrderFactory;
