//! Order book implementations.
//!
//! `PriceTimeOrderBook` is the production implementation: a single-symbol
//! price-time priority book with no price banding and no bound on price
//! or quantity range.

pub mod price_time;
pub mod traits;

pub use price_time::PriceTimeOrderBook;
pub use traits::{MatchOutcome, OrderBook};
