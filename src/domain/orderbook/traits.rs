//! OrderBook trait, the domain-layer abstraction every book
//! implementation must satisfy.
//!
//! A book holds arbitrary non-negative prices for a single symbol: no
//! price banding, no pre-declared tick size or price range. The trait is
//! kept so a different backing structure could be swapped in behind
//! `engine::matching_engine::MatchingEngine` without touching it.

use crate::domain::order::{Order, OrderId, Symbol};
use crate::domain::trade::Trade;
use smallvec::SmallVec;

/// The result of running the matching algorithm against an incoming order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The order's quantity was fully consumed by trades.
    Filled,
    /// A non-market order's residual quantity now rests on the book.
    Rested,
    /// A market order found no resting liquidity on the opposite side;
    /// no trades were produced.
    NoLiquidity,
    /// A market order matched some quantity but exhausted the opposite
    /// side before being fully filled; the residual is discarded.
    PartialFill,
}

/// A single-symbol, price-time priority limit order book.
///
/// Implementations own no concurrency: callers (the engine, and above it
/// the per-symbol lane) are responsible for serializing access to a given
/// book. A book is a bare data structure with no locking of its own.
pub trait OrderBook {
    /// The symbol this book serves.
    fn symbol(&self) -> &Symbol;

    /// Inserts a resting order. Returns `false` (and does nothing) if the
    /// order's symbol doesn't match this book's symbol or if its id is
    /// already present.
    fn add(&mut self, order: Order) -> bool;

    /// Removes a resting order by id. Returns `false` if no such order is
    /// resting on this book.
    fn cancel(&mut self, order_id: &OrderId) -> bool;

    /// Looks up a resting order by id.
    fn get_by_id(&self, order_id: &OrderId) -> Option<&Order>;

    /// Highest resting bid price, or `0` if the bid side is empty.
    fn best_bid_price(&self) -> u64;

    /// Lowest resting ask price, or `0` if the ask side is empty.
    fn best_ask_price(&self) -> u64;

    /// Total resting quantity at an exact bid price level.
    fn bid_size(&self, price: u64) -> u64;

    /// Total resting quantity at an exact ask price level.
    fn ask_size(&self, price: u64) -> u64;

    /// All resting bids, ordered by price descending then time ascending.
    fn all_bids(&self) -> Vec<Order>;

    /// All resting asks, ordered by price ascending then time ascending.
    fn all_asks(&self) -> Vec<Order>;

    /// Runs the three-step matching algorithm for an incoming order:
    /// market preflight, cross loop against the opposite side, and rest
    /// of any non-market residual. Returns the trades produced (in the
    /// order they were generated) plus the overall outcome.
    fn match_order(&mut self, order: Order) -> (SmallVec<[Trade; 8]>, MatchOutcome);
}
