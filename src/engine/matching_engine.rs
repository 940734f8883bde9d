//! The shared, multi-symbol matching engine.
//!
//! Owns a symbol → book map and exposes `add_symbol`/`remove_symbol`/
//! `has_symbol`/`list_symbols`/`get_book`/`process_order`/`cancel_order`
//! plus delegated best-price/size queries. `process_order` auto-creates a
//! book the first time it sees a symbol.
//!
//! Each symbol's book sits behind its own `parking_lot::Mutex` so that
//! work on different symbols never contends; only inserting a brand-new
//! symbol briefly takes the outer map's write lock. Callers above this
//! layer (the continuous engine's per-symbol lanes) are responsible for
//! ensuring a single symbol is never driven by two threads at once; this
//! engine does not serialize *within* a symbol beyond what the mutex
//! already gives it for free.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use smallvec::SmallVec;

use crate::domain::order::{Order, OrderId, Symbol};
use crate::domain::orderbook::{MatchOutcome, OrderBook, PriceTimeOrderBook};
use crate::domain::trade::Trade;
use crate::shared::error::EngineError;

pub struct MatchingEngine {
    books: RwLock<HashMap<Symbol, Arc<Mutex<PriceTimeOrderBook>>>>,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self {
            books: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `symbol` with an empty book. Returns `false` if the
    /// symbol was already known.
    pub fn add_symbol(&self, symbol: Symbol) -> bool {
        let mut books = self.books.write();
        if books.contains_key(&symbol) {
            return false;
        }
        books.insert(
            symbol.clone(),
            Arc::new(Mutex::new(PriceTimeOrderBook::new(symbol))),
        );
        true
    }

    /// Drops a symbol's book outright. Does not drain resting orders
    /// first or notify anyone holding references to them; draining, if
    /// wanted, is the caller's responsibility before calling this.
    pub fn remove_symbol(&self, symbol: &Symbol) -> bool {
        self.books.write().remove(symbol).is_some()
    }

    pub fn has_symbol(&self, symbol: &Symbol) -> bool {
        self.books.read().contains_key(symbol)
    }

    pub fn list_symbols(&self) -> Vec<Symbol> {
        self.books.read().keys().cloned().collect()
    }

    fn book_for(&self, symbol: &Symbol) -> Option<Arc<Mutex<PriceTimeOrderBook>>> {
        self.books.read().get(symbol).cloned()
    }

    fn book_for_or_create(&self, symbol: &Symbol) -> Arc<Mutex<PriceTimeOrderBook>> {
        if let Some(book) = self.book_for(symbol) {
            return book;
        }
        let mut books = self.books.write();
        books
            .entry(symbol.clone())
            .or_insert_with(|| Arc::new(Mutex::new(PriceTimeOrderBook::new(symbol.clone()))))
            .clone()
    }

    /// Runs the matching algorithm for `order` against its symbol's book,
    /// auto-creating the book if this is the first order seen for that
    /// symbol.
    pub fn process_order(&self, order: Order) -> (SmallVec<[Trade; 8]>, MatchOutcome) {
        let book = self.book_for_or_create(order.symbol());
        book.lock().match_order(order)
    }

    /// Cancels a resting order. Returns `false` if the symbol is unknown
    /// or no such order is resting.
    pub fn cancel_order(&self, symbol: &Symbol, order_id: &OrderId) -> bool {
        self.cancel_order_detailed(symbol, order_id).is_ok()
    }

    /// Same cancellation as `cancel_order`, but distinguishes an unknown
    /// symbol from a known symbol with no such resting order.
    pub fn cancel_order_detailed(
        &self,
        symbol: &Symbol,
        order_id: &OrderId,
    ) -> Result<(), EngineError> {
        let book = self
            .book_for(symbol)
            .ok_or_else(|| EngineError::UnknownSymbol(symbol.clone()))?;
        if book.lock().cancel(order_id) {
            Ok(())
        } else {
            Err(EngineError::OrderNotFound(order_id.clone()))
        }
    }

    pub fn get_by_id(&self, symbol: &Symbol, order_id: &OrderId) -> Option<Order> {
        self.book_for(symbol)?.lock().get_by_id(order_id).cloned()
    }

    pub fn best_bid_price(&self, symbol: &Symbol) -> u64 {
        self.book_for(symbol).map_or(0, |b| b.lock().best_bid_price())
    }

    pub fn best_ask_price(&self, symbol: &Symbol) -> u64 {
        self.book_for(symbol).map_or(0, |b| b.lock().best_ask_price())
    }

    pub fn bid_size(&self, symbol: &Symbol, price: u64) -> u64 {
        self.book_for(symbol).map_or(0, |b| b.lock().bid_size(price))
    }

    pub fn ask_size(&self, symbol: &Symbol, price: u64) -> u64 {
        self.book_for(symbol).map_or(0, |b| b.lock().ask_size(price))
    }

    pub fn all_bids(&self, symbol: &Symbol) -> Vec<Order> {
        self.book_for(symbol).map_or_else(Vec::new, |b| b.lock().all_bids())
    }

    pub fn all_asks(&self, symbol: &Symbol) -> Vec<Order> {
        self.book_for(symbol).map_or_else(Vec::new, |b| b.lock().all_asks())
    }

    /// Gives scoped read access to a symbol's book through the `OrderBook`
    /// trait, e.g. for callers that want several queries without paying
    /// for the lock repeatedly. Returns `None` if the symbol is unknown.
    pub fn get_book<R>(&self, symbol: &Symbol, f: impl FnOnce(&dyn OrderBook) -> R) -> Option<R> {
        let book = self.book_for(symbol)?;
        let guard = book.lock();
        Some(f(&*guard))
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Side;
    use crate::shared::ids::{next_order_id, next_timestamp};

    fn limit(symbol: &Symbol, side: Side, price: u64, quantity: u64) -> Order {
        Order::new(
            Arc::from(next_order_id()),
            symbol.clone(),
            side,
            price,
            quantity,
            next_timestamp(),
        )
    }

    #[test]
    fn process_order_auto_creates_book() {
        let engine = MatchingEngine::new();
        let symbol: Symbol = Arc::from("AAPL");
        assert!(!engine.has_symbol(&symbol));

        engine.process_order(limit(&symbol, Side::Buy, 100, 10));
        assert!(engine.has_symbol(&symbol));
        assert_eq!(engine.best_bid_price(&symbol), 100);
    }

    #[test]
    fn unknown_symbol_queries_return_sentinels() {
        let engine = MatchingEngine::new();
        let symbol: Symbol = Arc::from("MSFT");
        assert_eq!(engine.best_bid_price(&symbol), 0);
        assert_eq!(engine.best_ask_price(&symbol), 0);
        assert!(engine.all_bids(&symbol).is_empty());
        assert!(!engine.cancel_order(&symbol, &Arc::from("O1")));
    }

    #[test]
    fn add_symbol_is_idempotent_false_on_repeat() {
        let engine = MatchingEngine::new();
        let symbol: Symbol = Arc::from("AAPL");
        assert!(engine.add_symbol(symbol.clone()));
        assert!(!engine.add_symbol(symbol));
    }

    #[test]
    fn remove_symbol_drops_book_without_draining() {
        let engine = MatchingEngine::new();
        let symbol: Symbol = Arc::from("AAPL");
        engine.process_order(limit(&symbol, Side::Buy, 100, 10));
        assert!(engine.remove_symbol(&symbol));
        assert!(!engine.has_symbol(&symbol));
        assert_eq!(engine.best_bid_price(&symbol), 0);
    }

    #[test]
    fn cross_symbol_orders_do_not_interact() {
        let engine = MatchingEngine::new();
        let aapl: Symbol = Arc::from("AAPL");
        let msft: Symbol = Arc::from("MSFT");

        engine.process_order(limit(&aapl, Side::Sell, 100, 10));
        let (trades, outcome) = engine.process_order(limit(&msft, Side::Buy, 100, 10));

        assert!(trades.is_empty());
        assert_eq!(outcome, MatchOutcome::Rested);
    }

    #[test]
    fn cancel_detailed_distinguishes_unknown_symbol_from_unknown_order() {
        let engine = MatchingEngine::new();
        let symbol: Symbol = Arc::from("AAPL");
        engine.process_order(limit(&symbol, Side::Buy, 100, 10));

        let unknown_symbol: Symbol = Arc::from("MSFT");
        assert!(matches!(
            engine.cancel_order_detailed(&unknown_symbol, &Arc::from("O1")),
            Err(EngineError::UnknownSymbol(_))
        ));

        assert!(matches!(
            engine.cancel_order_detailed(&symbol, &Arc::from("no-such-id")),
            Err(EngineError::OrderNotFound(_))
        ));
    }
}
