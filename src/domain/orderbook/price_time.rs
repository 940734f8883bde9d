//! Price-time priority order book backed by ordered sets over `(price,
//! timestamp, order_id)` keys, one `BTreeSet` per side plus a by-id map.
//!
//! Bids are keyed by `(Reverse(price), timestamp, order_id)` so ascending
//! iteration yields highest price first, then earliest timestamp. Asks
//! are keyed by `(price, timestamp, order_id)` directly. The order id is
//! a final tie-break so the key is a strict total order even in the
//! (practically unreachable, since timestamps are minted by a single
//! monotonic counter) case of two orders sharing a timestamp.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use smallvec::SmallVec;

use crate::domain::order::{Order, OrderId, Side, Symbol};
use crate::domain::orderbook::traits::{MatchOutcome, OrderBook};
use crate::domain::trade::Trade;
use crate::shared::ids;

type BidKey = (Reverse<u64>, u64, OrderId);
type AskKey = (u64, u64, OrderId);

fn bid_key(order: &Order) -> BidKey {
    (Reverse(order.price()), order.timestamp(), order.id().clone())
}

fn ask_key(order: &Order) -> AskKey {
    (order.price(), order.timestamp(), order.id().clone())
}

/// A single-symbol price-time priority book.
pub struct PriceTimeOrderBook {
    symbol: Symbol,
    bids: BTreeSet<BidKey>,
    asks: BTreeSet<AskKey>,
    by_id: HashMap<OrderId, Order>,
}

impl PriceTimeOrderBook {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: BTreeSet::new(),
            asks: BTreeSet::new(),
            by_id: HashMap::new(),
        }
    }

    fn insert_resting(&mut self, order: Order) {
        match order.side() {
            Side::Buy => {
                self.bids.insert(bid_key(&order));
            }
            Side::Sell => {
                self.asks.insert(ask_key(&order));
            }
        }
        self.by_id.insert(order.id().clone(), order);
    }

    /// Removes a fully-filled or cancelled resting order from both the
    /// side index and the by-id index.
    fn remove_resting(&mut self, order_id: &OrderId) -> Option<Order> {
        let order = self.by_id.remove(order_id)?;
        match order.side() {
            Side::Buy => {
                self.bids.remove(&bid_key(&order));
            }
            Side::Sell => {
                self.asks.remove(&ask_key(&order));
            }
        }
        Some(order)
    }

    /// Ids of resting orders on `side`, in price-time priority order.
    fn priority_ids(&self, side: Side) -> Vec<OrderId> {
        match side {
            Side::Buy => self.bids.iter().map(|k| k.2.clone()).collect(),
            Side::Sell => self.asks.iter().map(|k| k.2.clone()).collect(),
        }
    }
}

impl OrderBook for PriceTimeOrderBook {
    fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    fn add(&mut self, order: Order) -> bool {
        if order.symbol().as_ref() != self.symbol.as_ref() {
            return false;
        }
        if self.by_id.contains_key(order.id()) {
            return false;
        }
        self.insert_resting(order);
        true
    }

    fn cancel(&mut self, order_id: &OrderId) -> bool {
        self.remove_resting(order_id).is_some()
    }

    fn get_by_id(&self, order_id: &OrderId) -> Option<&Order> {
        self.by_id.get(order_id)
    }

    fn best_bid_price(&self) -> u64 {
        self.bids.iter().next().map(|k| k.0 .0).unwrap_or(0)
    }

    fn best_ask_price(&self) -> u64 {
        self.asks.iter().next().map(|k| k.0).unwrap_or(0)
    }

    fn bid_size(&self, price: u64) -> u64 {
        let mut total = 0u64;
        for key in &self.bids {
            let level_price = key.0 .0;
            if level_price == price {
                if let Some(order) = self.by_id.get(&key.2) {
                    total += order.quantity();
                }
            } else if level_price < price {
                break;
            }
        }
        total
    }

    fn ask_size(&self, price: u64) -> u64 {
        let mut total = 0u64;
        for key in &self.asks {
            let level_price = key.0;
            if level_price == price {
                if let Some(order) = self.by_id.get(&key.2) {
                    total += order.quantity();
                }
            } else if level_price > price {
                break;
            }
        }
        total
    }

    fn all_bids(&self) -> Vec<Order> {
        self.bids
            .iter()
            .filter_map(|k| self.by_id.get(&k.2).cloned())
            .collect()
    }

    fn all_asks(&self) -> Vec<Order> {
        self.asks
            .iter()
            .filter_map(|k| self.by_id.get(&k.2).cloned())
            .collect()
    }

    fn match_order(&mut self, mut order: Order) -> (SmallVec<[Trade; 8]>, MatchOutcome) {
        let mut trades: SmallVec<[Trade; 8]> = SmallVec::new();
        let opposite = order.side().opposite();

        // Step 1: market preflight. A market order with an empty opposite
        // side can never cross; reject immediately without touching the
        // book.
        if order.is_market() {
            let opposite_best = match opposite {
                Side::Buy => self.best_bid_price(),
                Side::Sell => self.best_ask_price(),
            };
            if opposite_best == 0 {
                return (trades, MatchOutcome::NoLiquidity);
            }
        }

        // Step 2: cross loop. Walk the opposite side in priority order,
        // stopping at the first resting order that fails the crossing
        // test or once the incoming order is fully filled.
        for resting_id in self.priority_ids(opposite) {
            if order.quantity() == 0 {
                break;
            }
            let resting_price = match self.by_id.get(&resting_id) {
                Some(resting) => resting.price(),
                None => continue,
            };
            let crosses = order.is_market()
                || match order.side() {
                    Side::Buy => order.price() >= resting_price,
                    Side::Sell => order.price() <= resting_price,
                };
            if !crosses {
                break;
            }

            let resting_quantity = self.by_id.get(&resting_id).unwrap().quantity();
            let trade_quantity = order.quantity().min(resting_quantity);

            let (buy_order_id, sell_order_id) = match order.side() {
                Side::Buy => (order.id().clone(), resting_id.clone()),
                Side::Sell => (resting_id.clone(), order.id().clone()),
            };
            let trade = Trade::new(
                ids::next_trade_id().into(),
                self.symbol.clone(),
                resting_price,
                trade_quantity,
                buy_order_id,
                sell_order_id,
                ids::next_timestamp(),
            );
            trades.push(trade);

            order.reduce_quantity(trade_quantity);
            let resting_mut = self.by_id.get_mut(&resting_id).unwrap();
            resting_mut.reduce_quantity(trade_quantity);
            if resting_mut.quantity() == 0 {
                self.remove_resting(&resting_id);
            }
        }

        // Step 3: rest any limit-order residual; market-order residual is
        // discarded.
        if order.quantity() > 0 {
            if order.is_market() {
                return (trades, MatchOutcome::PartialFill);
            }
            self.insert_resting(order);
            return (trades, MatchOutcome::Rested);
        }

        (trades, MatchOutcome::Filled)
    }
}
