//! Order and Trade identity types shared across the domain, engine and
//! continuous layers.

use std::sync::Arc;

use serde::Serialize;

/// Opaque, globally-unique order identity. Minted by the external order
/// factory (`shared::order_factory`); the engine never interprets it.
pub type OrderId = Arc<str>;

/// Opaque instrument identity. Equality is byte-exact.
pub type Symbol = Arc<str>;

/// Which side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// A limit or market order.
///
/// `(id, side, symbol, price, timestamp)` are fixed once the order is
/// constructed; only `quantity` mutates in place, and only the lane that
/// owns the order's symbol may do so (see `continuous::dispatcher`).
///
/// Price is fixed-point ticks; `0` is the market-order sentinel. Quantity
/// is unsigned because the book's invariants guarantee it never goes
/// negative. Timestamp is a logical monotonic counter, not wall-clock time
/// (see `shared::ids::next_timestamp`).
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    id: OrderId,
    symbol: Symbol,
    side: Side,
    price: u64,
    quantity: u64,
    timestamp: u64,
}

impl Order {
    pub fn new(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        price: u64,
        quantity: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            id,
            symbol,
            side,
            price,
            quantity,
            timestamp,
        }
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// `true` for the price-`0` market-order sentinel. Market orders never
    /// rest on the book.
    pub fn is_market(&self) -> bool {
        self.price == 0
    }

    /// Decrements quantity by `amount`, used by the matching algorithm as a
    /// trade consumes liquidity from this order. Never called with an
    /// amount exceeding the current quantity.
    pub(crate) fn reduce_quantity(&mut self, amount: u64) {
        debug_assert!(amount <= self.quantity);
        self.quantity -= amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_sentinel_is_price_zero() {
        let o = Order::new(Arc::from("1"), Arc::from("AAPL"), Side::Buy, 0, 10, 1);
        assert!(o.is_market());
        let l = Order::new(Arc::from("2"), Arc::from("AAPL"), Side::Buy, 150_0000, 10, 2);
        assert!(!l.is_market());
    }

    #[test]
    fn opposite_side_flips() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }
}
