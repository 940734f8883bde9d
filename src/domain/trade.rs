//! The record of a single match between a resting order and an aggressor.

use serde::Serialize;

use crate::domain::order::{OrderId, Symbol};

/// One fill produced by the matching algorithm. Always priced at the
/// resting order's price, never the aggressor's.
#[derive(Debug, Clone, Serialize)]
pub struct Trade {
    id: OrderId,
    symbol: Symbol,
    price: u64,
    quantity: u64,
    buy_order_id: OrderId,
    sell_order_id: OrderId,
    timestamp: u64,
}

impl Trade {
    pub fn new(
        id: OrderId,
        symbol: Symbol,
        price: u64,
        quantity: u64,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        timestamp: u64,
    ) -> Self {
        Self {
            id,
            symbol,
            price,
            quantity,
            buy_order_id,
            sell_order_id,
            timestamp,
        }
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn buy_order_id(&self) -> &OrderId {
        &self.buy_order_id
    }

    pub fn sell_order_id(&self) -> &OrderId {
        &self.sell_order_id
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}
