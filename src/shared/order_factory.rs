//! Order construction and id minting.
//!
//! Grounded on `original_source`'s `OrderFactory`: a static factory that
//! validates parameters, mints a monotonic order id, and stamps a
//! timestamp, returning nothing (there, a null pointer; here, `None`) on
//! invalid input rather than constructing a half-valid `Order`.

use std::sync::Arc;

use crate::domain::order::{Order, Side, Symbol};
use crate::domain::validation::{OrderValidator, ValidationError};
use crate::shared::ids;

/// Mints validated orders. Stateless beyond the validator it wraps; id and
/// timestamp generation use the process-global counters in `shared::ids`.
pub struct OrderFactory {
    validator: OrderValidator,
}

impl OrderFactory {
    pub fn new() -> Self {
        Self {
            validator: OrderValidator::new(),
        }
    }

    pub fn with_validator(validator: OrderValidator) -> Self {
        Self { validator }
    }

    /// Builds a limit order. `price` must be nonzero (zero is the market
    /// sentinel); returns `Err` without minting an id if validation fails.
    pub fn create_limit_order(
        &self,
        symbol: Symbol,
        side: Side,
        price: u64,
        quantity: u64,
    ) -> Result<Order, ValidationError> {
        if price == 0 {
            return Err(ValidationError::PriceOutOfRange(
                "limit order price must be greater than zero".to_string(),
            ));
        }
        self.validator.validate(&symbol, side, price, quantity)?;
        Ok(self.mint(symbol, side, price, quantity))
    }

    /// Builds a market order (price sentinel `0`).
    pub fn create_market_order(
        &self,
        symbol: Symbol,
        side: Side,
        quantity: u64,
    ) -> Result<Order, ValidationError> {
        self.validator.validate(&symbol, side, 0, quantity)?;
        Ok(self.mint(symbol, side, 0, quantity))
    }

    fn mint(&self, symbol: Symbol, side: Side, price: u64, quantity: u64) -> Order {
        let id: Arc<str> = Arc::from(ids::next_order_id());
        let timestamp = ids::next_timestamp();
        Order::new(id, symbol, side, price, quantity, timestamp)
    }
}

impl Default for OrderFactory {
    fn default() -> Self {
        Self::new()
    }
}
