//! Order input validation.
//!
//! Rules: price must be positive for a limit order (`0` is reserved for
//! the market-order sentinel), quantity must be positive, symbol must not
//! be empty. These are the "Input-rejected" checks named in `spec.md`'s
//! error taxonomy, run before an order ever reaches the book.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::order::Side;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),
    #[error("price out of range: {0}")]
    PriceOutOfRange(String),
    #[error("quantity out of range: {0}")]
    QuantityOutOfRange(String),
}

/// Bounds a validator enforces beyond the always-on zero checks.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub max_price: u64,
    pub min_quantity: u64,
    pub max_quantity: u64,
    /// Empty means all symbols are allowed.
    pub allowed_symbols: Vec<Arc<str>>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_price: u64::MAX,
            min_quantity: 1,
            max_quantity: 1_000_000,
            allowed_symbols: Vec::new(),
        }
    }
}

pub struct OrderValidator {
    config: ValidationConfig,
}

impl OrderValidator {
    pub fn new() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validates a prospective order's fields. `price == 0` always passes
    /// (it is the market-order sentinel, checked separately by callers
    /// that need to distinguish market from limit).
    pub fn validate(
        &self,
        symbol: &Arc<str>,
        _side: Side,
        price: u64,
        quantity: u64,
    ) -> Result<(), ValidationError> {
        self.validate_price(price)?;
        self.validate_quantity(quantity)?;
        self.validate_symbol(symbol)?;
        Ok(())
    }

    fn validate_price(&self, price: u64) -> Result<(), ValidationError> {
        if price > self.config.max_price {
            return Err(ValidationError::PriceOutOfRange(format!(
                "price {} exceeds maximum {}",
                price, self.config.max_price
            )));
        }
        Ok(())
    }

    fn validate_quantity(&self, quantity: u64) -> Result<(), ValidationError> {
        if quantity == 0 {
            return Err(ValidationError::InvalidQuantity(
                "quantity must be greater than zero".to_string(),
            ));
        }
        if quantity < self.config.min_quantity {
            return Err(ValidationError::QuantityOutOfRange(format!(
                "quantity {} is below minimum {}",
                quantity, self.config.min_quantity
            )));
        }
        if quantity > self.config.max_quantity {
            return Err(ValidationError::QuantityOutOfRange(format!(
                "quantity {} exceeds maximum {}",
                quantity, self.config.max_quantity
            )));
        }
        Ok(())
    }

    fn validate_symbol(&self, symbol: &Arc<str>) -> Result<(), ValidationError> {
        if symbol.is_empty() {
            return Err(ValidationError::InvalidSymbol(
                "symbol cannot be empty".to_string(),
            ));
        }
        if !self.config.allowed_symbols.is_empty()
            && !self
                .config
                .allowed_symbols
                .iter()
                .any(|s| s.as_ref() == symbol.as_ref())
        {
            return Err(ValidationError::InvalidSymbol(format!(
                "symbol '{symbol}' is not in allowed list"
            )));
        }
        Ok(())
    }
}

impl Default for OrderValidator {
    fn default() -> Self {
        Self::new()
    }
}
