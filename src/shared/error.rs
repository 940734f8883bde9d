//! Crate-wide error types for the cases that are genuinely exceptional
//! from a caller's perspective. Business outcomes a caller should expect
//! in normal operation (input-rejected, no-liquidity) are expressed as
//! plain return values/enums instead of these.

use thiserror::Error;

use crate::domain::order::{OrderId, Symbol};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("unknown symbol: {0}")]
    UnknownSymbol(Symbol),
}
