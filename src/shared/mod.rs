//! Cross-cutting utilities shared across the domain, engine and
//! continuous layers: id/timestamp minting, order construction, symbol
//! interning, error types and metrics.

pub mod error;
pub mod ids;
pub mod metrics;
pub mod order_factory;
pub mod symbol_pool;

pub use error::EngineError;
pub use order_factory::OrderFactory;
pub use symbol_pool::SymbolPool;
