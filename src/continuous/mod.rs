//! Continuous engine layer, the symbol-sharded dispatcher.
//!
//! `lane` is the per-lane task type and worker loop; `dispatcher` owns the
//! lanes, the write-once symbol→lane map, and the observer lists, and is
//! the type callers actually construct.

pub mod dispatcher;
pub mod lane;

pub use dispatcher::{ContinuousEngine, ContinuousEngineConfig};
pub use lane::{OrderResult, Status, Task, TradeObserver, OrderResultObserver};
