//! Engine layer, the shared, multi-symbol matching engine that sits
//! between the domain's single-symbol books and the continuous engine's
//! symbol-sharded dispatcher.

pub mod matching_engine;

pub use matching_engine::MatchingEngine;
