//! Interning pool for symbol strings.
//!
//! A hot symbol is looked up on every order and trade; interning avoids
//! allocating a fresh `Arc<str>` each time. Read-heavy workloads take the
//! read-lock fast path; only the first sighting of a symbol pays for a
//! write lock and an allocation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

pub struct SymbolPool {
    symbols: RwLock<HashMap<String, Arc<str>>>,
}

impl SymbolPool {
    pub fn new() -> Self {
        Self {
            symbols: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Interns `symbol`, returning a shared handle. Repeated calls with
    /// the same string return `Arc`s pointing at the same allocation.
    #[inline]
    pub fn intern(&self, symbol: &str) -> Arc<str> {
        {
            let read_guard = self.symbols.read();
            if let Some(arc) = read_guard.get(symbol) {
                return arc.clone();
            }
        }

        let mut write_guard = self.symbols.write();
        write_guard
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::from(symbol))
            .clone()
    }

    /// Warms the pool with known symbols ahead of time, so the first
    /// order for each one doesn't pay for the write lock.
    pub fn preload(&self, symbols: &[&str]) {
        let mut write_guard = self.symbols.write();
        for &symbol in symbols {
            write_guard
                .entry(symbol.to_string())
                .or_insert_with(|| Arc::from(symbol));
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.read().is_empty()
    }

    #[cfg(test)]
    pub fn clear(&self) {
        self.symbols.write().clear();
    }
}

impl Default for SymbolPool {
    fn default() -> Self {
        Self::new()
    }
}
