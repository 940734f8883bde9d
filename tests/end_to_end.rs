//! End-to-end scenarios against the public `MatchingEngine` API, taken
//! verbatim from `spec.md` §8's six concrete scenarios.

use std::sync::Arc;

use continuous_matching_engine::domain::order::{Order, Side, Symbol};
use continuous_matching_engine::domain::orderbook::MatchOutcome;
use continuous_matching_engine::engine::MatchingEngine;

fn limit(symbol: &Symbol, id: &str, side: Side, price: u64, quantity: u64, ts: u64) -> Order {
    Order::new(Arc::from(id), symbol.clone(), side, price, quantity, ts)
}

fn market(symbol: &Symbol, id: &str, side: Side, quantity: u64, ts: u64) -> Order {
    Order::new(Arc::from(id), symbol.clone(), side, 0, quantity, ts)
}

#[test]
fn scenario_1_no_cross_limit_rests() {
    let engine = MatchingEngine::new();
    let symbol: Symbol = Arc::from("AAPL");

    let (trades, _) = engine.process_order(limit(&symbol, "b1", Side::Buy, 150_0000, 100, 1));
    assert!(trades.is_empty());
    assert_eq!(engine.best_bid_price(&symbol), 150_0000);
    assert_eq!(engine.bid_size(&symbol, 150_0000), 100);
}

#[test]
fn scenario_2_full_cross() {
    let engine = MatchingEngine::new();
    let symbol: Symbol = Arc::from("AAPL");

    engine.process_order(limit(&symbol, "s1", Side::Sell, 150_0000, 100, 1));
    let (trades, _) = engine.process_order(limit(&symbol, "b1", Side::Buy, 150_0000, 50, 2));

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price(), 150_0000);
    assert_eq!(trades[0].quantity(), 50);
    assert_eq!(*trades[0].buy_order_id(), Arc::<str>::from("b1"));
    assert_eq!(*trades[0].sell_order_id(), Arc::<str>::from("s1"));

    assert_eq!(engine.ask_size(&symbol, 150_0000), 50);
    assert_eq!(engine.best_bid_price(&symbol), 0);
}

#[test]
fn scenario_3_sweep_multiple_levels() {
    let engine = MatchingEngine::new();
    let symbol: Symbol = Arc::from("AAPL");

    engine.process_order(limit(&symbol, "s1", Side::Sell, 150_0000, 50, 1));
    engine.process_order(limit(&symbol, "s2", Side::Sell, 155_0000, 50, 2));
    engine.process_order(limit(&symbol, "s3", Side::Sell, 160_0000, 50, 3));

    let (trades, outcome) = engine.process_order(limit(&symbol, "b1", Side::Buy, 160_0000, 150, 4));

    assert_eq!(trades.len(), 3);
    let prices: Vec<u64> = trades.iter().map(|t| t.price()).collect();
    assert_eq!(prices, vec![150_0000, 155_0000, 160_0000]);
    for trade in &trades {
        assert_eq!(trade.quantity(), 50);
    }
    assert_eq!(outcome, MatchOutcome::Filled);
    assert_eq!(engine.best_bid_price(&symbol), 0);
    assert_eq!(engine.best_ask_price(&symbol), 0);
}

#[test]
fn scenario_4_market_buy_empty_asks_is_no_match() {
    let engine = MatchingEngine::new();
    let symbol: Symbol = Arc::from("AAPL");

    let (trades, outcome) = engine.process_order(market(&symbol, "b1", Side::Buy, 50, 1));

    assert!(trades.is_empty());
    assert_eq!(outcome, MatchOutcome::NoLiquidity);
    assert_eq!(engine.best_bid_price(&symbol), 0);
}

#[test]
fn scenario_5_market_buy_partial_fill_discards_residual() {
    let engine = MatchingEngine::new();
    let symbol: Symbol = Arc::from("AAPL");

    engine.process_order(limit(&symbol, "s1", Side::Sell, 150_0000, 30, 1));
    let (trades, outcome) = engine.process_order(market(&symbol, "b1", Side::Buy, 50, 2));

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price(), 150_0000);
    assert_eq!(trades[0].quantity(), 30);
    assert_eq!(outcome, MatchOutcome::PartialFill);
    assert_eq!(engine.best_ask_price(&symbol), 0);
    assert_eq!(engine.best_bid_price(&symbol), 0);
}

#[test]
fn cross_symbol_books_never_interact() {
    let engine = MatchingEngine::new();
    let aapl: Symbol = Arc::from("AAPL");
    let msft: Symbol = Arc::from("MSFT");

    engine.process_order(limit(&aapl, "s1", Side::Sell, 100, 10, 1));
    let (trades, _) = engine.process_order(limit(&msft, "b1", Side::Buy, 100, 10, 2));

    assert!(trades.is_empty());
    assert_eq!(engine.best_ask_price(&aapl), 100);
    assert_eq!(engine.best_bid_price(&msft), 100);
}

#[test]
fn add_symbol_is_idempotent() {
    let engine = MatchingEngine::new();
    let symbol: Symbol = Arc::from("AAPL");
    assert!(engine.add_symbol(symbol.clone()));
    assert!(!engine.add_symbol(symbol));
}

#[test]
fn cancel_then_cancel_again_fails_second_time() {
    let engine = MatchingEngine::new();
    let symbol: Symbol = Arc::from("AAPL");
    let order_id: Arc<str> = Arc::from("b1");

    engine.process_order(limit(&symbol, "b1", Side::Buy, 100, 10, 1));
    assert!(engine.cancel_order(&symbol, &order_id));
    assert!(!engine.cancel_order(&symbol, &order_id));
}
