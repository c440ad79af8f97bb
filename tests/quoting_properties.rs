//! Property-based tests for the range validator and the competitor analyzer.
//!
//! Uses proptest to verify invariants that should hold for all inputs.

use proptest::prelude::*;

use range_quoter::config::{PriceRange, TradingConfig};
use range_quoter::domain::{BookSnapshot, PriceLevel, Side};
use range_quoter::engine::desired_quote_price;

const TICK: f64 = 0.01;
const MIN_NOTIONAL: f64 = 10.0;

fn trading(bmin: f64, bmax: f64, smin: f64, smax: f64) -> TradingConfig {
    TradingConfig {
        symbol: "TESTUSDT".to_string(),
        buy_quantity: 1.0,
        sell_quantity: 1.0,
        buy_range: PriceRange::new(bmin, bmax),
        sell_range: PriceRange::new(smin, smax),
        max_price_deviation: 0.05,
        min_competitor_size: MIN_NOTIONAL,
    }
}

fn book_from(mut bids: Vec<(f64, f64)>, mut asks: Vec<(f64, f64)>) -> BookSnapshot {
    bids.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap());
    asks.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    BookSnapshot::new(
        bids.into_iter().map(|(p, q)| PriceLevel::new(p, q)).collect(),
        asks.into_iter().map(|(p, q)| PriceLevel::new(p, q)).collect(),
    )
}

fn levels() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((50.0..150.0f64, 0.0..5.0f64), 0..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// The validator accepts exactly when all bounds are positive, both ranges
    /// are properly ordered, and the buy range sits strictly below the sell
    /// range.
    #[test]
    fn validator_accepts_iff_invariants_hold(
        bmin in -50.0..200.0f64,
        bmax in -50.0..200.0f64,
        smin in -50.0..200.0f64,
        smax in -50.0..200.0f64,
    ) {
        let expected = bmin > 0.0
            && bmax > 0.0
            && smin > 0.0
            && smax > 0.0
            && bmin < bmax
            && smin < smax
            && bmax < smin;

        let accepted = trading(bmin, bmax, smin, smax).validate().is_ok();
        prop_assert_eq!(accepted, expected);
    }

    /// The buy target never leaves the buy range, whatever the book shows.
    #[test]
    fn buy_target_stays_in_range(bids in levels(), asks in levels()) {
        let range = PriceRange::new(100.0, 102.0);
        let book = book_from(bids, asks);
        let target = desired_quote_price(&book, Side::Buy, &range, MIN_NOTIONAL, TICK, None);
        prop_assert!(range.contains(target), "buy target {} left {:?}", target, range);
    }

    /// The sell target never leaves the sell range.
    #[test]
    fn sell_target_stays_in_range(bids in levels(), asks in levels()) {
        let range = PriceRange::new(108.0, 110.0);
        let book = book_from(bids, asks);
        let target = desired_quote_price(&book, Side::Sell, &range, MIN_NOTIONAL, TICK, None);
        prop_assert!(range.contains(target), "sell target {} left {:?}", target, range);
    }

    /// With disjoint ranges the two sides can never cross, whatever the book.
    #[test]
    fn quotes_never_cross(bids in levels(), asks in levels()) {
        let buy_range = PriceRange::new(100.0, 102.0);
        let sell_range = PriceRange::new(108.0, 110.0);
        let book = book_from(bids, asks);

        let buy = desired_quote_price(&book, Side::Buy, &buy_range, MIN_NOTIONAL, TICK, None);
        let sell = desired_quote_price(&book, Side::Sell, &sell_range, MIN_NOTIONAL, TICK, None);
        prop_assert!(buy < sell, "crossed: buy {} >= sell {}", buy, sell);
    }

    /// Identical inputs produce the identical target.
    #[test]
    fn analyzer_is_deterministic(bids in levels(), asks in levels()) {
        let range = PriceRange::new(100.0, 102.0);
        let book = book_from(bids, asks);

        let first = desired_quote_price(&book, Side::Buy, &range, MIN_NOTIONAL, TICK, None);
        let second = desired_quote_price(&book, Side::Buy, &range, MIN_NOTIONAL, TICK, None);
        prop_assert_eq!(first, second);
    }

    /// A lone in-range competitor either qualifies (target beats or matches it
    /// under clamping) or is ignored (target goes to the favorable edge).
    #[test]
    fn threshold_splits_beat_from_ignore(
        price in 100.0..102.0f64,
        qty in 0.0..2.0f64,
    ) {
        let range = PriceRange::new(100.0, 102.0);
        let book = book_from(vec![(price, qty)], vec![]);
        let target = desired_quote_price(&book, Side::Buy, &range, MIN_NOTIONAL, TICK, None);

        if price * qty >= MIN_NOTIONAL {
            prop_assert!(target >= price, "target {} does not beat {}", target, price);
            prop_assert!(target <= range.max);
        } else {
            prop_assert_eq!(target, range.max);
        }
    }
}
