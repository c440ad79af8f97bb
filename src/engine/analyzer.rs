//! Competitor analysis: where should this side's quote sit right now?
//!
//! Pure and deterministic: the same (snapshot, range, threshold, own order)
//! always yields the same target, which is what makes the no-duplicate-order
//! behavior of the state machine reproducible in tests.

use crate::config::PriceRange;
use crate::domain::{round_to_tick_down, round_to_tick_up, BookSnapshot, LiveOrder, Side};

/// Decide the target price for one side's quote.
///
/// Levels outside the configured range never count, wherever they sit in the
/// book; the best level being out of range means it is skipped, not taken as
/// the answer. Levels whose notional is below `min_competitor_notional` are
/// left to fill on their own. With no qualifying competitor the quote goes to
/// the range edge most favorable to the trader (buy: max, sell: min);
/// otherwise it goes one tick past the best qualifying competitor, clamped so
/// it never leaves the range even at the cost of queue priority.
pub fn desired_quote_price(
    book: &BookSnapshot,
    side: Side,
    range: &PriceRange,
    min_competitor_notional: f64,
    tick: f64,
    own_order: Option<&LiveOrder>,
) -> f64 {
    let competitor = best_competitor(book, side, range, min_competitor_notional, tick, own_order);

    let raw = match (competitor, side) {
        (None, Side::Buy) => range.max,
        (None, Side::Sell) => range.min,
        (Some(price), Side::Buy) => range.clamp(price + tick),
        (Some(price), Side::Sell) => range.clamp(price - tick),
    };

    align_into_range(raw, side, range, tick)
}

/// The price of the best in-range competitor worth beating, if any.
///
/// Bids are scanned descending and asks ascending, so the first qualifying
/// level is the one closest to the spread. The engine's own resting quantity
/// is subtracted from the level at its price first, so we never beat ourselves.
fn best_competitor(
    book: &BookSnapshot,
    side: Side,
    range: &PriceRange,
    min_competitor_notional: f64,
    tick: f64,
    own_order: Option<&LiveOrder>,
) -> Option<f64> {
    for level in book.levels_for(side) {
        if !range.contains(level.price) {
            continue;
        }

        let mut qty = level.qty;
        if let Some(own) = own_order {
            if (level.price - own.price).abs() < tick / 2.0 {
                qty = (qty - own.qty).max(0.0);
            }
        }

        if level.price * qty >= min_competitor_notional {
            return Some(level.price);
        }
    }
    None
}

/// Tick-round toward the range (buy down, sell up), then nudge back inside if
/// the range bound itself is not tick-aligned.
fn align_into_range(price: f64, side: Side, range: &PriceRange, tick: f64) -> f64 {
    match side {
        Side::Buy => {
            let rounded = round_to_tick_down(price, tick);
            if rounded < range.min {
                round_to_tick_up(range.min, tick)
            } else {
                rounded
            }
        }
        Side::Sell => {
            let rounded = round_to_tick_up(price, tick);
            if rounded > range.max {
                round_to_tick_down(range.max, tick)
            } else {
                rounded
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderStatus, PriceLevel};

    const TICK: f64 = 0.01;
    const MIN_NOTIONAL: f64 = 10.0;

    fn buy_range() -> PriceRange {
        PriceRange::new(100.0, 102.0)
    }

    fn sell_range() -> PriceRange {
        PriceRange::new(108.0, 110.0)
    }

    fn book(bids: &[(f64, f64)], asks: &[(f64, f64)]) -> BookSnapshot {
        BookSnapshot::new(
            bids.iter().map(|&(p, q)| PriceLevel::new(p, q)).collect(),
            asks.iter().map(|&(p, q)| PriceLevel::new(p, q)).collect(),
        )
    }

    fn own(side: Side, price: f64, qty: f64) -> LiveOrder {
        LiveOrder {
            order_id: "own-1".to_string(),
            side,
            price,
            qty,
            status: OrderStatus::Open,
        }
    }

    #[test]
    fn beats_qualifying_bid_by_one_tick() {
        // Competitor bid at 101.5, above the notional threshold, tick 0.01
        let book = book(&[(101.5, 1.0)], &[]);
        let target =
            desired_quote_price(&book, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, None);
        assert_eq!(target, 101.51);
    }

    #[test]
    fn beating_clamps_to_range_max() {
        // A tick large enough to overshoot the range clamps to the boundary
        let book = book(&[(101.5, 1.0)], &[]);
        let target = desired_quote_price(&book, Side::Buy, &buy_range(), MIN_NOTIONAL, 1.0, None);
        assert_eq!(target, 102.0);
    }

    #[test]
    fn empty_book_goes_to_favorable_edge() {
        let book = book(&[], &[]);
        assert_eq!(
            desired_quote_price(&book, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, None),
            102.0
        );
        assert_eq!(
            desired_quote_price(&book, Side::Sell, &sell_range(), MIN_NOTIONAL, TICK, None),
            108.0
        );
    }

    #[test]
    fn out_of_range_best_level_is_skipped_not_taken() {
        // Best bid 103 sits above the buy range; the in-range 101 is the one
        // to beat, not 103 and not the range edge.
        let book = book(&[(103.0, 5.0), (101.0, 5.0)], &[]);
        let target =
            desired_quote_price(&book, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, None);
        assert_eq!(target, 101.01);
    }

    #[test]
    fn all_levels_out_of_range_means_edge() {
        let book = book(&[(99.0, 5.0), (98.5, 5.0)], &[]);
        let target =
            desired_quote_price(&book, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, None);
        assert_eq!(target, 102.0);
    }

    #[test]
    fn small_competitor_is_ignored() {
        // 101.5 * 0.05 = 5.075 notional, below the 10.0 threshold
        let book = book(&[(101.5, 0.05)], &[]);
        let target =
            desired_quote_price(&book, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, None);
        assert_eq!(target, 102.0);
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        // Exactly at the threshold qualifies; a hair below does not.
        let at = book(&[(100.0, 0.1)], &[]); // notional 10.0
        assert_eq!(
            desired_quote_price(&at, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, None),
            100.01
        );

        let below = book(&[(100.0, 0.0999)], &[]); // notional 9.99
        assert_eq!(
            desired_quote_price(&below, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, None),
            102.0
        );
    }

    #[test]
    fn small_levels_are_skipped_to_deeper_qualifying_one() {
        // Dust at the top of the range, real size behind it
        let book = book(&[(101.9, 0.01), (101.0, 5.0)], &[]);
        let target =
            desired_quote_price(&book, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, None);
        assert_eq!(target, 101.01);
    }

    #[test]
    fn sell_side_beats_down_and_clamps_to_min() {
        let book1 = book(&[], &[(108.5, 1.0)]);
        let target =
            desired_quote_price(&book1, Side::Sell, &sell_range(), MIN_NOTIONAL, TICK, None);
        assert_eq!(target, 108.49);

        // Competitor at the range floor: one tick better would leave the range
        let book2 = book(&[], &[(108.0, 1.0)]);
        let target =
            desired_quote_price(&book2, Side::Sell, &sell_range(), MIN_NOTIONAL, TICK, None);
        assert_eq!(target, 108.0);
    }

    #[test]
    fn own_order_is_not_a_competitor() {
        // The whole 101.5 level is our own order; nothing to beat.
        let book = book(&[(101.5, 0.5)], &[]);
        let ours = own(Side::Buy, 101.5, 0.5);
        let target =
            desired_quote_price(&book, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, Some(&ours));
        assert_eq!(target, 102.0);
    }

    #[test]
    fn own_order_shares_level_with_real_competitor() {
        // 101.5 holds our 0.5 plus someone else's 0.4: 101.5 * 0.4 = 40.6
        // notional remains, so the level still qualifies.
        let book = book(&[(101.5, 0.9)], &[]);
        let ours = own(Side::Buy, 101.5, 0.5);
        let target =
            desired_quote_price(&book, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, Some(&ours));
        assert_eq!(target, 101.51);
    }

    #[test]
    fn stable_when_already_best() {
        // We quote 101.51 ahead of the 101.5 competitor; the recomputed target
        // stays 101.51, so the machine sees no reason to reposition.
        let book = book(&[(101.51, 0.5), (101.5, 2.0)], &[]);
        let ours = own(Side::Buy, 101.51, 0.5);
        let target =
            desired_quote_price(&book, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, Some(&ours));
        assert_eq!(target, 101.51);
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let book = book(&[(101.5, 1.0), (100.7, 3.0)], &[(108.2, 0.4)]);
        let a = desired_quote_price(&book, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, None);
        let b = desired_quote_price(&book, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, None);
        assert_eq!(a, b);
    }

    #[test]
    fn target_rounds_toward_range() {
        // Unaligned competitor: 101.333 + 0.01 = 101.343 floors to 101.34
        let book1 = book(&[(101.333, 5.0)], &[]);
        let target =
            desired_quote_price(&book1, Side::Buy, &buy_range(), MIN_NOTIONAL, TICK, None);
        assert_eq!(target, 101.34);

        // Sell mirrors upward: 108.337 - 0.01 = 108.327 ceils to 108.33
        let book2 = book(&[], &[(108.337, 5.0)]);
        let target =
            desired_quote_price(&book2, Side::Sell, &sell_range(), MIN_NOTIONAL, TICK, None);
        assert_eq!(target, 108.33);
    }

    #[test]
    fn unaligned_range_floor_stays_inside() {
        // Buy fallback is range.max, but when a competitor sits at an
        // unaligned range.min the floor rounding must not escape below it.
        let range = PriceRange::new(100.005, 102.0);
        let book = book(&[(100.005, 200.0)], &[]);
        let target = desired_quote_price(&book, Side::Buy, &range, MIN_NOTIONAL, TICK, None);
        assert!(range.contains(target), "target {} left {:?}", target, range);
    }
}
