//! Tick/step rounding helpers.
//!
//! Buy prices round down and sell prices round up, so a rounded price always
//! lands on the range side of the raw value, never past the opposing quote.

/// Round `price` down to a multiple of `tick`.
pub fn round_to_tick_down(price: f64, tick: f64) -> f64 {
    // The 1e-9 nudge keeps 101.51 / 0.01 = 10150.999... from flooring a tick low.
    let ticks = (price / tick + 1e-9).floor();
    normalize(ticks * tick)
}

/// Round `price` up to a multiple of `tick`.
pub fn round_to_tick_up(price: f64, tick: f64) -> f64 {
    let ticks = (price / tick - 1e-9).ceil();
    normalize(ticks * tick)
}

/// Round a quantity down to a multiple of the exchange step size.
pub fn round_down_to_step(qty: f64, step: f64) -> f64 {
    let steps = (qty / step + 1e-9).floor();
    normalize(steps * step)
}

/// Snap the binary-float product back onto a clean decimal so formatted wire
/// values never carry 0.0000000001-style tails.
fn normalize(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_down_to_tick() {
        assert_eq!(round_to_tick_down(101.519, 0.01), 101.51);
        assert_eq!(round_to_tick_down(101.51, 0.01), 101.51);
        assert_eq!(round_to_tick_down(102.0, 0.5), 102.0);
    }

    #[test]
    fn rounds_up_to_tick() {
        assert_eq!(round_to_tick_up(108.001, 0.01), 108.01);
        assert_eq!(round_to_tick_up(108.01, 0.01), 108.01);
        assert_eq!(round_to_tick_up(107.3, 0.5), 107.5);
    }

    #[test]
    fn aligned_values_pass_through() {
        // 0.29 is not exactly representable; the epsilon keeps it stable
        assert_eq!(round_to_tick_down(0.29, 0.01), 0.29);
        assert_eq!(round_to_tick_up(0.29, 0.01), 0.29);
    }

    #[test]
    fn quantity_steps_down() {
        assert_eq!(round_down_to_step(1.2345, 0.001), 1.234);
        assert_eq!(round_down_to_step(5.0, 1.0), 5.0);
    }
}
