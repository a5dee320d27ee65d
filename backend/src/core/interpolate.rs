//! Piecewise-linear lookup over breakpoints
//!
//! Every curve in the pricing and simulation engines (occupancy → multiplier,
//! hours-before-event → multiplier, target occupancy by hour) is a list of
//! `(input, output)` pairs evaluated through [`interpolate`].

/// Neutral multiplier returned for an empty breakpoint set
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

/// Evaluate `value` against a set of `(input, output)` breakpoints.
///
/// Breakpoints may arrive in any order; they are sorted by input first.
/// Values at or below the smallest input clamp to its output, values at or
/// above the largest input clamp to its output, anything in between is
/// linearly interpolated between the two bracketing breakpoints.
///
/// # Example
/// ```
/// use garage_pricing_core::core::interpolate::interpolate;
///
/// let curve = [(1.0, 4.0), (0.0, 1.0)];
/// assert_eq!(interpolate(0.5, &curve), 2.5);
/// assert_eq!(interpolate(-3.0, &curve), 1.0);
/// assert_eq!(interpolate(9.0, &curve), 4.0);
/// assert_eq!(interpolate(0.5, &[]), 1.0);
/// ```
pub fn interpolate(value: f64, breakpoints: &[(f64, f64)]) -> f64 {
    if breakpoints.is_empty() {
        return NEUTRAL_MULTIPLIER;
    }

    let mut sorted = breakpoints.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
    interpolate_sorted(value, &sorted)
}

/// Same as [`interpolate`] for breakpoints already sorted ascending by input.
pub fn interpolate_sorted(value: f64, sorted: &[(f64, f64)]) -> f64 {
    let (first, last) = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return NEUTRAL_MULTIPLIER,
    };

    if value <= first.0 {
        return first.1;
    }
    if value >= last.0 {
        return last.1;
    }

    for pair in sorted.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if value == x1 {
            return y1;
        }
        if x0 <= value && value < x1 {
            let t = (value - x0) / (x1 - x0);
            return y0 + t * (y1 - y0);
        }
    }

    last.1
}

/// Round to a fixed number of decimal places for display
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
