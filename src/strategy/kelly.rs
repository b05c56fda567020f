//! Fractional-Kelly stake suggestion.
//!
//! Scales the Kelly-style ratio `edge / (odds - 1)` by the configured
//! fraction and a fixed reference bankroll, then clamps into the stake
//! bounds. The reference bankroll is a display scale only, not the user's
//! real balance.

/// Notional capital the suggestion is expressed against.
pub const REFERENCE_BANKROLL: f64 = 100.0;

/// Suggest a stake for a bet.
///
/// Returns exactly `0.0` when `odds <= 1` or `edge <= 0`, without applying
/// the bounds. Otherwise:
///
/// ```text
/// base  = kelly_fraction * (edge / (odds - 1)) * REFERENCE_BANKROLL
/// stake = clamp(round_2dp(base), stake_min, stake_max)
/// ```
///
/// If `stake_min > stake_max` the upper bound wins.
///
/// # Examples
/// ```
/// use stakeboard::strategy::kelly::suggest_stake;
/// assert_eq!(suggest_stake(0.5, 2.0, 0.1, 0.0, 100.0), 5.0);
/// assert_eq!(suggest_stake(1.0, 1.0, 0.5, 1.0, 100.0), 0.0);
/// ```
pub fn suggest_stake(
    kelly_fraction: f64,
    odds: f64,
    edge: f64,
    stake_min: f64,
    stake_max: f64,
) -> f64 {
    if odds <= 1.0 || edge <= 0.0 {
        return 0.0;
    }

    let base = kelly_fraction * (edge / (odds - 1.0)) * REFERENCE_BANKROLL;

    // f64::clamp panics on inverted bounds; the remote owns these values.
    round_cents(base).max(stake_min).min(stake_max)
}

/// Round to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
