//! Integer percentage arithmetic shared by every builder
//!
//! All ratios are rounded half-up (toward positive infinity) using exact
//! integer arithmetic, so `2.5 -> 3` and `-2.5 -> -2`. No floating point is
//! involved, which keeps results identical across platforms.

/// `100 * numerator / denominator`, rounded half-up. `denominator` must be positive.
fn rounded_percent(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator > 0);
    (200 * numerator + denominator).div_euclid(2 * denominator)
}

/// Share of `part` in `whole` as a percentage in `[0, 100]`.
///
/// Returns 0 when `whole` is 0. A `part` larger than `whole` (inconsistent
/// upstream counts) is clamped to 100.
pub fn share_percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    let pct = rounded_percent(i128::from(part), i128::from(whole));
    pct.clamp(0, 100) as u32
}

/// Relative change from `previous` to `current` in percent, rounded half-up.
///
/// Returns `None` when `previous` is 0; the caller decides the sentinel.
pub fn change_percent(current: u64, previous: u64) -> Option<i64> {
    if previous == 0 {
        return None;
    }
    let delta = i128::from(current) - i128::from(previous);
    let pct = rounded_percent(delta, i128::from(previous));
    // |pct| <= 100 * u64::MAX, saturate rather than wrap
    Some(pct.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
}
