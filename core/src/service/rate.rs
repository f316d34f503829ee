use serde::Serialize;

/// Integer percentage of `actual` against `target`. A zero target yields 0;
/// values above 100 are kept.
pub fn rate(actual: i64, target: i64) -> i64 {
    if target == 0 {
        return 0;
    }
    saturate(round_div_wide(actual as i128 * 100, target as i128))
}

/// A missing target rates like a zero one.
pub fn rate_against(actual: i64, target: Option<i64>) -> i64 {
    rate(actual, target.unwrap_or(0))
}

/// `num / den` rounded half toward positive infinity. `den` must be non-zero.
pub(crate) fn round_div(num: i64, den: i64) -> i64 {
    saturate(round_div_wide(num as i128, den as i128))
}

// Inputs stay well inside i128 when they come from i64 values (times 100 at most).
fn round_div_wide(num: i128, den: i128) -> i128 {
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    (2 * num + den).div_euclid(2 * den)
}

fn saturate(n: i128) -> i64 {
    n.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Width for a progress bar; the numeric rate itself is never clamped.
pub fn bar_percent(rate: i64) -> u16 {
    rate.clamp(0, 100) as u16
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTier {
    Achieved,
    OnTrack,
    Behind,
}

impl ProgressTier {
    pub fn from_rate(rate: i64) -> Self {
        if rate >= 100 {
            ProgressTier::Achieved
        } else if rate >= 70 {
            ProgressTier::OnTrack
        } else {
            ProgressTier::Behind
        }
    }
}
