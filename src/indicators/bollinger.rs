// =============================================================================
// Bollinger Bands
// =============================================================================
//
// An envelope of k standard deviations around the rolling mean:
//
//   upper = mean_n + k·σ_n
//   lower = mean_n - k·σ_n
//
// with k = 2 by default.  Both bands share the rolling engine's warm-up, so
// the first n values of each band are NaN.

use crate::error::{AnalyticsError, Result};
use crate::indicators::rolling::rolling;
use crate::types::{BandPair, RollingBound, RollingKind};

/// Default band half-width in standard deviations.
pub const DEFAULT_NUM_STD: f64 = 2.0;

/// Bollinger bands of `series` over window `n` at ±2σ.
pub fn bollinger(series: &[f64], n: usize) -> Result<BandPair> {
    bollinger_with(series, n, DEFAULT_NUM_STD, RollingBound::Full)
}

/// Bollinger bands with an explicit multiplier and rolling bound.
pub fn bollinger_with(series: &[f64], n: usize, num_std: f64, bound: RollingBound) -> Result<BandPair> {
    if !(num_std.is_finite() && num_std >= 0.0) {
        return Err(AnalyticsError::invalid("num_std", num_std, "finite and >= 0"));
    }

    let mean = rolling(series, n, RollingKind::Mean, bound)?;
    let std = rolling(series, n, RollingKind::Std, bound)?;

    let (upper, lower) = mean
        .iter()
        .zip(&std)
        .map(|(&m, &s)| (m + num_std * s, m - num_std * s))
        .unzip();

    Ok(BandPair { upper, lower })
}
