// =============================================================================
// Rolling Window Statistics — mean and population standard deviation
// =============================================================================
//
// out[i] is the statistic of the *previous* n values, series[i-n .. i].  The
// first n outputs have no complete history and are NaN.
//
// A sliding accumulator keeps Σd and Σd² where d = x - shift.  `shift` is
// the mean of the window the sums were last rebuilt from, so d stays small
// and  Σd²/n - (Σd/n)²  keeps its precision.  When the series drifts away
// from that centre, M2 = Σd² - (Σd)²/n collapses to a tiny fraction of Σd²
// and the sums are rebuilt around the current window.  They are also rebuilt
// every RESYNC_EVERY steps so rounding error cannot accumulate without bound.
//
// Any non-finite value inside a window makes that window's statistic NaN.

use tracing::trace;

use crate::error::{AnalyticsError, Result};
use crate::types::{RollingBound, RollingKind};

const RESYNC_EVERY: usize = 1024;

/// Rebuild once M2 holds fewer than ~6 significant digits of Σd².
const PRECISION_FLOOR: f64 = 1e-6;

/// Rolling `kind` statistic over windows of length `n`.
///
/// # Errors
/// - `n == 0` => `InvalidParameter`
/// - `n > series.len()` => `InsufficientHistory`
pub fn rolling(series: &[f64], n: usize, kind: RollingKind, bound: RollingBound) -> Result<Vec<f64>> {
    if n == 0 {
        return Err(AnalyticsError::invalid("n", 0.0, "window length >= 1"));
    }
    if n > series.len() {
        trace!(len = series.len(), n, "rolling: window longer than series");
    }
    AnalyticsError::ensure_history(n, series.len())?;

    let len = series.len();
    let end = match bound {
        RollingBound::Full => len,
        RollingBound::Truncated => len - 1,
    };

    let mut out = vec![f64::NAN; len];
    let mut acc = WindowAccumulator::new(n);
    acc.rebuild(&series[..n]);

    for i in n..end {
        let window = &series[i - n..i];
        if (i - n) % RESYNC_EVERY == RESYNC_EVERY - 1 || acc.lost_precision() {
            acc.rebuild(window);
        }
        out[i] = match kind {
            RollingKind::Mean => acc.mean(),
            RollingKind::Std => acc.std(),
        };
        acc.push(series[i]);
        acc.pop(series[i - n]);
    }

    Ok(out)
}

/// Rolling mean with the full bound.
pub fn rolling_mean(series: &[f64], n: usize) -> Result<Vec<f64>> {
    rolling(series, n, RollingKind::Mean, RollingBound::Full)
}

/// Rolling population standard deviation with the full bound.
pub fn rolling_std(series: &[f64], n: usize) -> Result<Vec<f64>> {
    rolling(series, n, RollingKind::Std, RollingBound::Full)
}

/// String-keyed variant: `kind` must be "mean" or "std".
pub fn rolling_by_name(series: &[f64], n: usize, kind: &str) -> Result<Vec<f64>> {
    let kind = kind.parse::<RollingKind>()?;
    rolling(series, n, kind, RollingBound::Full)
}

// =============================================================================
// Internal helpers
// =============================================================================

struct WindowAccumulator {
    shift: f64,
    n: f64,
    sum: f64,
    sum_sq: f64,
    non_finite: usize,
}

impl WindowAccumulator {
    fn new(n: usize) -> Self {
        Self {
            shift: 0.0,
            n: n as f64,
            sum: 0.0,
            sum_sq: 0.0,
            non_finite: 0,
        }
    }

    /// Re-centre on the finite mean of `window` and recompute the sums.
    fn rebuild(&mut self, window: &[f64]) {
        let (total, count) = window
            .iter()
            .filter(|x| x.is_finite())
            .fold((0.0_f64, 0usize), |(t, c), &x| (t + x, c + 1));
        if count > 0 {
            self.shift = total / count as f64;
        }
        self.sum = 0.0;
        self.sum_sq = 0.0;
        self.non_finite = 0;
        for &x in window {
            self.push(x);
        }
    }

    fn push(&mut self, x: f64) {
        if x.is_finite() {
            let d = x - self.shift;
            self.sum += d;
            self.sum_sq += d * d;
        } else {
            self.non_finite += 1;
        }
    }

    fn pop(&mut self, x: f64) {
        if x.is_finite() {
            let d = x - self.shift;
            self.sum -= d;
            self.sum_sq -= d * d;
        } else {
            self.non_finite -= 1;
        }
    }

    fn lost_precision(&self) -> bool {
        // Σd² at rounding-noise level around the centre is not drift.
        if self.sum_sq <= self.n * self.shift * self.shift * f64::EPSILON {
            return false;
        }
        let m2 = self.sum_sq - self.sum * self.sum / self.n;
        m2 < self.sum_sq * PRECISION_FLOOR
    }

    fn mean(&self) -> f64 {
        if self.non_finite > 0 {
            return f64::NAN;
        }
        self.shift + self.sum / self.n
    }

    fn std(&self) -> f64 {
        if self.non_finite > 0 {
            return f64::NAN;
        }
        let m = self.sum / self.n;
        // Rounding can push a flat window's variance just below zero.
        (self.sum_sq / self.n - m * m).max(0.0).sqrt()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn naive_mean(w: &[f64]) -> f64 {
        w.iter().sum::<f64>() / w.len() as f64
    }

    fn naive_std(w: &[f64]) -> f64 {
        let m = naive_mean(w);
        (w.iter().map(|x| (x - m).powi(2)).sum::<f64>() / w.len() as f64).sqrt()
    }

    fn wavy(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1).collect()
    }

    #[test]
    fn mean_uses_previous_window() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 2).unwrap();
        assert_eq!(out.len(), 5);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!((out[2] - 1.5).abs() < 1e-12);
        assert!((out[3] - 2.5).abs() < 1e-12);
        assert!((out[4] - 3.5).abs() < 1e-12);
    }

    #[test]
    fn truncated_bound_leaves_last_index_nan() {
        let out = rolling(&[1.0, 2.0, 3.0, 4.0, 5.0], 2, RollingKind::Mean, RollingBound::Truncated).unwrap();
        assert!((out[3] - 2.5).abs() < 1e-12);
        assert!(out[4].is_nan());
    }

    #[test]
    fn matches_naive_statistics() {
        let series = wavy(3000);
        let n = 20;
        let means = rolling_mean(&series, n).unwrap();
        let stds = rolling_std(&series, n).unwrap();
        for i in n..series.len() {
            let w = &series[i - n..i];
            assert!((means[i] - naive_mean(w)).abs() < 1e-9, "mean at {i}");
            assert!((stds[i] - naive_std(w)).abs() < 1e-7, "std at {i}");
        }
    }

    #[test]
    fn std_follows_a_series_far_from_its_first_value() {
        let mut series = vec![1.0];
        series.extend((1..400).map(|i| 1e8 + (i as f64 * 0.9).sin()));
        let n = 20;
        let means = rolling_mean(&series, n).unwrap();
        let stds = rolling_std(&series, n).unwrap();
        for i in n..series.len() {
            let w = &series[i - n..i];
            let (m, s) = (naive_mean(w), naive_std(w));
            assert!((means[i] - m).abs() < 1e-6, "mean at {i}: got {}, expected {m}", means[i]);
            assert!((stds[i] - s).abs() < 1e-6 * s.max(1.0), "std at {i}: got {}, expected {s}", stds[i]);
        }
    }

    #[test]
    fn std_tracks_a_steady_trend() {
        // 1 -> ~1e9 geometric growth with a small wiggle on top.
        let series: Vec<f64> = (0..2000)
            .map(|i| 1.0105_f64.powi(i) + (i as f64).cos() * 0.5)
            .collect();
        let n = 30;
        let stds = rolling_std(&series, n).unwrap();
        for i in n..series.len() {
            let s = naive_std(&series[i - n..i]);
            assert!((stds[i] - s).abs() < 1e-6 * s.max(1.0), "std at {i}: got {}, expected {s}", stds[i]);
        }
    }

    #[test]
    fn flat_window_has_zero_std() {
        let out = rolling_std(&[50_000.0; 40], 10).unwrap();
        for &v in &out[10..] {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn nan_poisons_only_windows_that_contain_it() {
        let series = [1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0, 7.0];
        let out = rolling_mean(&series, 2).unwrap();
        // outputs 3 and 4 cover index 2
        assert!((out[2] - 1.5).abs() < 1e-12);
        assert!(out[3].is_nan());
        assert!(out[4].is_nan());
        assert!((out[5] - 4.5).abs() < 1e-12);
        assert!((out[6] - 5.5).abs() < 1e-12);
    }

    #[test]
    fn window_equal_to_length_is_all_nan() {
        let out = rolling_mean(&[1.0, 2.0, 3.0], 3).unwrap();
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn window_longer_than_series_is_rejected() {
        assert_eq!(
            rolling_mean(&[1.0, 2.0], 3),
            Err(AnalyticsError::InsufficientHistory {
                required: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn zero_window_is_configuration_error() {
        assert!(rolling_mean(&[1.0, 2.0], 0).unwrap_err().is_configuration());
    }

    #[test]
    fn unknown_kind_by_name() {
        assert_eq!(
            rolling_by_name(&[1.0, 2.0, 3.0], 2, "median"),
            Err(AnalyticsError::UnknownRollingKind("median".into()))
        );
        assert!(rolling_by_name(&[1.0, 2.0, 3.0], 2, "std").is_ok());
    }
}
