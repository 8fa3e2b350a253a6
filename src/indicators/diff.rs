// =============================================================================
// Finite-Difference Derivatives
// =============================================================================
//
// Numerical gradient with unit spacing and second-order accurate edges:
//
//   interior:  g_i     = (x_{i+1} - x_{i-1}) / 2
//   first:     g_0     = (-3·x_0 + 4·x_1 - x_2) / 2
//   last:      g_{n-1} = (3·x_{n-1} - 4·x_{n-2} + x_{n-3}) / 2
//
// The 2nd derivative is the gradient applied twice.  Three points are the
// minimum for the one-sided edge stencils.

use tracing::trace;

use crate::error::{AnalyticsError, Result};
use crate::types::DiffOrder;

/// Minimum series length for the second-order edge stencils.
pub const MIN_POINTS: usize = 3;

/// Compute the 1st or 2nd derivative of `series`.  Output length equals input
/// length.
pub fn diff(series: &[f64], order: DiffOrder) -> Result<Vec<f64>> {
    if series.len() < MIN_POINTS {
        trace!(len = series.len(), min = MIN_POINTS, "diff: insufficient data");
    }
    AnalyticsError::ensure_history(MIN_POINTS, series.len())?;

    let first = gradient(series);
    match order {
        DiffOrder::First => Ok(first),
        DiffOrder::Second => Ok(gradient(&first)),
    }
}

/// String-keyed variant: parses `order` ("1st" / "2nd") first, so an unknown
/// order is reported before the series is examined.
pub fn diff_by_name(series: &[f64], order: &str) -> Result<Vec<f64>> {
    let order = order.parse::<DiffOrder>()?;
    diff(series, order)
}

/// Caller guarantees `x.len() >= MIN_POINTS`.
fn gradient(x: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut out = Vec::with_capacity(n);

    out.push((-3.0 * x[0] + 4.0 * x[1] - x[2]) / 2.0);
    for w in x.windows(3) {
        out.push((w[2] - w[0]) / 2.0);
    }
    out.push((3.0 * x[n - 1] - 4.0 * x[n - 2] + x[n - 3]) / 2.0);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            assert!((x - y).abs() < 1e-10, "index {i}: got {x}, expected {y}");
        }
    }

    #[test]
    fn linear_series_has_constant_slope() {
        let series: Vec<f64> = (0..10).map(|i| 3.0 * i as f64 + 1.0).collect();
        assert_close(&diff(&series, DiffOrder::First).unwrap(), &[3.0; 10]);
        assert_close(&diff(&series, DiffOrder::Second).unwrap(), &[0.0; 10]);
    }

    #[test]
    fn quadratic_series_is_exact_at_edges() {
        // x_i = i^2 => dx/di = 2i everywhere (second-order stencils are exact).
        let series: Vec<f64> = (0..6).map(|i| (i * i) as f64).collect();
        let expected: Vec<f64> = (0..6).map(|i| 2.0 * i as f64).collect();
        assert_close(&diff(&series, DiffOrder::First).unwrap(), &expected);
        assert_close(&diff(&series, DiffOrder::Second).unwrap(), &[2.0; 6]);
    }

    #[test]
    fn known_gradient() {
        let out = diff(&[1.0, 2.0, 4.0, 7.0, 11.0], DiffOrder::First).unwrap();
        assert_close(&out, &[0.5, 1.5, 2.5, 3.5, 4.5]);
    }

    #[test]
    fn second_order_is_gradient_twice() {
        let series = [5.0, 3.0, 8.0, 1.0, 9.0, 2.0];
        let once = diff(&series, DiffOrder::First).unwrap();
        let twice = diff(&once, DiffOrder::First).unwrap();
        assert_close(&diff(&series, DiffOrder::Second).unwrap(), &twice);
    }

    #[test]
    fn too_short_is_rejected() {
        assert_eq!(
            diff(&[1.0, 2.0], DiffOrder::First),
            Err(AnalyticsError::InsufficientHistory {
                required: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn unknown_order_by_name() {
        let err = diff_by_name(&[], "3rd").unwrap_err();
        assert_eq!(err, AnalyticsError::UnsupportedOrder("3rd".into()));
        assert!(diff_by_name(&[1.0, 2.0, 3.0], "2nd").is_ok());
    }
}
