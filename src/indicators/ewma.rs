// =============================================================================
// Exponentially Weighted Moving Average (EWMA)
// =============================================================================
//
// Decay is given as a span, a centre of mass or α directly:
//
//   span:  α = 2 / (span + 1)      span ≥ 1
//   com:   α = 1 / (com + 1)       com  ≥ 0
//   alpha: α                       0 < α ≤ 1
//
// Finite mode (bias-corrected):
//   num_t = x_t + (1-α)·num_{t-1}
//   w_t   = 1 + (1-α) + (1-α)^2 + ... + (1-α)^t
//   y_t   = num_t / w_t
//
// Infinite mode (steady state):
//   y_0 = x_0
//   y_t = α·x_t + (1-α)·y_{t-1}
//
// With `min_n > 0` the first `min_n - 1` outputs are masked with NaN.
// =============================================================================

use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::types::{EwmaMode, WindowSpec};

/// Resolve the smoothing factor α for `window`, rejecting out-of-range values.
pub fn resolve_alpha(window: WindowSpec) -> Result<f64> {
    match window {
        WindowSpec::Span(span) => {
            if !(span.is_finite() && span >= 1.0) {
                return Err(AnalyticsError::invalid("span", span, "span >= 1"));
            }
            Ok(2.0 / (span + 1.0))
        }
        WindowSpec::Com(com) => {
            if !(com.is_finite() && com >= 0.0) {
                return Err(AnalyticsError::invalid("com", com, "com >= 0"));
            }
            Ok(1.0 / (com + 1.0))
        }
        WindowSpec::Alpha(alpha) => {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(AnalyticsError::invalid("alpha", alpha, "0 < alpha <= 1"));
            }
            Ok(alpha)
        }
    }
}

/// Compute the EWMA of `series`.
///
/// The output has the same length as the input.  Parameters are validated
/// before the input is read.
///
/// # Errors
/// - Out-of-range `window` value => `InvalidParameter`
/// - Empty input, or `min_n` longer than the series => `InsufficientHistory`
pub fn ewma(series: &[f64], window: WindowSpec, min_n: usize, mode: EwmaMode) -> Result<Vec<f64>> {
    let alpha = resolve_alpha(window)?;
    AnalyticsError::ensure_history(min_n.max(1), series.len())?;

    let decay = 1.0 - alpha;
    let mut out = Vec::with_capacity(series.len());

    match mode {
        EwmaMode::Finite => {
            let mut numerator = 0.0_f64;
            let mut weight = 0.0_f64;
            let mut decay_pow = 1.0_f64;
            for (i, &x) in series.iter().enumerate() {
                if i > 0 {
                    decay_pow *= decay;
                }
                // α = 1 leaves no memory; skip the product so a NaN does not
                // leak forward through 0·NaN.
                numerator = if decay == 0.0 { x } else { numerator * decay + x };
                weight += decay_pow;
                out.push(numerator / weight);
            }
        }
        EwmaMode::Infinite => {
            let mut prev = series[0];
            out.push(prev);
            for &x in &series[1..] {
                prev = alpha * x + decay * prev;
                out.push(prev);
            }
        }
    }

    if min_n > 1 {
        out[..min_n - 1].fill(f64::NAN);
    }

    debug!(%window, alpha, min_n, ?mode, len = series.len(), "ewma computed");
    Ok(out)
}
