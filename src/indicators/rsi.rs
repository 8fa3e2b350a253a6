// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing via EWMA
// =============================================================================
//
// Step 1 — delta = close - open, per bar.
// Step 2 — up   = delta where delta > 0, else 0
//          down = delta where delta < 0, else 0   (keeps its negative sign)
// Step 3 — Wilder's smoothing is an EWMA with centre of mass n - 1
//          (α = 1/n), steady-state recurrence, warm-up of n bars.
// Step 4 — RS  = |avg_up / avg_down|
//          RSI = 100 · (1 - 1 / (1 + RS))
//
// A zero down-average gives RS = +inf and therefore RSI = 100.  When both
// averages are zero there was no movement at all and RSI is the neutral 50.
//
// Signals:  crossing the buy level (40) going up   => Buy
//           crossing the sell level (70) going down => Sell
// =============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::indicators::ewma::ewma;
use crate::types::{EwmaMode, WindowSpec};

/// Per-bar gains and losses derived from open/close pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChanges {
    pub up: Vec<f64>,
    /// Non-positive values.
    pub down: Vec<f64>,
}

/// Split `close - open` into gains and (negative) losses.  A NaN delta stays
/// NaN on both sides.
pub fn price_changes(open: &[f64], close: &[f64]) -> Result<PriceChanges> {
    if open.len() != close.len() {
        return Err(AnalyticsError::LengthMismatch {
            expected: open.len(),
            actual: close.len(),
        });
    }

    let mut up = Vec::with_capacity(close.len());
    let mut down = Vec::with_capacity(close.len());
    for (&o, &c) in open.iter().zip(close) {
        let delta = c - o;
        if delta.is_nan() {
            up.push(f64::NAN);
            down.push(f64::NAN);
        } else {
            up.push(delta.max(0.0));
            down.push(delta.min(0.0));
        }
    }

    Ok(PriceChanges { up, down })
}

/// Compute the RSI series for aligned `open` / `close` series and period `n`.
///
/// The output has the input length; the first `n - 1` values are NaN.
///
/// A zero down-average reads as 100.  When both averages are exactly zero the
/// ratio would be 0/0; this returns the neutral 50 there instead of NaN, so a
/// flat stretch of prices stays defined.
///
/// # Errors
/// - `n == 0` => `InvalidParameter`
/// - `open.len() != close.len()` => `LengthMismatch`
/// - `n > close.len()` => `InsufficientHistory`
pub fn rsi(open: &[f64], close: &[f64], n: usize) -> Result<Vec<f64>> {
    if n == 0 {
        return Err(AnalyticsError::invalid("n", 0.0, "period >= 1"));
    }
    let changes = price_changes(open, close)?;
    AnalyticsError::ensure_history(n, close.len())?;

    let window = WindowSpec::Com((n - 1) as f64);
    let avg_up = ewma(&changes.up, window, n, EwmaMode::Infinite)?;
    let avg_down = ewma(&changes.down, window, n, EwmaMode::Infinite)?;

    let out: Vec<f64> = avg_up
        .iter()
        .zip(&avg_down)
        .map(|(&up, &down)| rsi_from_averages(up, down))
        .collect();

    debug!(n, len = out.len(), last = ?out.last(), "rsi computed");
    Ok(out)
}

/// Convert smoothed gain / loss averages into an RSI value in [0, 100].
fn rsi_from_averages(avg_up: f64, avg_down: f64) -> f64 {
    if avg_up.is_nan() || avg_down.is_nan() {
        return f64::NAN;
    }
    if avg_down == 0.0 {
        return if avg_up == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = (avg_up / avg_down).abs();
    100.0 * (1.0 - 1.0 / (1.0 + rs))
}

// =============================================================================
// Zones and crossing signals
// =============================================================================

/// Coarse label for a single RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    /// `>= 70` overbought, `<= 30` oversold.  NaN has no zone.
    pub fn classify(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else if value >= 70.0 {
            Some(Self::Overbought)
        } else if value <= 30.0 {
            Some(Self::Oversold)
        } else {
            Some(Self::Neutral)
        }
    }
}

impl fmt::Display for RsiZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overbought => write!(f, "OVERBOUGHT"),
            Self::Oversold => write!(f, "OVERSOLD"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Levels at which RSI crossings become signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiThresholds {
    pub buy: f64,
    pub sell: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            buy: 40.0,
            sell: 70.0,
        }
    }
}

impl RsiThresholds {
    pub fn new(buy: f64, sell: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&buy) {
            return Err(AnalyticsError::invalid("rsi_buy_level", buy, "0 <= level <= 100"));
        }
        if !(0.0..=100.0).contains(&sell) {
            return Err(AnalyticsError::invalid("rsi_sell_level", sell, "0 <= level <= 100"));
        }
        if buy >= sell {
            return Err(AnalyticsError::invalid("rsi_buy_level", buy, "buy level below sell level"));
        }
        Ok(Self { buy, sell })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiSignal {
    Buy,
    Sell,
}

/// A threshold crossing at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiCrossing {
    pub index: usize,
    pub signal: RsiSignal,
    pub value: f64,
}

/// Scan an RSI series for threshold crossings.  Pairs with a NaN on either
/// side are skipped.
pub fn rsi_signals(rsi: &[f64], thresholds: RsiThresholds) -> Vec<RsiCrossing> {
    let mut crossings = Vec::new();
    for (i, pair) in rsi.windows(2).enumerate() {
        let (prev, cur) = (pair[0], pair[1]);
        if prev.is_nan() || cur.is_nan() {
            continue;
        }
        let signal = if prev < thresholds.buy && cur >= thresholds.buy {
            RsiSignal::Buy
        } else if prev > thresholds.sell && cur <= thresholds.sell {
            RsiSignal::Sell
        } else {
            continue;
        };
        crossings.push(RsiCrossing {
            index: i + 1,
            signal,
            value: cur,
        });
    }
    crossings
}
