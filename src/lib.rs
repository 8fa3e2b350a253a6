// =============================================================================
// Aurora Analytics — technical analysis over numeric time series
// =============================================================================
//
// EWMA (span / centre-of-mass / alpha), Wilder RSI, rolling mean and standard
// deviation, Bollinger bands and finite-difference derivatives.  The engines
// consume plain `f64` slices (NaN marks a missing value) and return new
// full-length vectors; they hold no state between calls.
// =============================================================================

pub mod config;
pub mod error;
pub mod indicators;
pub mod report;
pub mod types;

pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, Result};
pub use indicators::bollinger::{bollinger, bollinger_with};
pub use indicators::diff::{diff, diff_by_name};
pub use indicators::ewma::{ewma, resolve_alpha};
pub use indicators::rolling::{rolling, rolling_by_name, rolling_mean, rolling_std};
pub use indicators::rsi::{price_changes, rsi, rsi_signals, PriceChanges, RsiThresholds, RsiZone};
pub use types::{BandPair, DiffOrder, EwmaMode, RollingBound, RollingKind, WindowSpec};
