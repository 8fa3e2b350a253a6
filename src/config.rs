// =============================================================================
// Analytics Configuration — indicator parameters read from JSON
// =============================================================================
//
// Every tunable parameter of the batch runner lives here.  All fields carry
// `#[serde(default)]` so that adding new fields never breaks loading an older
// config file.  A loaded file is validated against the engines' parameter
// domains before it is handed to the runner.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::ewma::resolve_alpha;
use crate::indicators::rsi::RsiThresholds;
use crate::types::{DiffOrder, EwmaMode, RollingBound, WindowSpec};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_rsi_period() -> usize {
    14
}

fn default_rsi_buy_level() -> f64 {
    40.0
}

fn default_rsi_sell_level() -> f64 {
    70.0
}

fn default_bollinger_period() -> usize {
    20
}

fn default_bollinger_num_std() -> f64 {
    2.0
}

// =============================================================================
// AnalyticsConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    // --- EWMA ----------------------------------------------------------------

    /// Decay parameterisation, e.g. `{"kind": "span", "value": 20}`.
    #[serde(default)]
    pub ewma_window: WindowSpec,

    /// Warm-up length; the first `ewma_min_n - 1` outputs are masked.
    #[serde(default)]
    pub ewma_min_n: usize,

    /// `false` => bias-corrected finite mode, `true` => steady-state mode.
    #[serde(default)]
    pub ewma_infinite: bool,

    // --- RSI -----------------------------------------------------------------

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Upward crossing of this level is a buy signal.
    #[serde(default = "default_rsi_buy_level")]
    pub rsi_buy_level: f64,

    /// Downward crossing of this level is a sell signal.
    #[serde(default = "default_rsi_sell_level")]
    pub rsi_sell_level: f64,

    // --- Bands, derivatives, rolling ----------------------------------------

    #[serde(default = "default_bollinger_period")]
    pub bollinger_period: usize,

    #[serde(default = "default_bollinger_num_std")]
    pub bollinger_num_std: f64,

    #[serde(default)]
    pub diff_order: DiffOrder,

    /// `full` covers the final index, `truncated` leaves it NaN.
    #[serde(default)]
    pub rolling_bound: RollingBound,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            ewma_window: WindowSpec::default(),
            ewma_min_n: 0,
            ewma_infinite: false,
            rsi_period: default_rsi_period(),
            rsi_buy_level: default_rsi_buy_level(),
            rsi_sell_level: default_rsi_sell_level(),
            bollinger_period: default_bollinger_period(),
            bollinger_num_std: default_bollinger_num_std(),
            diff_order: DiffOrder::default(),
            rolling_bound: RollingBound::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration from a JSON file at `path` and validate it.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analytics config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse analytics config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("invalid analytics config in {}", path.display()))?;

        info!(
            path = %path.display(),
            ewma_window = %config.ewma_window,
            rsi_period = config.rsi_period,
            bollinger_period = config.bollinger_period,
            "analytics config loaded"
        );

        Ok(config)
    }

    /// Check every parameter against the engines' domains so a bad config is
    /// rejected before any series is processed.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AnalyticsError;

        resolve_alpha(self.ewma_window)?;
        if self.rsi_period == 0 {
            return Err(AnalyticsError::invalid("rsi_period", 0.0, "period >= 1"));
        }
        if self.bollinger_period == 0 {
            return Err(AnalyticsError::invalid("bollinger_period", 0.0, "period >= 1"));
        }
        if !(self.bollinger_num_std.is_finite() && self.bollinger_num_std >= 0.0) {
            return Err(AnalyticsError::invalid(
                "bollinger_num_std",
                self.bollinger_num_std,
                "finite and >= 0",
            ));
        }
        self.rsi_thresholds()?;
        Ok(())
    }

    pub fn ewma_mode(&self) -> EwmaMode {
        EwmaMode::from(self.ewma_infinite)
    }

    pub fn rsi_thresholds(&self) -> crate::error::Result<RsiThresholds> {
        RsiThresholds::new(self.rsi_buy_level, self.rsi_sell_level)
    }
}
