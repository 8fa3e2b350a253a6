// =============================================================================
// Series Reports — run every engine over a named series, in parallel batches
// =============================================================================
//
// Input rows carry an optional timestamp axis supplied by the caller; it is
// passed through untouched.  JSON `null` values become NaN (the missing-value
// sentinel) and NaN outputs serialise back to `null`.
//
// Series are independent, so a batch fans out across the rayon pool.  A
// failing series is recorded in `failures` and does not abort the batch.
// =============================================================================

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};
use crate::indicators::{bollinger, diff, ewma, rolling, rsi};
use crate::types::{BandPair, RollingKind};

// =============================================================================
// Input
// =============================================================================

/// One named series as read from the input file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesInput {
    pub name: String,
    #[serde(default)]
    pub timestamps: Option<Vec<DateTime<Utc>>>,
    /// When absent, RSI compares each close against the previous close.
    #[serde(default)]
    pub open: Option<Vec<Option<f64>>>,
    pub close: Vec<Option<f64>>,
}

impl SeriesInput {
    pub fn close_values(&self) -> Vec<f64> {
        to_values(&self.close)
    }

    /// Open prices, or the previous close when no opens were supplied (the
    /// first bar opens at its own close).
    pub fn open_values(&self) -> Vec<f64> {
        match &self.open {
            Some(open) => to_values(open),
            None => {
                let close = self.close_values();
                let mut open = Vec::with_capacity(close.len());
                if let Some(&first) = close.first() {
                    open.push(first);
                    open.extend_from_slice(&close[..close.len() - 1]);
                }
                open
            }
        }
    }
}

fn to_values(raw: &[Option<f64>]) -> Vec<f64> {
    raw.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}

/// Read a JSON array of [`SeriesInput`] from `path`.
pub fn load_inputs(path: impl AsRef<Path>) -> anyhow::Result<Vec<SeriesInput>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read series input from {}", path.display()))?;
    let inputs: Vec<SeriesInput> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse series input from {}", path.display()))?;
    info!(path = %path.display(), series = inputs.len(), "series input loaded");
    Ok(inputs)
}

// =============================================================================
// Output
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SeriesReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<Vec<DateTime<Utc>>>,
    pub ewma: Vec<f64>,
    pub rsi: Vec<f64>,
    /// Zone of the most recent RSI reading.
    pub rsi_zone: Option<rsi::RsiZone>,
    pub rsi_signals: Vec<rsi::RsiCrossing>,
    pub rolling_mean: Vec<f64>,
    pub rolling_std: Vec<f64>,
    pub bollinger: BandPair,
    pub derivative: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesFailure {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub reports: Vec<SeriesReport>,
    pub failures: Vec<SeriesFailure>,
}

// =============================================================================
// Analysis
// =============================================================================

/// Run every engine over one series with the parameters in `config`.
pub fn analyse(input: &SeriesInput, config: &AnalyticsConfig) -> Result<SeriesReport> {
    config.validate()?;

    let close = input.close_values();
    if let Some(ts) = &input.timestamps {
        if ts.len() != close.len() {
            return Err(AnalyticsError::LengthMismatch {
                expected: close.len(),
                actual: ts.len(),
            });
        }
    }
    let open = input.open_values();

    let ewma = ewma::ewma(&close, config.ewma_window, config.ewma_min_n, config.ewma_mode())?;

    let rsi_series = rsi::rsi(&open, &close, config.rsi_period)?;
    let rsi_zone = rsi_series.last().and_then(|&v| rsi::RsiZone::classify(v));
    let rsi_signals = rsi::rsi_signals(&rsi_series, config.rsi_thresholds()?);

    let n = config.bollinger_period;
    let rolling_mean = rolling::rolling(&close, n, RollingKind::Mean, config.rolling_bound)?;
    let rolling_std = rolling::rolling(&close, n, RollingKind::Std, config.rolling_bound)?;
    let bands = bollinger::bollinger_with(&close, n, config.bollinger_num_std, config.rolling_bound)?;

    let derivative = diff::diff(&close, config.diff_order)?;

    Ok(SeriesReport {
        name: input.name.clone(),
        timestamps: input.timestamps.clone(),
        ewma,
        rsi: rsi_series,
        rsi_zone,
        rsi_signals,
        rolling_mean,
        rolling_std,
        bollinger: bands,
        derivative,
    })
}

/// Analyse every input in parallel, keeping input order.
pub fn analyse_batch(inputs: &[SeriesInput], config: &AnalyticsConfig) -> BatchReport {
    let results: Vec<(&str, Result<SeriesReport>)> = inputs
        .par_iter()
        .map(|input| (input.name.as_str(), analyse(input, config)))
        .collect();

    let mut reports = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (name, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!(series = %name, error = %e, "series skipped");
                failures.push(SeriesFailure {
                    name: name.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(ok = reports.len(), failed = failures.len(), "batch analysed");
    BatchReport {
        generated_at: Utc::now(),
        reports,
        failures,
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, close: Vec<f64>) -> SeriesInput {
        SeriesInput {
            name: name.to_string(),
            timestamps: None,
            open: None,
            close: close.into_iter().map(Some).collect(),
        }
    }

    fn wavy(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.3).sin() * 4.0).collect()
    }

    #[test]
    fn open_defaults_to_previous_close() {
        let s = input("x", vec![1.0, 3.0, 2.0]);
        assert_eq!(s.open_values(), vec![1.0, 1.0, 3.0]);
        assert!(input("empty", vec![]).open_values().is_empty());
    }

    #[test]
    fn nulls_become_nan() {
        let s: SeriesInput = serde_json::from_str(r#"{"name":"x","close":[1.0,null,3.0]}"#).unwrap();
        let close = s.close_values();
        assert_eq!(close[0], 1.0);
        assert!(close[1].is_nan());
    }

    #[test]
    fn report_series_have_input_length() {
        let report = analyse(&input("BTC", wavy(80)), &AnalyticsConfig::default()).unwrap();
        for series in [
            &report.ewma,
            &report.rsi,
            &report.rolling_mean,
            &report.rolling_std,
            &report.bollinger.upper,
            &report.bollinger.lower,
            &report.derivative,
        ] {
            assert_eq!(series.len(), 80);
        }
        assert!(report.rsi_zone.is_some());
    }

    #[test]
    fn timestamps_must_align() {
        let mut s = input("x", wavy(30));
        s.timestamps = Some(vec![Utc::now(); 29]);
        assert!(matches!(
            analyse(&s, &AnalyticsConfig::default()),
            Err(AnalyticsError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn batch_keeps_order_and_collects_failures() {
        let inputs = vec![input("a", wavy(50)), input("short", wavy(5)), input("b", wavy(60))];
        let batch = analyse_batch(&inputs, &AnalyticsConfig::default());
        assert_eq!(
            batch.reports.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].name, "short");
        assert!(batch.failures[0].error.contains("insufficient history"));
    }

    #[test]
    fn nan_serialises_as_null() {
        let report = analyse(&input("x", wavy(40)), &AnalyticsConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["rsi"][0].is_null());
        assert!(json["rolling_mean"][0].is_null());
        assert!(json["ewma"][0].is_number());
    }
}
