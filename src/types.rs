// =============================================================================
// Shared parameter and result types used across the analytics engines
// =============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::indicators::ewma::resolve_alpha;

/// Decay parameterisation for the EWMA engine.  Exactly one form is active.
///
/// Serialised as `{"kind": "span", "value": 20.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum WindowSpec {
    /// α = 2 / (span + 1), span ≥ 1.
    Span(f64),
    /// α = 1 / (com + 1), com ≥ 0.
    Com(f64),
    /// α given directly, 0 < α ≤ 1.
    Alpha(f64),
}

impl WindowSpec {
    /// Build a window from a loosely-typed `(kind, value)` pair, validating both
    /// the kind and the value range.
    pub fn from_parts(kind: &str, value: f64) -> Result<Self> {
        let spec = match kind {
            "span" => Self::Span(value),
            "com" => Self::Com(value),
            "alpha" => Self::Alpha(value),
            other => return Err(AnalyticsError::UnknownWindowKind(other.to_string())),
        };
        resolve_alpha(spec)?;
        Ok(spec)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Span(_) => "span",
            Self::Com(_) => "com",
            Self::Alpha(_) => "alpha",
        }
    }

    pub fn value(&self) -> f64 {
        match *self {
            Self::Span(v) | Self::Com(v) | Self::Alpha(v) => v,
        }
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self::Span(20.0)
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind(), self.value())
    }
}

/// Which EWMA recurrence to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EwmaMode {
    /// Bias-corrected average normalised by the accumulated decay weights.
    #[default]
    Finite,
    /// Steady-state recurrence `y[t] = α·x[t] + (1-α)·y[t-1]`.
    Infinite,
}

impl From<bool> for EwmaMode {
    fn from(infinite: bool) -> Self {
        if infinite {
            Self::Infinite
        } else {
            Self::Finite
        }
    }
}

/// Order of the finite-difference derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiffOrder {
    #[default]
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
}

impl FromStr for DiffOrder {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1st" => Ok(Self::First),
            "2nd" => Ok(Self::Second),
            other => Err(AnalyticsError::UnsupportedOrder(other.to_string())),
        }
    }
}

impl fmt::Display for DiffOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "1st"),
            Self::Second => write!(f, "2nd"),
        }
    }
}

/// Statistic computed over a rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollingKind {
    Mean,
    /// Population standard deviation.
    Std,
}

impl FromStr for RollingKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(Self::Mean),
            "std" => Ok(Self::Std),
            other => Err(AnalyticsError::UnknownRollingKind(other.to_string())),
        }
    }
}

impl fmt::Display for RollingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mean => write!(f, "mean"),
            Self::Std => write!(f, "std"),
        }
    }
}

/// Last index covered by the rolling engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollingBound {
    /// Every index `i >= n` receives a statistic, including the final one.
    #[default]
    Full,
    /// Stops one short of the end; the final index is left as NaN.
    Truncated,
}

/// Upper and lower Bollinger envelopes, each the length of the input series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPair {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BandPair {
    pub fn len(&self) -> usize {
        self.upper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upper.is_empty()
    }
}
