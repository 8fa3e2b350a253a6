// =============================================================================
// Error taxonomy for the analytics engines
// =============================================================================
//
// Configuration errors are raised before any computation begins, so a caller
// never receives partial output.  Division by a zero average inside RSI is not
// an error: it is resolved locally to an extreme-but-defined value.

use thiserror::Error;

/// Result alias used by every engine in this crate.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// A `WindowSpec` kind other than `span`, `com` or `alpha`.
    #[error("unrecognised window kind '{0}' (expected span, com or alpha)")]
    UnknownWindowKind(String),

    /// A derivative order other than `1st` or `2nd`.
    #[error("unsupported derivative order '{0}' (expected 1st or 2nd)")]
    UnsupportedOrder(String),

    /// A rolling statistic other than `mean` or `std`.
    #[error("unrecognised rolling kind '{0}' (expected mean or std)")]
    UnknownRollingKind(String),

    /// A numeric parameter outside its valid domain.
    #[error("invalid parameter '{name}': {value} (expected {expected})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// The series is shorter than the requested window or warm-up.
    #[error("insufficient history: need {required} points, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// Two series that must be aligned by index have different lengths.
    #[error("series length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl AnalyticsError {
    /// True for the fail-fast configuration family (bad kinds, orders or
    /// parameter values).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownWindowKind(_)
                | Self::UnsupportedOrder(_)
                | Self::UnknownRollingKind(_)
                | Self::InvalidParameter { .. }
        )
    }

    pub(crate) fn invalid(name: &'static str, value: f64, expected: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            expected,
        }
    }

    /// Checks that a series holds at least `required` points.
    pub(crate) fn ensure_history(required: usize, actual: usize) -> Result<()> {
        if actual < required {
            Err(Self::InsufficientHistory { required, actual })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_family() {
        assert!(AnalyticsError::UnknownWindowKind("bogus".into()).is_configuration());
        assert!(AnalyticsError::UnsupportedOrder("3rd".into()).is_configuration());
        assert!(AnalyticsError::invalid("span", 0.5, ">= 1").is_configuration());
        assert!(!AnalyticsError::InsufficientHistory {
            required: 5,
            actual: 2
        }
        .is_configuration());
    }

    #[test]
    fn ensure_history_bounds() {
        assert!(AnalyticsError::ensure_history(3, 3).is_ok());
        assert_eq!(
            AnalyticsError::ensure_history(4, 3),
            Err(AnalyticsError::InsufficientHistory {
                required: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn messages_name_the_offending_value() {
        let msg = AnalyticsError::UnknownWindowKind("bogus".into()).to_string();
        assert!(msg.contains("bogus"));
    }
}
