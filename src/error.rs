//! Configuration errors
//!
//! The simulation itself never fails: bad intents are ignored and degenerate
//! geometry is skipped. Only loading or validating [`crate::Tuning`] can error.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// JSON could not be parsed into a tuning table
    Parse(String),
    /// Lane count must be at least one
    ZeroLanes,
    /// A per-tick probability was outside [0, 1]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
    /// A speed or factor that must be strictly positive was not
    NonPositive { field: &'static str, value: f32 },
    /// A step, margin or distance below zero
    Negative { field: &'static str, value: f32 },
    /// NaN or infinity in a length or speed
    NotFinite { field: &'static str, value: f32 },
    /// A cap is smaller than the value it caps
    CapBelowBase {
        field: &'static str,
        base: f64,
        cap: f64,
    },
    /// Difficulty ramp interval of zero ticks
    ZeroRampInterval,
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid tuning json: {msg}"),
            Self::ZeroLanes => write!(f, "lane_count must be at least 1"),
            Self::ProbabilityOutOfRange { field, value } => {
                write!(f, "{field} must be within [0, 1], got {value}")
            }
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::NotFinite { field, value } => write!(f, "{field} must be finite, got {value}"),
            Self::CapBelowBase { field, base, cap } => {
                write!(f, "{field} cap {cap} is below its base value {base}")
            }
            Self::ZeroRampInterval => write!(f, "ramp_interval_ticks must be non-zero"),
        }
    }
}

impl std::error::Error for TuningError {}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
