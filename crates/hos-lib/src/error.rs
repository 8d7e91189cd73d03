//! Error types for trip planning
//!
//! Fatal planning errors are a closed enum surfaced to the caller. Stop
//! location failures have their own type because the planner always
//! recovers from them.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Fatal errors returned by the planner and the trip scheduler
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulerError {
    /// The driver has no legal driving time left in the current cycle
    #[error("insufficient cycle hours: {used:.2}h already used of {max:.2}h")]
    InsufficientCycleHours { used: f64, max: f64 },

    /// Distance, cycle hours or coordinates are unusable
    #[error("invalid trip input: {0}")]
    InvalidTripInput(String),

    /// HOS limits or schedule options are inconsistent
    #[error("invalid limits: {0}")]
    InvalidLimits(String),
}

impl SchedulerError {
    /// Stable machine-readable kind for API responses
    pub fn kind(&self) -> &'static str {
        match self {
            SchedulerError::InsufficientCycleHours { .. } => "insufficient_cycle_hours",
            SchedulerError::InvalidTripInput(_) => "invalid_trip_input",
            SchedulerError::InvalidLimits(_) => "invalid_limits",
        }
    }

    /// Convert into the structured `{ kind, message }` failure body
    pub fn to_failure(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind().to_string(),
            message: self.to_string(),
        }
    }
}

/// Structured failure returned on fatal errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

/// Failure of the external location lookup collaborator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("no location found")]
    NotFound,

    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("lookup backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
