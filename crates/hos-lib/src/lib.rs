//! Hours-of-Service compliance scheduling
//!
//! This crate provides the core functionality for:
//! - Planning fuel and rest stops along a trip under HOS limits
//! - Building one duty log per calendar day of the trip
//! - Health checks and observability for the scheduling service

pub mod daylog;
pub mod error;
pub mod health;
pub mod limits;
pub mod models;
pub mod observability;
pub mod planner;
pub mod scheduler;
pub mod timeutil;

pub use daylog::{DayLogBuilder, DayLogs};
pub use error::{ErrorBody, LookupError, SchedulerError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use limits::{DayLogMode, HosLimits, ScheduleOptions};
pub use models::*;
pub use observability::{SchedulerMetrics, StructuredLogger};
pub use planner::{BoundedLookup, LocationLookup, PassthroughLookup, RestStopPlanner};
pub use scheduler::{ScheduleOutcome, TripScheduler};
