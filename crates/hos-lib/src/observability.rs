//! Observability for the scheduler
//!
//! Provides:
//! - Prometheus metrics (planning latency, stops, day logs, fallbacks)
//! - Event-tagged structured logging with tracing

use crate::models::{CycleHalt, DayTotalMismatch, StopEvent, TripSchedule};
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Planning latency buckets in seconds
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

/// Registered once per process
static GLOBAL_METRICS: OnceLock<SchedulerMetricsInner> = OnceLock::new();

struct SchedulerMetricsInner {
    plan_latency_seconds: Histogram,
    trips_planned: IntCounter,
    planning_errors: IntCounterVec,
    fuel_stops: IntCounter,
    rest_stops: IntCounter,
    day_logs: IntCounter,
    day_total_mismatches: IntCounter,
    location_fallbacks: IntCounter,
    cycle_halts: IntCounter,
}

impl SchedulerMetricsInner {
    fn new() -> Self {
        Self {
            plan_latency_seconds: register_histogram!(
                "hos_scheduler_plan_latency_seconds",
                "Time spent planning a trip and building its day logs",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register plan_latency_seconds"),

            trips_planned: register_int_counter!(
                "hos_scheduler_trips_planned_total",
                "Trips planned successfully"
            )
            .expect("Failed to register trips_planned"),

            planning_errors: register_int_counter_vec!(
                "hos_scheduler_planning_errors_total",
                "Rejected planning requests by error kind",
                &["kind"]
            )
            .expect("Failed to register planning_errors"),

            fuel_stops: register_int_counter!(
                "hos_scheduler_fuel_stops_total",
                "Fuel stops inserted into planned trips"
            )
            .expect("Failed to register fuel_stops"),

            rest_stops: register_int_counter!(
                "hos_scheduler_rest_stops_total",
                "Rest stops inserted into planned trips"
            )
            .expect("Failed to register rest_stops"),

            day_logs: register_int_counter!(
                "hos_scheduler_day_logs_total",
                "Day logs produced"
            )
            .expect("Failed to register day_logs"),

            day_total_mismatches: register_int_counter!(
                "hos_scheduler_day_total_mismatches_total",
                "Day logs whose totals did not add up to 24 hours"
            )
            .expect("Failed to register day_total_mismatches"),

            location_fallbacks: register_int_counter!(
                "hos_scheduler_location_fallbacks_total",
                "Stops labelled with a fallback because the location lookup failed"
            )
            .expect("Failed to register location_fallbacks"),

            cycle_halts: register_int_counter!(
                "hos_scheduler_cycle_halts_total",
                "Trips cut short because the cycle cap was reached"
            )
            .expect("Failed to register cycle_halts"),
        }
    }
}

/// Handle to the process-wide scheduler metrics
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct SchedulerMetrics {
    _private: (),
}

impl Default for SchedulerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerMetrics {
    /// Create a handle, registering the metrics on first use
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(SchedulerMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &SchedulerMetricsInner {
        GLOBAL_METRICS.get_or_init(SchedulerMetricsInner::new)
    }

    pub fn observe_plan_latency(&self, duration_secs: f64) {
        self.inner().plan_latency_seconds.observe(duration_secs);
    }

    /// Count a finished schedule and everything in it
    pub fn record_schedule(&self, schedule: &TripSchedule, location_fallbacks: usize) {
        let inner = self.inner();
        inner.trips_planned.inc();
        inner
            .fuel_stops
            .inc_by(schedule.timeline.fuel_stops().count() as u64);
        inner
            .rest_stops
            .inc_by(schedule.timeline.rest_stops().count() as u64);
        inner.day_logs.inc_by(schedule.day_logs.len() as u64);
        inner
            .day_total_mismatches
            .inc_by(schedule.diagnostics.len() as u64);
        inner.location_fallbacks.inc_by(location_fallbacks as u64);
        if !schedule.timeline.is_complete() {
            inner.cycle_halts.inc();
        }
    }

    pub fn inc_planning_errors(&self, kind: &str) {
        self.inner().planning_errors.with_label_values(&[kind]).inc();
    }

    pub fn trips_planned(&self) -> u64 {
        self.inner().trips_planned.get()
    }

    pub fn planning_errors(&self, kind: &str) -> u64 {
        self.inner().planning_errors.with_label_values(&[kind]).get()
    }
}

/// Structured logger for scheduler events
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn log_trip_planned(&self, schedule: &TripSchedule, latency_ms: f64) {
        let timeline = &schedule.timeline;
        info!(
            event = "trip_planned",
            instance = %self.instance,
            total_miles = timeline.total_miles,
            total_driving_hours = timeline.total_driving_hours,
            fuel_stops = timeline.fuel_stops().count(),
            rest_stops = timeline.rest_stops().count(),
            day_logs = schedule.day_logs.len(),
            complete = timeline.is_complete(),
            latency_ms = latency_ms,
            "Trip planned"
        );
    }

    pub fn log_location_fallback(&self, stop: &StopEvent) {
        warn!(
            event = "stop_location_fallback",
            instance = %self.instance,
            category = stop.kind().query(),
            odometer_miles = stop.odometer_miles,
            arrival_time = %stop.arrival_time,
            label = %stop.location,
            "Stop location could not be resolved"
        );
    }

    pub fn log_day_total_mismatch(&self, mismatch: &DayTotalMismatch) {
        warn!(
            event = "day_total_mismatch",
            instance = %self.instance,
            date = %mismatch.date,
            total_hours = mismatch.total_hours,
            "Day log total differs from 24 hours"
        );
    }

    pub fn log_cycle_exhausted(&self, halt: &CycleHalt) {
        warn!(
            event = "cycle_exhausted",
            instance = %self.instance,
            at = %halt.at,
            miles_traveled = halt.miles_traveled,
            miles_remaining = halt.miles_remaining,
            "Cycle hours exhausted before arrival"
        );
    }

    pub fn log_startup(&self, version: &str, addr: &str) {
        info!(
            event = "server_started",
            instance = %self.instance,
            version = %version,
            addr = %addr,
            "HOS scheduler started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "server_shutdown",
            instance = %self.instance,
            reason = %reason,
            "HOS scheduler shutting down"
        );
    }
}
