//! Trip scheduler facade
//!
//! Runs the rest stop planner, then the day log builder, and packages
//! both outputs with renderer input and diagnostics.

use crate::daylog::DayLogBuilder;
use crate::error::Result;
use crate::limits::{HosLimits, ScheduleOptions};
use crate::models::{TripRequest, TripSchedule};
use crate::observability::{SchedulerMetrics, StructuredLogger};
use crate::planner::{LocationLookup, PassthroughLookup, RestStopPlanner};
use std::sync::Arc;
use std::time::Instant;

/// A schedule plus what the caller needs to update health
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    pub schedule: TripSchedule,
    /// Stops that fell back to a sentinel label
    pub location_fallbacks: usize,
}

/// Plans trips end to end; cheap to share across requests
pub struct TripScheduler {
    planner: RestStopPlanner,
    day_logs: DayLogBuilder,
    metrics: SchedulerMetrics,
    logger: StructuredLogger,
}

impl TripScheduler {
    pub fn new(
        limits: HosLimits,
        options: ScheduleOptions,
        lookup: Arc<dyn LocationLookup>,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            day_logs: DayLogBuilder::new(limits.clone(), options.clone()),
            planner: RestStopPlanner::new(limits, options, lookup),
            metrics: SchedulerMetrics::new(),
            logger,
        }
    }

    /// Default limits and options, stops labelled with their route position
    pub fn with_defaults() -> Self {
        Self::new(
            HosLimits::default(),
            ScheduleOptions::default(),
            Arc::new(PassthroughLookup),
            StructuredLogger::new("local"),
        )
    }

    pub fn limits(&self) -> &HosLimits {
        self.planner.limits()
    }

    /// Plan a trip and build its day logs
    pub fn schedule(&self, request: &TripRequest) -> Result<TripSchedule> {
        self.schedule_with_outcome(request).map(|o| o.schedule)
    }

    /// Like [`schedule`](Self::schedule), also reporting location fallbacks
    pub fn schedule_with_outcome(&self, request: &TripRequest) -> Result<ScheduleOutcome> {
        let started = Instant::now();

        let timeline = match self.planner.plan(request) {
            Ok(timeline) => timeline,
            Err(e) => {
                self.metrics.inc_planning_errors(e.kind());
                return Err(e);
            }
        };

        let day_logs: Vec<_> = self
            .day_logs
            .days_for(&timeline, request.cycle_hours_used)
            .collect();
        let drawings = day_logs.iter().map(|d| d.drawing()).collect();
        let diagnostics: Vec<_> = day_logs
            .iter()
            .filter_map(|d| d.check_totals().err())
            .collect();

        // Without a route nothing was looked up, so nothing failed
        let fallbacks: Vec<_> = if request.route.is_some() {
            timeline
                .stops
                .iter()
                .filter(|s| !s.location.is_resolved())
                .collect()
        } else {
            Vec::new()
        };
        for stop in &fallbacks {
            self.logger.log_location_fallback(stop);
        }
        for mismatch in &diagnostics {
            self.logger.log_day_total_mismatch(mismatch);
        }
        if let Some(halt) = &timeline.cycle_halt {
            self.logger.log_cycle_exhausted(halt);
        }
        let location_fallbacks = fallbacks.len();

        let schedule = TripSchedule {
            timeline,
            day_logs,
            drawings,
            diagnostics,
        };

        let elapsed = started.elapsed();
        self.metrics.observe_plan_latency(elapsed.as_secs_f64());
        self.metrics.record_schedule(&schedule, location_fallbacks);
        self.logger
            .log_trip_planned(&schedule, elapsed.as_secs_f64() * 1000.0);

        Ok(ScheduleOutcome {
            schedule,
            location_fallbacks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedulerError;
    use crate::limits::DayLogMode;
    use crate::models::{Coordinate, RouteEndpoints};
    use crate::planner::UnavailableLookup;
    use chrono::NaiveDate;

    fn request(total_miles: f64, cycle_hours_used: f64) -> TripRequest {
        TripRequest {
            total_miles,
            total_duration_hours: total_miles / 55.0 + 2.0,
            cycle_hours_used,
            departure_time: NaiveDate::from_ymd_opt(2025, 3, 3)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap(),
            route: Some(RouteEndpoints {
                origin: Coordinate::new(-87.63, 41.88),
                pickup: Coordinate::new(-90.20, 38.63),
                dropoff: Coordinate::new(-118.24, 34.05),
            }),
        }
    }

    #[test]
    fn test_schedule_bundles_timeline_logs_and_drawings() {
        let scheduler = TripScheduler::with_defaults();
        let schedule = scheduler.schedule(&request(1200.0, 0.0)).unwrap();

        assert_eq!(schedule.timeline.stops.len(), 2);
        assert_eq!(schedule.day_logs.len(), 2);
        assert_eq!(schedule.drawings.len(), schedule.day_logs.len());
        assert!(schedule.diagnostics.is_empty());
        for (day, drawing) in schedule.day_logs.iter().zip(&schedule.drawings) {
            assert_eq!(day.date, drawing.date);
            assert_eq!(drawing.points.len(), day.entries.len() * 2);
            assert_eq!(drawing.points.first().map(|p| p.0), Some(0.0));
            assert_eq!(drawing.points.last().map(|p| p.0), Some(24.0));
        }
    }

    #[test]
    fn test_dates_are_unique_and_consecutive() {
        let schedule = TripScheduler::with_defaults()
            .schedule(&request(3000.0, 0.0))
            .unwrap();
        for pair in schedule.day_logs.windows(2) {
            assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }
    }

    #[test]
    fn test_fatal_errors_return_no_partial_schedule() {
        let scheduler = TripScheduler::with_defaults();
        let err = scheduler.schedule(&request(500.0, 75.0)).unwrap_err();
        assert!(matches!(err, SchedulerError::InsufficientCycleHours { .. }));

        let failure = err.to_failure();
        assert_eq!(failure.kind, "insufficient_cycle_hours");
    }

    #[test]
    fn test_fallbacks_are_reported() {
        let scheduler = TripScheduler::new(
            HosLimits::default(),
            ScheduleOptions::default(),
            Arc::new(UnavailableLookup),
            StructuredLogger::new("test"),
        );
        let outcome = scheduler
            .schedule_with_outcome(&request(1200.0, 0.0))
            .unwrap();
        assert_eq!(outcome.location_fallbacks, 2);

        let clean = TripScheduler::with_defaults()
            .schedule_with_outcome(&request(1200.0, 0.0))
            .unwrap();
        assert_eq!(clean.location_fallbacks, 0);
    }

    #[test]
    fn test_nearly_full_cycle_yields_fewer_days() {
        let scheduler = TripScheduler::with_defaults();
        let schedule = scheduler.schedule(&request(1500.0, 69.5)).unwrap();

        assert!(!schedule.timeline.is_complete());
        assert_eq!(schedule.day_logs.len(), 1);
    }

    #[test]
    fn test_stop_aware_mode_logs_planned_rests_within_daily_caps() {
        let scheduler = TripScheduler::new(
            HosLimits::default(),
            ScheduleOptions {
                day_log_mode: DayLogMode::StopAware,
                rest_in_sleeper_berth: true,
                ..ScheduleOptions::default()
            },
            Arc::new(PassthroughLookup),
            StructuredLogger::new("test"),
        );
        let schedule = scheduler.schedule(&request(2600.0, 10.0)).unwrap();

        let driving: f64 = schedule.day_logs.iter().map(|d| d.driving_hours).sum();
        assert!(driving <= schedule.timeline.total_driving_hours + 1e-3);
        assert!(schedule.day_logs.iter().all(|d| d.driving_hours <= 11.0 + 1e-9));
        let sleeper: f64 = schedule.day_logs.iter().map(|d| d.sleeper_hours).sum();
        let rests = schedule.timeline.rest_stops().count() as f64;
        assert!((sleeper - rests * 10.0).abs() < 1e-3);
        assert!(schedule.day_logs.iter().all(|d| d.is_contiguous()));
    }

    #[test]
    fn test_identical_requests_yield_identical_schedules() {
        let scheduler = TripScheduler::with_defaults();
        let first = scheduler.schedule(&request(2750.0, 12.0)).unwrap();
        let second = scheduler.schedule(&request(2750.0, 12.0)).unwrap();
        assert_eq!(first, second);
    }
}
