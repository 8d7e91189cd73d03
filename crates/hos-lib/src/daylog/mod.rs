//! Day log builder
//!
//! Turns a planned trip into one duty log per calendar day. Two modes
//! exist:
//!
//! * [`ParityDays`] re-derives a single drive block per day from the
//!   departure time, the miles left and the cycle hours used, and closes
//!   every day in sleeper status. Stops from the planner are not consulted.
//! * [`StopAwareDays`] folds the planner's driving legs and stop events
//!   into the days they fall on. Stops match the timeline; driving is
//!   logged up to each day's caps.
//!
//! Both are lazy iterators producing one [`DayLog`] per call to `next`.

mod entries;
mod parity;
mod stop_aware;

pub use parity::ParityDays;
pub use stop_aware::StopAwareDays;

use crate::limits::{DayLogMode, HosLimits, ScheduleOptions};
use crate::models::{DayLog, TripTimeline};
use chrono::NaiveDateTime;
use tracing::warn;

/// Builds day logs with the configured limits and options
#[derive(Debug, Clone, Default)]
pub struct DayLogBuilder {
    limits: HosLimits,
    options: ScheduleOptions,
}

impl DayLogBuilder {
    pub fn new(limits: HosLimits, options: ScheduleOptions) -> Self {
        Self { limits, options }
    }

    /// Day-by-day simulation from the departure, the miles left and the cycle hours used
    pub fn build(
        &self,
        departure_time: NaiveDateTime,
        total_miles_remaining: f64,
        cycle_hours_used: f64,
    ) -> ParityDays {
        ParityDays::new(
            self.limits.clone(),
            self.options.clone(),
            departure_time,
            total_miles_remaining,
            cycle_hours_used,
        )
    }

    /// Split the planner's legs and stops at midnights
    pub fn fold_stops(&self, timeline: &TripTimeline) -> StopAwareDays {
        StopAwareDays::new(timeline, &self.limits, &self.options)
    }

    /// Day logs for a planned trip in the configured mode
    pub fn days_for(&self, timeline: &TripTimeline, cycle_hours_used: f64) -> DayLogs {
        match self.options.day_log_mode {
            DayLogMode::Parity => DayLogs::Parity(self.build(
                timeline.departure_time,
                timeline.total_miles,
                cycle_hours_used,
            )),
            DayLogMode::StopAware => DayLogs::StopAware(self.fold_stops(timeline)),
        }
    }
}

/// Day logs of either mode
#[derive(Debug)]
pub enum DayLogs {
    Parity(ParityDays),
    StopAware(StopAwareDays),
}

impl Iterator for DayLogs {
    type Item = DayLog;

    fn next(&mut self) -> Option<DayLog> {
        match self {
            DayLogs::Parity(days) => days.next(),
            DayLogs::StopAware(days) => days.next(),
        }
    }
}

/// Compute totals and self-check the day; a mismatch is logged, the day is kept
fn close_day(day: &mut DayLog, avg_speed_mph: f64) {
    day.finalize(avg_speed_mph);
    if let Err(mismatch) = day.check_totals() {
        warn!(
            date = %mismatch.date,
            total_hours = mismatch.total_hours,
            "Day log does not add up to 24 hours"
        );
    }
}
