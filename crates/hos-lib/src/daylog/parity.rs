//! Per-day re-simulation of a trip
//!
//! Each day: off-duty until the departure clock (or a fixed pre-shift rest
//! when the day starts at midnight), a pre-trip inspection, one driving
//! block, and sleeper until midnight.

use super::close_day;
use crate::limits::{HosLimits, ScheduleOptions};
use crate::models::{DayLog, DutyStatus};
use crate::timeutil::hour_of_day;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

const MILES_EPSILON: f64 = 1e-6;
const HOURS_EPSILON: f64 = 1e-6;

/// Lazy sequence of re-derived day logs
#[derive(Debug, Clone)]
pub struct ParityDays {
    limits: HosLimits,
    options: ScheduleOptions,
    departure: NaiveDateTime,
    current_day: Option<NaiveDate>,
    miles_remaining: f64,
    cycle_hours_used: f64,
}

impl ParityDays {
    pub(super) fn new(
        limits: HosLimits,
        options: ScheduleOptions,
        departure: NaiveDateTime,
        miles_remaining: f64,
        cycle_hours_used: f64,
    ) -> Self {
        Self {
            limits,
            options,
            departure,
            current_day: Some(departure.date()),
            miles_remaining,
            cycle_hours_used,
        }
    }

    pub fn miles_remaining(&self) -> f64 {
        self.miles_remaining.max(0.0)
    }

    pub fn cycle_hours_used(&self) -> f64 {
        self.cycle_hours_used
    }

    fn finished(&self) -> bool {
        self.miles_remaining <= MILES_EPSILON
            || self.cycle_hours_used >= self.limits.max_cycle_hours - HOURS_EPSILON
    }
}

impl Iterator for ParityDays {
    type Item = DayLog;

    fn next(&mut self) -> Option<DayLog> {
        if self.finished() {
            return None;
        }
        let date = self.current_day?;
        let mut day = DayLog::new(date);

        let start_hour = if date == self.departure.date() {
            hour_of_day(self.departure)
        } else {
            0.0
        };

        let mut clock = if start_hour == 0.0 {
            day.push(DutyStatus::OffDuty, 0.0, self.options.pre_shift_rest_hours);
            self.options.pre_shift_rest_hours
        } else {
            day.push(DutyStatus::OffDuty, 0.0, start_hour);
            start_hour
        };

        let cycle_left = self.limits.max_cycle_hours - self.cycle_hours_used;
        let inspection = self.options.pre_trip_inspection_hours.min(cycle_left);
        clock += day.push(DutyStatus::OnDuty, clock, clock + inspection);

        // Cycle room left after today's on-duty time so far
        let cycle_left = cycle_left - day.duty_hours();
        let available = self
            .limits
            .max_daily_driving
            .min(self.limits.max_daily_duty - day.duty_hours())
            .min(cycle_left)
            .max(0.0);
        let needed = self.limits.hours_for(self.miles_remaining);

        let mut driven = 0.0;
        if clock < self.options.driving_cutoff_hour {
            let hours = available
                .min(needed)
                .min(self.options.driving_cutoff_hour - clock);
            driven = day.push(DutyStatus::Driving, clock, clock + hours);
            self.miles_remaining -= self.limits.miles_for(driven);
        }

        day.fill_to_end_of_day(DutyStatus::Sleeper);
        close_day(&mut day, self.limits.avg_speed_mph);

        self.cycle_hours_used += day.duty_hours();
        // Every later day looks like this one, so the sequence would never end
        let stalled = start_hour == 0.0 && driven <= 0.0 && day.duty_hours() <= 0.0;
        self.current_day = if stalled {
            warn!(
                date = %date,
                miles_remaining = self.miles_remaining(),
                "Full day without driving or duty time, ending day logs"
            );
            None
        } else {
            date.succ_opt()
        };

        debug!(
            date = %date,
            driving_hours = day.driving_hours,
            miles_remaining = self.miles_remaining(),
            cycle_hours_used = self.cycle_hours_used,
            "Built day log"
        );

        Some(day)
    }
}

#[cfg(test)]
mod tests {
    use crate::daylog::DayLogBuilder;
    use crate::limits::{HosLimits, ScheduleOptions};
    use crate::models::DutyStatus;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_short_trip_fits_in_one_day() {
        let days: Vec<_> = DayLogBuilder::default().build(at(3, 6, 0), 500.0, 0.0).collect();

        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.date, at(3, 0, 0).date());
        assert_eq!(day.off_duty_hours, 6.0);
        assert_eq!(day.on_duty_hours, 0.5);
        assert!((day.driving_hours - 500.0 / 55.0).abs() < 1e-9);
        assert_eq!(day.entries.last().map(|e| e.status), Some(DutyStatus::Sleeper));
        assert!((day.total_hours - 24.0).abs() < 1e-9);
        assert!(day.is_contiguous());
    }

    #[test]
    fn test_every_day_adds_up_and_respects_daily_limits() {
        let days: Vec<_> = DayLogBuilder::default().build(at(3, 8, 30), 3000.0, 0.0).collect();

        assert_eq!(days.len(), 5);
        for (i, day) in days.iter().enumerate() {
            assert!(day.check_totals().is_ok());
            assert!(day.is_contiguous());
            assert!(day.driving_hours <= 11.0 + 1e-9);
            assert!(day.duty_hours() <= 14.0 + 1e-9);
            if i > 0 {
                assert_eq!(day.date, days[i - 1].date.succ_opt().unwrap());
            }
        }
        let miles: f64 = days.iter().map(|d| d.total_miles).sum();
        assert!((miles - 3000.0).abs() < 1e-6);
    }

    #[test]
    fn test_following_days_start_with_pre_shift_rest() {
        let days: Vec<_> = DayLogBuilder::default().build(at(3, 14, 0), 1200.0, 0.0).collect();

        assert_eq!(days[0].entries[0].end_hour, 14.0);
        for day in &days[1..] {
            let first = day.entries[0];
            assert_eq!(first.status, DutyStatus::OffDuty);
            assert_eq!((first.start_hour, first.end_hour), (0.0, 6.0));
        }
    }

    #[test]
    fn test_midnight_departure_gets_pre_shift_rest() {
        let days: Vec<_> = DayLogBuilder::default().build(at(3, 0, 0), 100.0, 0.0).collect();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].off_duty_hours, 6.0);
        assert_eq!(days[0].entries[1].start_hour, 6.0);
    }

    #[test]
    fn test_no_driving_after_cutoff() {
        let days: Vec<_> = DayLogBuilder::default().build(at(3, 20, 0), 1000.0, 0.0).collect();

        let first = &days[0];
        assert!((first.driving_hours - 1.5).abs() < 1e-9);
        let driving = first
            .entries
            .iter()
            .find(|e| e.status == DutyStatus::Driving)
            .unwrap();
        assert!((driving.end_hour - 22.0).abs() < 1e-9);
        assert!((first.sleeper_hours - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_late_departure_inspection_stops_at_midnight() {
        let days: Vec<_> = DayLogBuilder::default().build(at(3, 23, 50), 300.0, 0.0).collect();

        let first = &days[0];
        assert_eq!(first.driving_hours, 0.0);
        assert!((first.on_duty_hours - 1.0 / 6.0).abs() < 1e-6);
        assert!(first.is_contiguous());
        assert!(first.check_totals().is_ok());
        assert_eq!(days.len(), 2);
    }

    #[test]
    fn test_cycle_cap_ends_the_sequence_early() {
        let days: Vec<_> = DayLogBuilder::default().build(at(3, 6, 0), 1500.0, 69.5).collect();

        // Inspection takes the last half hour, nothing is left to drive
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].driving_hours, 0.0);
        assert_eq!(days[0].on_duty_hours, 0.5);
    }

    #[test]
    fn test_cumulative_duty_never_exceeds_cycle() {
        let mut days = DayLogBuilder::default().build(at(3, 6, 0), 3000.0, 40.0);
        let mut used = 40.0;
        for day in days.by_ref() {
            used += day.duty_hours();
            assert!(used <= 70.0 + 1e-9);
        }
        assert_eq!(days.cycle_hours_used(), used);
        assert!(days.miles_remaining() > 0.0);
    }

    #[test]
    fn test_sequence_is_lazy_and_deterministic() {
        let builder = DayLogBuilder::default();
        let mut days = builder.build(at(3, 6, 0), 3000.0, 0.0);
        let first = days.next().unwrap();
        assert!((days.miles_remaining() - 2395.0).abs() < 1e-6);

        let again = builder.build(at(3, 6, 0), 3000.0, 0.0).next().unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_options_without_driving_room_still_terminate() {
        let options = ScheduleOptions {
            pre_trip_inspection_hours: 0.0,
            driving_cutoff_hour: 0.0,
            ..ScheduleOptions::default()
        };
        assert!(options.validate().is_err());

        let builder = DayLogBuilder::new(HosLimits::default(), options);
        let days: Vec<_> = builder.build(at(3, 6, 0), 500.0, 0.0).take(100).collect();

        // Departure day plus one full day that shows no progress
        assert_eq!(days.len(), 2);
        assert!(days.iter().all(|d| d.driving_hours == 0.0));
        assert!(days.iter().all(|d| d.check_totals().is_ok()));
    }
}
