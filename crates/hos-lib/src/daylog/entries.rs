//! Entry builders that fold planner output into a day

use crate::limits::HosLimits;
use crate::models::{DayLog, DutyStatus, StopEvent};

impl DayLog {
    /// Record a driving span within the day's limits; returns the hours recorded
    ///
    /// Nothing is recorded for a span starting at or after `cutoff_hour`.
    /// Otherwise the span is clipped to midnight and shortened so the day
    /// stays within the daily driving and duty limits.
    pub fn add_driving_entry(
        &mut self,
        start_hour: f64,
        end_hour: f64,
        limits: &HosLimits,
        cutoff_hour: f64,
    ) -> f64 {
        if start_hour >= cutoff_hour {
            return 0.0;
        }
        let room = (limits.max_daily_driving - self.driving_hours)
            .min(limits.max_daily_duty - self.duty_hours())
            .max(0.0);
        self.push(DutyStatus::Driving, start_hour, end_hour.min(start_hour + room))
    }

    /// Record the part of a stop that falls on this day
    ///
    /// Fuel stops are on-duty up to `on_duty_until` and off-duty after it.
    /// Rest stops are sleeper time when the stop was taken in the berth,
    /// off-duty otherwise.
    pub fn add_rest_entry(
        &mut self,
        stop: &StopEvent,
        start_hour: f64,
        end_hour: f64,
        on_duty_until: f64,
    ) {
        if stop.is_fuel_stop {
            let split = on_duty_until.clamp(start_hour, end_hour);
            self.push(DutyStatus::OnDuty, start_hour, split);
            self.push(DutyStatus::OffDuty, split, end_hour);
            return;
        }

        let status = if stop.is_sleeper_berth {
            DutyStatus::Sleeper
        } else {
            DutyStatus::OffDuty
        };
        self.push(status, start_hour, end_hour);
    }
}

#[cfg(test)]
mod tests {
    use crate::limits::HosLimits;
    use crate::models::{DayLog, DutyStatus, StopEvent, StopKind, StopLocation};
    use chrono::NaiveDate;

    fn stop(is_fuel_stop: bool, is_sleeper_berth: bool) -> StopEvent {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let kind = if is_fuel_stop { StopKind::Fuel } else { StopKind::Rest };
        StopEvent {
            location: StopLocation::Unknown(kind.fallback_label()),
            arrival_time: date.and_hms_opt(10, 0, 0).unwrap(),
            departure_time: date.and_hms_opt(11, 0, 0).unwrap(),
            rest_duration_hours: 1.0,
            is_fuel_stop,
            is_sleeper_berth,
            odometer_miles: 0.0,
        }
    }

    fn day() -> DayLog {
        DayLog::new(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap())
    }

    #[test]
    fn test_driving_entry_is_clipped_to_day() {
        let mut log = day();
        assert_eq!(log.add_driving_entry(20.0, 27.0, &HosLimits::default(), 22.0), 4.0);
        assert_eq!(log.driving_hours, 4.0);
    }

    #[test]
    fn test_no_driving_entry_at_or_after_cutoff() {
        let mut log = day();
        assert_eq!(log.add_driving_entry(22.0, 23.0, &HosLimits::default(), 22.0), 0.0);
        assert_eq!(log.add_driving_entry(22.5, 23.0, &HosLimits::default(), 22.0), 0.0);
        assert!(log.entries.is_empty());
    }

    #[test]
    fn test_driving_entry_stops_at_daily_driving_limit() {
        let limits = HosLimits::default();
        let mut log = day();
        assert_eq!(log.add_driving_entry(0.0, 3.0, &limits, 22.0), 3.0);
        assert_eq!(log.add_driving_entry(10.0, 21.0, &limits, 22.0), 8.0);
        assert_eq!(log.add_driving_entry(21.0, 21.5, &limits, 22.0), 0.0);
        assert_eq!(log.driving_hours, 11.0);
        assert_eq!(log.entries[1].end_hour, 18.0);
    }

    #[test]
    fn test_driving_entry_respects_duty_window() {
        let limits = HosLimits::default();
        let mut log = day();
        log.push(DutyStatus::OnDuty, 0.0, 4.0);
        assert_eq!(log.add_driving_entry(4.0, 16.0, &limits, 22.0), 10.0);
        assert_eq!(log.duty_hours(), 14.0);
    }

    #[test]
    fn test_fuel_stop_splits_on_and_off_duty() {
        let mut log = day();
        log.add_rest_entry(&stop(true, false), 10.0, 11.0, 10.5);
        assert_eq!(log.on_duty_hours, 0.5);
        assert_eq!(log.off_duty_hours, 0.5);
        assert_eq!(log.entries[0].status, DutyStatus::OnDuty);
    }

    #[test]
    fn test_fuel_stop_continuing_past_its_on_duty_part() {
        let mut log = day();
        log.add_rest_entry(&stop(true, false), 0.0, 0.75, -0.25);
        assert_eq!(log.on_duty_hours, 0.0);
        assert_eq!(log.off_duty_hours, 0.75);
    }

    #[test]
    fn test_rest_stop_status_follows_berth_flag() {
        let mut log = day();
        log.add_rest_entry(&stop(false, true), 10.0, 20.0, 0.0);
        assert_eq!(log.sleeper_hours, 10.0);
        assert_eq!(log.off_duty_hours, 0.0);

        let mut log = day();
        log.add_rest_entry(&stop(false, false), 10.0, 20.0, 0.0);
        assert_eq!(log.off_duty_hours, 10.0);
        assert_eq!(log.sleeper_hours, 0.0);
    }
}
