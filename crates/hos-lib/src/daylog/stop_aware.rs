//! Fold the planner's timeline into calendar days
//!
//! The timeline is flattened into absolute segments measured in hours
//! since midnight of the departure date. Day `n` covers `[24n, 24n + 24)`;
//! each segment overlapping it is clipped into the day, and gaps before
//! departure and after arrival are off-duty.
//!
//! Driving is logged under the same per-day caps as the other mode: none
//! starting at or after the cutoff hour, and no more than the daily
//! driving and duty limits. Driving the timeline holds beyond those caps is
//! left off-duty in the log and reported by `unlogged_driving_hours`.

use super::close_day;
use crate::limits::{HosLimits, ScheduleOptions};
use crate::models::{DayLog, DutyStatus, StopEvent, TripTimeline, HOURS_PER_DAY};
use crate::timeutil::{hours_between, midnight};
use chrono::{Days, NaiveDate};
use tracing::warn;

const HOURS_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone)]
enum SegmentKind {
    Driving,
    Stop(StopEvent),
}

#[derive(Debug, Clone)]
struct Segment {
    start: f64,
    end: f64,
    kind: SegmentKind,
}

/// Lazy sequence of day logs that agree with the planned stops
#[derive(Debug, Clone)]
pub struct StopAwareDays {
    first_date: NaiveDate,
    segments: Vec<Segment>,
    day_count: u64,
    next_day: u64,
    limits: HosLimits,
    fuel_stop_hours: f64,
    driving_cutoff_hour: f64,
    unlogged_driving_hours: f64,
}

impl StopAwareDays {
    pub(super) fn new(
        timeline: &TripTimeline,
        limits: &HosLimits,
        options: &ScheduleOptions,
    ) -> Self {
        let first_date = timeline.departure_time.date();
        let origin = midnight(first_date);
        let offset = |t| hours_between(origin, t);

        let mut segments = Vec::with_capacity(timeline.stops.len() * 2 + 1);
        let mut cursor = offset(timeline.departure_time);
        for stop in &timeline.stops {
            let arrival = offset(stop.arrival_time);
            let departure = offset(stop.departure_time);
            if arrival > cursor {
                segments.push(Segment {
                    start: cursor,
                    end: arrival,
                    kind: SegmentKind::Driving,
                });
            }
            segments.push(Segment {
                start: arrival,
                end: departure,
                kind: SegmentKind::Stop(stop.clone()),
            });
            cursor = departure;
        }

        let end = offset(timeline.estimated_arrival);
        if end > cursor {
            segments.push(Segment {
                start: cursor,
                end,
                kind: SegmentKind::Driving,
            });
        }

        // A trip ending exactly at midnight does not open another day
        let day_count = (end.max(cursor) / HOURS_PER_DAY - 1e-9).floor().max(0.0) as u64 + 1;

        Self {
            first_date,
            segments,
            day_count,
            next_day: 0,
            limits: limits.clone(),
            fuel_stop_hours: options.fuel_stop_hours,
            driving_cutoff_hour: options.driving_cutoff_hour,
            unlogged_driving_hours: 0.0,
        }
    }

    /// Number of calendar days the trip touches
    pub fn day_count(&self) -> u64 {
        self.day_count
    }

    /// Planned driving left out of the days produced so far by the per-day caps
    pub fn unlogged_driving_hours(&self) -> f64 {
        self.unlogged_driving_hours
    }
}

impl Iterator for StopAwareDays {
    type Item = DayLog;

    fn next(&mut self) -> Option<DayLog> {
        if self.next_day >= self.day_count {
            return None;
        }
        let index = self.next_day;
        self.next_day += 1;

        let date = self.first_date.checked_add_days(Days::new(index))?;
        let window_start = index as f64 * HOURS_PER_DAY;
        let window_end = window_start + HOURS_PER_DAY;
        let mut day = DayLog::new(date);
        let mut cursor = 0.0;
        let mut unlogged = 0.0;

        let overlapping = self
            .segments
            .iter()
            .filter(|s| s.end > window_start && s.start < window_end);
        for segment in overlapping {
            let start = (segment.start - window_start).max(0.0);
            let end = (segment.end - window_start).min(HOURS_PER_DAY);
            if start > cursor {
                day.push(DutyStatus::OffDuty, cursor, start);
            }
            match &segment.kind {
                SegmentKind::Driving => {
                    let logged = day.add_driving_entry(
                        start,
                        end,
                        &self.limits,
                        self.driving_cutoff_hour,
                    );
                    unlogged += (end - start - logged).max(0.0);
                }
                SegmentKind::Stop(stop) => {
                    let on_duty_until = segment.start + self.fuel_stop_hours - window_start;
                    day.add_rest_entry(stop, start, end, on_duty_until);
                }
            }
            cursor = day.last_end_hour();
        }

        if unlogged > HOURS_EPSILON {
            warn!(
                date = %date,
                unlogged_hours = unlogged,
                "Planned driving exceeds the day's limits, not logged"
            );
            self.unlogged_driving_hours += unlogged;
        }

        day.fill_to_end_of_day(DutyStatus::OffDuty);
        close_day(&mut day, self.limits.avg_speed_mph);
        Some(day)
    }
}
