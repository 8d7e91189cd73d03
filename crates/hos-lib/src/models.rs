//! Core data models for trip planning and duty logs

use crate::limits::HosLimits;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hours in a log day
pub const HOURS_PER_DAY: f64 = 24.0;

/// Allowed drift between a day's total and 24h
pub const DAY_TOTAL_TOLERANCE: f64 = 0.01;

/// Meters per statute mile
pub const METERS_PER_MILE: f64 = 1609.34;

/// Geographic coordinate in routing order (longitude first)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Linear interpolation towards `other`, `fraction` clamped to [0, 1]
    pub fn lerp(&self, other: &Coordinate, fraction: f64) -> Coordinate {
        let t = fraction.clamp(0.0, 1.0);
        Coordinate {
            longitude: self.longitude + (other.longitude - self.longitude) * t,
            latitude: self.latitude + (other.latitude - self.latitude) * t,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.longitude, self.latitude)
    }
}

/// Resolved endpoints of a trip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteEndpoints {
    pub origin: Coordinate,
    pub pickup: Coordinate,
    pub dropoff: Coordinate,
}

impl RouteEndpoints {
    /// Approximate position after `miles_traveled` of `total_miles`
    pub fn position_at(&self, miles_traveled: f64, total_miles: f64) -> Coordinate {
        let fraction = if total_miles > 0.0 {
            miles_traveled / total_miles
        } else {
            0.0
        };
        self.pickup.lerp(&self.dropoff, fraction)
    }

    pub fn is_valid(&self) -> bool {
        self.origin.is_valid() && self.pickup.is_valid() && self.dropoff.is_valid()
    }
}

/// Distance and duration as supplied by the route resolver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_miles: f64,
    pub duration_hours: f64,
}

impl RouteSummary {
    /// Convert a metric routing summary and add pickup plus dropoff handling time
    pub fn from_metric(distance_meters: f64, duration_seconds: f64, limits: &HosLimits) -> Self {
        Self {
            distance_miles: distance_meters / METERS_PER_MILE,
            duration_hours: duration_seconds / 3600.0 + 2.0 * limits.pickup_dropoff_hours,
        }
    }
}

/// Regulated duty status of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyStatus {
    OffDuty,
    Sleeper,
    Driving,
    OnDuty,
}

impl DutyStatus {
    pub const ALL: [DutyStatus; 4] = [
        DutyStatus::OffDuty,
        DutyStatus::Sleeper,
        DutyStatus::Driving,
        DutyStatus::OnDuty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DutyStatus::OffDuty => "off_duty",
            DutyStatus::Sleeper => "sleeper",
            DutyStatus::Driving => "driving",
            DutyStatus::OnDuty => "on_duty",
        }
    }

    /// Counts against the daily duty window and the cycle
    pub fn is_on_duty(&self) -> bool {
        matches!(self, DutyStatus::Driving | DutyStatus::OnDuty)
    }
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a stop happens: a resolved coordinate or a fallback label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopLocation {
    Resolved(Coordinate),
    Unknown(String),
}

impl StopLocation {
    pub fn is_resolved(&self) -> bool {
        matches!(self, StopLocation::Resolved(_))
    }
}

impl fmt::Display for StopLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopLocation::Resolved(coord) => write!(f, "{}", coord),
            StopLocation::Unknown(label) => f.write_str(label),
        }
    }
}

/// Kind of a planned stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    Fuel,
    Rest,
}

impl StopKind {
    /// Category string handed to the location lookup
    pub fn query(&self) -> &'static str {
        match self {
            StopKind::Fuel => "fuel stop",
            StopKind::Rest => "rest stop",
        }
    }

    /// Label used when the lookup fails
    pub fn fallback_label(&self) -> String {
        format!("Unknown {}", self.query())
    }
}

/// A fuel or rest stop produced by the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopEvent {
    pub location: StopLocation,
    pub arrival_time: NaiveDateTime,
    pub departure_time: NaiveDateTime,
    pub rest_duration_hours: f64,
    pub is_fuel_stop: bool,
    #[serde(default)]
    pub is_sleeper_berth: bool,
    /// Miles driven since departure when the stop begins
    #[serde(default)]
    pub odometer_miles: f64,
}

impl StopEvent {
    pub fn kind(&self) -> StopKind {
        if self.is_fuel_stop {
            StopKind::Fuel
        } else {
            StopKind::Rest
        }
    }
}

/// Reported when the cycle cap is reached before the trip is finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleHalt {
    pub at: NaiveDateTime,
    pub miles_traveled: f64,
    pub miles_remaining: f64,
}

/// Output of the rest stop planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripTimeline {
    pub total_miles: f64,
    pub total_driving_hours: f64,
    /// Duration reported by the route resolver, informational only
    #[serde(default)]
    pub estimated_duration_hours: f64,
    pub departure_time: NaiveDateTime,
    pub estimated_arrival: NaiveDateTime,
    pub stops: Vec<StopEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_halt: Option<CycleHalt>,
}

impl TripTimeline {
    pub fn fuel_stops(&self) -> impl Iterator<Item = &StopEvent> {
        self.stops.iter().filter(|s| s.is_fuel_stop)
    }

    pub fn rest_stops(&self) -> impl Iterator<Item = &StopEvent> {
        self.stops.iter().filter(|s| !s.is_fuel_stop)
    }

    /// False when the cycle cap halted the simulation
    pub fn is_complete(&self) -> bool {
        self.cycle_halt.is_none()
    }
}

/// One contiguous block of a single duty status within a day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub status: DutyStatus,
    pub start_hour: f64,
    pub end_hour: f64,
}

impl LogEntry {
    pub fn duration(&self) -> f64 {
        self.end_hour - self.start_hour
    }
}

/// Day total drifted away from 24h
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTotalMismatch {
    pub date: NaiveDate,
    pub total_hours: f64,
}

/// Duty log of a single calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLog {
    pub date: NaiveDate,
    pub entries: Vec<LogEntry>,
    pub off_duty_hours: f64,
    pub sleeper_hours: f64,
    pub driving_hours: f64,
    pub on_duty_hours: f64,
    pub total_hours: f64,
    pub total_miles: f64,
}

impl DayLog {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            entries: Vec::new(),
            off_duty_hours: 0.0,
            sleeper_hours: 0.0,
            driving_hours: 0.0,
            on_duty_hours: 0.0,
            total_hours: 0.0,
            total_miles: 0.0,
        }
    }

    /// Append an entry and charge its duration; empty spans are ignored
    pub fn push(&mut self, status: DutyStatus, start_hour: f64, end_hour: f64) -> f64 {
        let start = start_hour.clamp(0.0, HOURS_PER_DAY);
        let end = end_hour.clamp(0.0, HOURS_PER_DAY);
        if end <= start {
            return 0.0;
        }

        let hours = end - start;
        self.entries.push(LogEntry {
            status,
            start_hour: start,
            end_hour: end,
        });
        *self.total_for_mut(status) += hours;
        hours
    }

    fn total_for_mut(&mut self, status: DutyStatus) -> &mut f64 {
        match status {
            DutyStatus::OffDuty => &mut self.off_duty_hours,
            DutyStatus::Sleeper => &mut self.sleeper_hours,
            DutyStatus::Driving => &mut self.driving_hours,
            DutyStatus::OnDuty => &mut self.on_duty_hours,
        }
    }

    pub fn total_for(&self, status: DutyStatus) -> f64 {
        match status {
            DutyStatus::OffDuty => self.off_duty_hours,
            DutyStatus::Sleeper => self.sleeper_hours,
            DutyStatus::Driving => self.driving_hours,
            DutyStatus::OnDuty => self.on_duty_hours,
        }
    }

    /// End hour of the last recorded entry, 0 for an empty day
    pub fn last_end_hour(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.end_hour)
            .fold(0.0, f64::max)
    }

    /// Close the day from the last entry to hour 24 with `status`
    pub fn fill_to_end_of_day(&mut self, status: DutyStatus) {
        let last = self.last_end_hour();
        if last < HOURS_PER_DAY {
            self.push(status, last, HOURS_PER_DAY);
        }
    }

    /// Driving plus on-duty-not-driving hours
    pub fn duty_hours(&self) -> f64 {
        self.driving_hours + self.on_duty_hours
    }

    /// Sum the four categories into `total_hours` and derive miles
    pub fn finalize(&mut self, avg_speed_mph: f64) {
        self.total_hours =
            self.off_duty_hours + self.sleeper_hours + self.driving_hours + self.on_duty_hours;
        self.total_miles = self.driving_hours * avg_speed_mph;
    }

    /// Self-check that the day adds up to 24h
    pub fn check_totals(&self) -> std::result::Result<(), DayTotalMismatch> {
        if (self.total_hours - HOURS_PER_DAY).abs() > DAY_TOTAL_TOLERANCE {
            return Err(DayTotalMismatch {
                date: self.date,
                total_hours: self.total_hours,
            });
        }
        Ok(())
    }

    /// Entries start at 0, end at 24, and each starts where the previous ended
    pub fn is_contiguous(&self) -> bool {
        let mut cursor = 0.0;
        for entry in &self.entries {
            if (entry.start_hour - cursor).abs() > 1e-6 || entry.end_hour <= entry.start_hour {
                return false;
            }
            cursor = entry.end_hour;
        }
        (cursor - HOURS_PER_DAY).abs() <= 1e-6
    }

    /// Transition points for the log renderer, one pair per entry boundary
    pub fn drawing(&self) -> DayDrawing {
        let points = self
            .entries
            .iter()
            .flat_map(|e| [(e.start_hour, e.status), (e.end_hour, e.status)])
            .collect();
        DayDrawing {
            date: self.date,
            points,
        }
    }
}

/// Renderer input for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayDrawing {
    pub date: NaiveDate,
    pub points: Vec<(f64, DutyStatus)>,
}

/// A planning request as seen by the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub total_miles: f64,
    /// Duration hint from the route resolver
    #[serde(default)]
    pub total_duration_hours: f64,
    pub cycle_hours_used: f64,
    pub departure_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteEndpoints>,
}

/// Complete result of planning one trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSchedule {
    pub timeline: TripTimeline,
    pub day_logs: Vec<DayLog>,
    pub drawings: Vec<DayDrawing>,
    #[serde(default)]
    pub diagnostics: Vec<DayTotalMismatch>,
}
