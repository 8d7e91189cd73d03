//! Hours-of-Service limits and scheduling options
//!
//! Both structs deserialize with per-field defaults so partial overrides
//! from configuration files or environment variables work.

use crate::error::{Result, SchedulerError};
use serde::{Deserialize, Serialize};

/// Max driving hours per duty day
pub const MAX_DAILY_DRIVING_HOURS: f64 = 11.0;

/// Max on-duty window per day
pub const MAX_DAILY_DUTY_HOURS: f64 = 14.0;

/// Required consecutive rest after exhausting a duty window
pub const MIN_REST_PERIOD_HOURS: f64 = 10.0;

/// Max duty hours across the rolling cycle
pub const MAX_CYCLE_HOURS: f64 = 70.0;

/// Length of the rolling cycle in days
pub const CYCLE_DAYS: u32 = 8;

/// Distance between mandatory fuel stops
pub const FUEL_INTERVAL_MILES: f64 = 1000.0;

/// On-duty time charged for pickup and for dropoff, each
pub const PICKUP_DROPOFF_HOURS: f64 = 1.0;

/// Constant speed used to convert distance to time
pub const AVG_SPEED_MPH: f64 = 55.0;

/// Regulatory limits the planner and the day log builder enforce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HosLimits {
    #[serde(default = "default_max_daily_driving")]
    pub max_daily_driving: f64,

    #[serde(default = "default_max_daily_duty")]
    pub max_daily_duty: f64,

    #[serde(default = "default_min_rest_period")]
    pub min_rest_period: f64,

    #[serde(default = "default_max_cycle_hours")]
    pub max_cycle_hours: f64,

    #[serde(default = "default_cycle_days")]
    pub cycle_days: u32,

    #[serde(default = "default_fuel_interval_miles")]
    pub fuel_interval_miles: f64,

    #[serde(default = "default_pickup_dropoff_hours")]
    pub pickup_dropoff_hours: f64,

    #[serde(default = "default_avg_speed_mph")]
    pub avg_speed_mph: f64,
}

fn default_max_daily_driving() -> f64 {
    MAX_DAILY_DRIVING_HOURS
}

fn default_max_daily_duty() -> f64 {
    MAX_DAILY_DUTY_HOURS
}

fn default_min_rest_period() -> f64 {
    MIN_REST_PERIOD_HOURS
}

fn default_max_cycle_hours() -> f64 {
    MAX_CYCLE_HOURS
}

fn default_cycle_days() -> u32 {
    CYCLE_DAYS
}

fn default_fuel_interval_miles() -> f64 {
    FUEL_INTERVAL_MILES
}

fn default_pickup_dropoff_hours() -> f64 {
    PICKUP_DROPOFF_HOURS
}

fn default_avg_speed_mph() -> f64 {
    AVG_SPEED_MPH
}

impl Default for HosLimits {
    fn default() -> Self {
        Self {
            max_daily_driving: MAX_DAILY_DRIVING_HOURS,
            max_daily_duty: MAX_DAILY_DUTY_HOURS,
            min_rest_period: MIN_REST_PERIOD_HOURS,
            max_cycle_hours: MAX_CYCLE_HOURS,
            cycle_days: CYCLE_DAYS,
            fuel_interval_miles: FUEL_INTERVAL_MILES,
            pickup_dropoff_hours: PICKUP_DROPOFF_HOURS,
            avg_speed_mph: AVG_SPEED_MPH,
        }
    }
}

impl HosLimits {
    /// Reject limits the simulation cannot make progress with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_daily_driving", self.max_daily_driving),
            ("max_daily_duty", self.max_daily_duty),
            ("min_rest_period", self.min_rest_period),
            ("max_cycle_hours", self.max_cycle_hours),
            ("fuel_interval_miles", self.fuel_interval_miles),
            ("avg_speed_mph", self.avg_speed_mph),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SchedulerError::InvalidLimits(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if !self.pickup_dropoff_hours.is_finite() || self.pickup_dropoff_hours < 0.0 {
            return Err(SchedulerError::InvalidLimits(format!(
                "pickup_dropoff_hours must be non-negative, got {}",
                self.pickup_dropoff_hours
            )));
        }

        if self.max_daily_driving > self.max_daily_duty {
            return Err(SchedulerError::InvalidLimits(format!(
                "max_daily_driving ({}) exceeds max_daily_duty ({})",
                self.max_daily_driving, self.max_daily_duty
            )));
        }

        if self.max_daily_driving >= 24.0 || self.max_daily_duty > 24.0 {
            return Err(SchedulerError::InvalidLimits(
                "daily limits must fit inside a 24h day".to_string(),
            ));
        }

        Ok(())
    }

    /// Hours needed to cover `miles` at the average speed
    pub fn hours_for(&self, miles: f64) -> f64 {
        miles / self.avg_speed_mph
    }

    /// Miles covered in `hours` at the average speed
    pub fn miles_for(&self, hours: f64) -> f64 {
        hours * self.avg_speed_mph
    }
}

/// How the day log builder derives each day's entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayLogMode {
    /// Re-derive one drive block per day and close the day in sleeper
    #[default]
    Parity,
    /// Fold the planner's driving legs and stop events into each day
    StopAware,
}

impl std::str::FromStr for DayLogMode {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "parity" => Ok(DayLogMode::Parity),
            "stop_aware" => Ok(DayLogMode::StopAware),
            other => Err(SchedulerError::InvalidLimits(format!(
                "unknown day log mode '{}'",
                other
            ))),
        }
    }
}

/// Non-regulatory knobs of the schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOptions {
    #[serde(default)]
    pub day_log_mode: DayLogMode,

    /// Record rest stops as sleeper-berth time
    #[serde(default)]
    pub rest_in_sleeper_berth: bool,

    #[serde(default = "default_fuel_stop_hours")]
    pub fuel_stop_hours: f64,

    #[serde(default = "default_pre_trip_inspection_hours")]
    pub pre_trip_inspection_hours: f64,

    /// Off-duty block charged when a day starts at midnight
    #[serde(default = "default_pre_shift_rest_hours")]
    pub pre_shift_rest_hours: f64,

    /// No new driving at or after this hour of the day
    #[serde(default = "default_driving_cutoff_hour")]
    pub driving_cutoff_hour: f64,
}

fn default_fuel_stop_hours() -> f64 {
    0.5
}

fn default_pre_trip_inspection_hours() -> f64 {
    0.5
}

fn default_pre_shift_rest_hours() -> f64 {
    6.0
}

fn default_driving_cutoff_hour() -> f64 {
    22.0
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            day_log_mode: DayLogMode::default(),
            rest_in_sleeper_berth: false,
            fuel_stop_hours: default_fuel_stop_hours(),
            pre_trip_inspection_hours: default_pre_trip_inspection_hours(),
            pre_shift_rest_hours: default_pre_shift_rest_hours(),
            driving_cutoff_hour: default_driving_cutoff_hour(),
        }
    }
}

impl ScheduleOptions {
    pub fn validate(&self) -> Result<()> {
        let in_day = [
            ("fuel_stop_hours", self.fuel_stop_hours),
            ("pre_trip_inspection_hours", self.pre_trip_inspection_hours),
            ("pre_shift_rest_hours", self.pre_shift_rest_hours),
            ("driving_cutoff_hour", self.driving_cutoff_hour),
        ];
        for (name, value) in in_day {
            if !value.is_finite() || !(0.0..=24.0).contains(&value) {
                return Err(SchedulerError::InvalidLimits(format!(
                    "{} must be within [0, 24], got {}",
                    name, value
                )));
            }
        }
        if self.fuel_stop_hours <= 0.0 {
            return Err(SchedulerError::InvalidLimits(
                "fuel_stop_hours must be positive".to_string(),
            ));
        }
        // A day starting at midnight must leave room to drive
        if self.pre_shift_rest_hours >= self.driving_cutoff_hour {
            return Err(SchedulerError::InvalidLimits(format!(
                "pre_shift_rest_hours ({}) must end before driving_cutoff_hour ({})",
                self.pre_shift_rest_hours, self.driving_cutoff_hour
            )));
        }
        Ok(())
    }
}
