//! Simulation state of the rest stop planner
//!
//! The state is a plain `Copy` value. Each step consumes the current
//! state and returns the next one, so the planner loop never mutates
//! shared counters.

use crate::limits::{HosLimits, ScheduleOptions};

/// Slack for comparing accumulated floating point hours and miles
pub(crate) const EPSILON: f64 = 1e-9;

/// Counters threaded through the forward simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub remaining_daily_driving: f64,
    pub remaining_daily_duty: f64,
    /// Never reset during a trip
    pub remaining_cycle_hours: f64,
    pub miles_since_last_fuel: f64,
    pub miles_traveled: f64,
    pub hours_driven: f64,
    /// Hours since departure, driving and stops included
    pub elapsed_hours: f64,
}

/// What happens at the end of a driving leg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegEnd {
    /// Fuel interval reached
    Fuel,
    /// Daily or cycle limits exhausted
    Rest,
    /// Destination reached
    Arrive,
}

/// One driving leg chosen from the current state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub miles: f64,
    pub hours: f64,
    pub end: LegEnd,
}

impl SimulationState {
    /// Fresh state at departure
    pub fn start(limits: &HosLimits, cycle_hours_used: f64) -> Self {
        Self {
            remaining_daily_driving: limits.max_daily_driving,
            remaining_daily_duty: limits.max_daily_duty,
            remaining_cycle_hours: limits.max_cycle_hours - cycle_hours_used,
            miles_since_last_fuel: 0.0,
            miles_traveled: 0.0,
            hours_driven: 0.0,
            elapsed_hours: 0.0,
        }
    }

    /// Hours that may still be driven before any limit binds
    pub fn drivable_hours(&self) -> f64 {
        self.remaining_daily_driving
            .min(self.remaining_daily_duty)
            .min(self.remaining_cycle_hours)
            .max(0.0)
    }

    pub fn cycle_exhausted(&self) -> bool {
        self.remaining_cycle_hours <= EPSILON
    }

    pub fn arrived(&self, total_miles: f64) -> bool {
        self.miles_traveled >= total_miles - EPSILON
    }

    /// Pick the next leg: fuel first, then finishing, otherwise drive to the limit and rest
    pub fn next_leg(&self, total_miles: f64, limits: &HosLimits) -> Leg {
        let drivable_hours = self.drivable_hours();
        let drivable_miles = limits.miles_for(drivable_hours);
        let remaining_miles = (total_miles - self.miles_traveled).max(0.0);
        let leg_miles = drivable_miles.min(remaining_miles);

        if self.miles_since_last_fuel + leg_miles > limits.fuel_interval_miles + EPSILON {
            let miles = (limits.fuel_interval_miles - self.miles_since_last_fuel).max(0.0);
            return Leg {
                miles,
                hours: limits.hours_for(miles),
                end: LegEnd::Fuel,
            };
        }

        if remaining_miles <= drivable_miles + EPSILON {
            return Leg {
                miles: remaining_miles,
                hours: limits.hours_for(remaining_miles),
                end: LegEnd::Arrive,
            };
        }

        Leg {
            miles: drivable_miles,
            hours: drivable_hours,
            end: LegEnd::Rest,
        }
    }

    /// Advance every counter by a driving leg
    pub fn drive(self, leg: &Leg) -> Self {
        Self {
            remaining_daily_driving: (self.remaining_daily_driving - leg.hours).max(0.0),
            remaining_daily_duty: (self.remaining_daily_duty - leg.hours).max(0.0),
            remaining_cycle_hours: (self.remaining_cycle_hours - leg.hours).max(0.0),
            miles_since_last_fuel: self.miles_since_last_fuel + leg.miles,
            miles_traveled: self.miles_traveled + leg.miles,
            hours_driven: self.hours_driven + leg.hours,
            elapsed_hours: self.elapsed_hours + leg.hours,
        }
    }

    /// Fuel stop: resets the fuel odometer and charges on-duty time to the duty window and cycle
    pub fn refuel(self, options: &ScheduleOptions) -> Self {
        Self {
            miles_since_last_fuel: 0.0,
            remaining_daily_duty: (self.remaining_daily_duty - options.fuel_stop_hours).max(0.0),
            remaining_cycle_hours: (self.remaining_cycle_hours - options.fuel_stop_hours).max(0.0),
            elapsed_hours: self.elapsed_hours + options.fuel_stop_hours,
            ..self
        }
    }

    /// Rest stop: restores the daily counters, the cycle stays as it is
    pub fn rest(self, limits: &HosLimits) -> Self {
        Self {
            remaining_daily_driving: limits.max_daily_driving,
            remaining_daily_duty: limits.max_daily_duty,
            elapsed_hours: self.elapsed_hours + limits.min_rest_period,
            ..self
        }
    }
}
