//! Rest stop planner
//!
//! Walks the route's total distance forward in time and emits fuel and
//! rest stops wherever the daily driving, daily duty, cycle or fuel
//! limits bind.

mod lookup;
mod state;


pub use lookup::{
    BoundedLookup, LocationLookup, PassthroughLookup, UnavailableLookup, DEFAULT_LOOKUP_TIMEOUT,
};
pub use state::{Leg, LegEnd, SimulationState};

use crate::error::{Result, SchedulerError};
use crate::limits::{HosLimits, ScheduleOptions};
use crate::models::{
    CycleHalt, RouteEndpoints, StopEvent, StopKind, StopLocation, TripRequest, TripTimeline,
};
use crate::timeutil::{hours_to_duration, truncate_to_minute};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Plans fuel and rest stops for a single trip
pub struct RestStopPlanner {
    limits: HosLimits,
    options: ScheduleOptions,
    lookup: Arc<dyn LocationLookup>,
}

impl RestStopPlanner {
    pub fn new(
        limits: HosLimits,
        options: ScheduleOptions,
        lookup: Arc<dyn LocationLookup>,
    ) -> Self {
        Self {
            limits,
            options,
            lookup,
        }
    }

    /// Planner with default limits that labels stops with their route position
    pub fn with_defaults() -> Self {
        Self::new(
            HosLimits::default(),
            ScheduleOptions::default(),
            Arc::new(PassthroughLookup),
        )
    }

    pub fn limits(&self) -> &HosLimits {
        &self.limits
    }

    /// Reject requests the simulation cannot start from
    pub fn validate(&self, request: &TripRequest) -> Result<()> {
        if !request.total_miles.is_finite() || request.total_miles <= 0.0 {
            return Err(SchedulerError::InvalidTripInput(format!(
                "total_miles must be a positive number, got {}",
                request.total_miles
            )));
        }

        if !request.total_duration_hours.is_finite() || request.total_duration_hours < 0.0 {
            return Err(SchedulerError::InvalidTripInput(format!(
                "total_duration_hours must be non-negative, got {}",
                request.total_duration_hours
            )));
        }

        if !request.cycle_hours_used.is_finite() || request.cycle_hours_used < 0.0 {
            return Err(SchedulerError::InvalidTripInput(format!(
                "cycle_hours_used must be non-negative, got {}",
                request.cycle_hours_used
            )));
        }

        if let Some(route) = &request.route {
            if !route.is_valid() {
                return Err(SchedulerError::InvalidTripInput(
                    "route coordinates must be finite longitude/latitude pairs".to_string(),
                ));
            }
        }

        if request.cycle_hours_used >= self.limits.max_cycle_hours {
            return Err(SchedulerError::InsufficientCycleHours {
                used: request.cycle_hours_used,
                max: self.limits.max_cycle_hours,
            });
        }

        Ok(())
    }

    /// Simulate the trip and return its timeline
    pub fn plan(&self, request: &TripRequest) -> Result<TripTimeline> {
        self.limits.validate()?;
        self.options.validate()?;
        self.validate(request)?;

        let total_miles = request.total_miles;
        let departure = truncate_to_minute(request.departure_time);
        let at = |elapsed_hours: f64| departure + hours_to_duration(elapsed_hours);

        let mut state = SimulationState::start(&self.limits, request.cycle_hours_used);
        let mut stops = Vec::new();
        let mut cycle_halt = None;

        while !state.arrived(total_miles) {
            let leg = state.next_leg(total_miles, &self.limits);
            let leg_start_miles = state.miles_traveled;
            state = state.drive(&leg);

            debug!(
                miles = leg.miles,
                hours = leg.hours,
                end = ?leg.end,
                miles_traveled = state.miles_traveled,
                "Simulated driving leg"
            );

            match leg.end {
                LegEnd::Arrive => {}
                LegEnd::Fuel => {
                    let arrival = at(state.elapsed_hours);
                    state = state.refuel(&self.options);
                    stops.push(StopEvent {
                        location: self.locate(
                            StopKind::Fuel,
                            request.route.as_ref(),
                            leg_start_miles,
                            total_miles,
                        ),
                        arrival_time: arrival,
                        departure_time: at(state.elapsed_hours),
                        rest_duration_hours: self.options.fuel_stop_hours,
                        is_fuel_stop: true,
                        is_sleeper_berth: false,
                        odometer_miles: state.miles_traveled,
                    });
                }
                LegEnd::Rest => {
                    if state.cycle_exhausted() {
                        let halt = CycleHalt {
                            at: at(state.elapsed_hours),
                            miles_traveled: state.miles_traveled,
                            miles_remaining: total_miles - state.miles_traveled,
                        };
                        warn!(
                            miles_traveled = halt.miles_traveled,
                            miles_remaining = halt.miles_remaining,
                            "Cycle hours exhausted before arrival, halting simulation"
                        );
                        cycle_halt = Some(halt);
                        break;
                    }

                    let arrival = at(state.elapsed_hours);
                    state = state.rest(&self.limits);
                    stops.push(StopEvent {
                        location: self.locate(
                            StopKind::Rest,
                            request.route.as_ref(),
                            leg_start_miles,
                            total_miles,
                        ),
                        arrival_time: arrival,
                        departure_time: at(state.elapsed_hours),
                        rest_duration_hours: self.limits.min_rest_period,
                        is_fuel_stop: false,
                        is_sleeper_berth: self.options.rest_in_sleeper_berth,
                        odometer_miles: state.miles_traveled,
                    });
                }
            }
        }

        let timeline = TripTimeline {
            total_miles,
            total_driving_hours: state.hours_driven,
            estimated_duration_hours: request.total_duration_hours,
            departure_time: departure,
            estimated_arrival: at(state.elapsed_hours),
            stops,
            cycle_halt,
        };

        info!(
            total_miles = timeline.total_miles,
            total_driving_hours = timeline.total_driving_hours,
            stops = timeline.stops.len(),
            complete = timeline.is_complete(),
            "Planned trip timeline"
        );

        Ok(timeline)
    }

    /// Resolve a stop location, falling back to a sentinel label
    fn locate(
        &self,
        kind: StopKind,
        route: Option<&RouteEndpoints>,
        miles_traveled: f64,
        total_miles: f64,
    ) -> StopLocation {
        let Some(route) = route else {
            return StopLocation::Unknown(kind.fallback_label());
        };

        let near = route.position_at(miles_traveled, total_miles);
        match self.lookup.lookup(kind.query(), near) {
            Ok(coord) => StopLocation::Resolved(coord),
            Err(e) => {
                warn!(
                    category = kind.query(),
                    near = %near,
                    error = %e,
                    "Stop location lookup failed, using fallback"
                );
                StopLocation::Unknown(kind.fallback_label())
            }
        }
    }
}
