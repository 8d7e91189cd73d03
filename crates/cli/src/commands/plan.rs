//! `hos plan`

use anyhow::{Context, Result};
use colored::Colorize;
use hos_lib::limits::{DayLogMode, HosLimits, ScheduleOptions};
use hos_lib::models::{DayLog, StopEvent, TripRequest, TripSchedule};
use hos_lib::observability::StructuredLogger;
use hos_lib::planner::PassthroughLookup;
use hos_lib::TripScheduler;
use std::sync::Arc;
use tabled::Tabled;
use tracing::debug;

use crate::client::ApiClient;
use crate::output::{
    color_status, format_clock, format_hours, format_location, format_miles, print_heading,
    print_info, print_json, print_success, print_table, print_warning, OutputFormat,
};

#[derive(Tabled)]
struct StopRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Arrival")]
    arrival: String,
    #[tabled(rename = "Departure")]
    departure: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Odometer")]
    odometer: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl StopRow {
    fn new(index: usize, stop: &StopEvent) -> Self {
        let kind = if stop.is_fuel_stop {
            "fuel".yellow().to_string()
        } else if stop.is_sleeper_berth {
            "rest (sleeper)".blue().to_string()
        } else {
            "rest".green().to_string()
        };
        Self {
            index: index + 1,
            kind,
            arrival: stop.arrival_time.format("%Y-%m-%d %H:%M").to_string(),
            departure: stop.departure_time.format("%Y-%m-%d %H:%M").to_string(),
            duration: format_hours(stop.rest_duration_hours),
            odometer: format_miles(stop.odometer_miles),
            location: format_location(&stop.location),
        }
    }
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Off duty")]
    off_duty: String,
    #[tabled(rename = "Sleeper")]
    sleeper: String,
    #[tabled(rename = "Driving")]
    driving: String,
    #[tabled(rename = "On duty")]
    on_duty: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Miles")]
    miles: String,
}

impl From<&DayLog> for DayRow {
    fn from(day: &DayLog) -> Self {
        Self {
            date: day.date.to_string(),
            off_duty: format_hours(day.off_duty_hours),
            sleeper: format_hours(day.sleeper_hours),
            driving: format_hours(day.driving_hours),
            on_duty: format_hours(day.on_duty_hours),
            total: format_hours(day.total_hours),
            miles: format_miles(day.total_miles),
        }
    }
}

/// One line per day: `00:00-06:00 off_duty | 06:00-06:30 on_duty | ...`
fn entry_line(day: &DayLog) -> String {
    day.entries
        .iter()
        .map(|e| {
            format!(
                "{}-{} {}",
                format_clock(e.start_hour),
                format_clock(e.end_hour),
                color_status(e.status)
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Where the schedule is computed
pub enum Planner<'a> {
    Local(ScheduleOptions),
    Remote(&'a ApiClient),
}

pub async fn plan_trip(
    planner: Planner<'_>,
    request: TripRequest,
    format: OutputFormat,
) -> Result<()> {
    let schedule = match planner {
        Planner::Local(options) => {
            debug!(mode = ?options.day_log_mode, "Planning locally");
            let scheduler = TripScheduler::new(
                HosLimits::default(),
                options,
                Arc::new(PassthroughLookup),
                StructuredLogger::new("hos-cli"),
            );
            scheduler
                .schedule(&request)
                .context("Trip could not be scheduled")?
        }
        Planner::Remote(client) => client.plan_trip(&request).await?,
    };

    match format {
        OutputFormat::Json => print_json(&schedule)?,
        OutputFormat::Table => print_schedule(&schedule),
    }

    Ok(())
}

fn print_schedule(schedule: &TripSchedule) {
    let timeline = &schedule.timeline;

    print_heading("Trip Schedule");
    println!("Departure:              {}", timeline.departure_time.format("%Y-%m-%d %H:%M"));
    println!("Arrival:                {}", timeline.estimated_arrival.format("%Y-%m-%d %H:%M"));
    println!("Distance:               {}", format_miles(timeline.total_miles));
    println!("Driving time:           {}", format_hours(timeline.total_driving_hours));
    println!(
        "Stops:                  {} fuel, {} rest",
        timeline.fuel_stops().count(),
        timeline.rest_stops().count()
    );
    println!();

    match &timeline.cycle_halt {
        Some(halt) => print_warning(&format!(
            "Cycle hours exhausted at {} after {}; {} left to drive",
            halt.at.format("%Y-%m-%d %H:%M"),
            format_miles(halt.miles_traveled),
            format_miles(halt.miles_remaining)
        )),
        None => print_success("Trip completes within the cycle"),
    }
    println!();

    if timeline.stops.is_empty() {
        print_info("No fuel or rest stops needed");
    } else {
        println!("{}", "Stops".bold());
        print_table(
            timeline
                .stops
                .iter()
                .enumerate()
                .map(|(i, s)| StopRow::new(i, s))
                .collect(),
        );
    }
    println!();

    println!("{}", "Daily Logs".bold());
    print_table(schedule.day_logs.iter().map(DayRow::from).collect());
    for day in &schedule.day_logs {
        println!("{}  {}", day.date.to_string().dimmed(), entry_line(day));
    }

    for mismatch in &schedule.diagnostics {
        print_warning(&format!(
            "Log for {} totals {} instead of 24h",
            mismatch.date,
            format_hours(mismatch.total_hours)
        ));
    }
}

/// Options for a local plan from the CLI flags and config
pub fn local_options(mode: DayLogMode, sleeper_berth: bool) -> ScheduleOptions {
    ScheduleOptions {
        day_log_mode: mode,
        rest_in_sleeper_berth: sleeper_berth,
        ..ScheduleOptions::default()
    }
}
