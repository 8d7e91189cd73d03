//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use hos_lib::models::{DutyStatus, StopLocation};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Parse a format name from the config file
    pub fn from_config(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, true).ok()
    }
}

/// Print rows as a rounded table
pub fn print_table<T: Tabled>(rows: Vec<T>) {
    if rows.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    println!("{}", Table::new(rows).with(Style::rounded()));
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Bold heading with an underline of the same width
pub fn print_heading(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(60));
}

/// Fractional hours with two decimals
pub fn format_hours(hours: f64) -> String {
    format!("{:.2}h", hours)
}

/// Hour of day as a wall clock, 24.0 renders as 24:00
pub fn format_clock(hour: f64) -> String {
    let minutes = (hour * 60.0).round() as i64;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

pub fn format_miles(miles: f64) -> String {
    format!("{:.1} mi", miles)
}

pub fn format_location(location: &StopLocation) -> String {
    match location {
        StopLocation::Resolved(coord) => coord.to_string(),
        StopLocation::Unknown(label) => label.dimmed().to_string(),
    }
}

/// Color a duty status the way paper logs group them
pub fn color_status(status: DutyStatus) -> String {
    let label = status.as_str();
    match status {
        DutyStatus::OffDuty => label.green().to_string(),
        DutyStatus::Sleeper => label.blue().to_string(),
        DutyStatus::Driving => label.red().to_string(),
        DutyStatus::OnDuty => label.yellow().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(6.5), "06:30");
        assert_eq!(format_clock(17.318181), "17:19");
        assert_eq!(format_clock(24.0), "24:00");
    }

    #[test]
    fn test_format_hours_and_miles() {
        assert_eq!(format_hours(10.818181), "10.82h");
        assert_eq!(format_miles(605.0), "605.0 mi");
    }

    #[test]
    fn test_output_format_from_config() {
        assert_eq!(OutputFormat::from_config("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_config("TABLE"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_config("yaml"), None);
    }
}
