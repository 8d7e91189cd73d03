//! `hos limits`

use anyhow::Result;
use hos_lib::limits::HosLimits;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{print_heading, print_json, print_table, OutputFormat};

#[derive(Tabled)]
struct LimitRow {
    #[tabled(rename = "Limit")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn rows(limits: &HosLimits) -> Vec<LimitRow> {
    vec![
        LimitRow {
            name: "Max daily driving",
            value: format!("{}h", limits.max_daily_driving),
        },
        LimitRow {
            name: "Max daily on-duty window",
            value: format!("{}h", limits.max_daily_duty),
        },
        LimitRow {
            name: "Min rest period",
            value: format!("{}h", limits.min_rest_period),
        },
        LimitRow {
            name: "Cycle cap",
            value: format!("{}h / {} days", limits.max_cycle_hours, limits.cycle_days),
        },
        LimitRow {
            name: "Fuel interval",
            value: format!("{} mi", limits.fuel_interval_miles),
        },
        LimitRow {
            name: "Pickup / dropoff time",
            value: format!("{}h each", limits.pickup_dropoff_hours),
        },
        LimitRow {
            name: "Average speed",
            value: format!("{} mph", limits.avg_speed_mph),
        },
    ]
}

/// Show the local limits, or the server's when a client is given
pub async fn show_limits(client: Option<&ApiClient>, format: OutputFormat) -> Result<()> {
    let limits = match client {
        Some(client) => client.limits().await?,
        None => HosLimits::default(),
    };

    match format {
        OutputFormat::Json => print_json(&limits)?,
        OutputFormat::Table => {
            print_heading("Hours-of-Service Limits");
            print_table(rows(&limits));
        }
    }

    Ok(())
}
