//! Trip preferences and the defaults a new plan starts from

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Result, TravelPlannerError};

/// Everything a traveller tells us about the trip
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripPreferences {
    /// Origin location code, e.g. `HYD`
    pub source: String,
    /// Destination location code, e.g. `VTZ`
    pub destination: String,
    /// First day of the trip (`YYYY-MM-DD`)
    pub start_date: String,
    /// Last day of the trip (`YYYY-MM-DD`)
    pub end_date: String,
    /// Free-form budget, usually a number
    pub budget: String,
    pub travelers: u32,
    pub interests: String,
    #[serde(default)]
    pub include_transportation: bool,
}

/// Initial values for a fresh set of preferences
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripDefaults {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_destination")]
    pub destination: String,
    #[serde(default = "default_budget")]
    pub budget: String,
    #[serde(default = "default_travelers")]
    pub travelers: u32,
    #[serde(default = "default_interests")]
    pub interests: String,
    #[serde(default)]
    pub include_transportation: bool,
}

fn default_source() -> String {
    "HYD".to_string()
}

fn default_destination() -> String {
    "VTZ".to_string()
}

fn default_budget() -> String {
    "5000".to_string()
}

fn default_travelers() -> u32 {
    1
}

fn default_interests() -> String {
    "BEACHES".to_string()
}

impl Default for TripDefaults {
    fn default() -> Self {
        Self {
            source: default_source(),
            destination: default_destination(),
            budget: default_budget(),
            travelers: default_travelers(),
            interests: default_interests(),
            include_transportation: false,
        }
    }
}

impl TripPreferences {
    /// Prefill preferences from configured defaults for the given dates
    #[must_use]
    pub fn from_defaults(defaults: &TripDefaults, start_date: &str, end_date: &str) -> Self {
        Self {
            source: defaults.source.clone(),
            destination: defaults.destination.clone(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            budget: defaults.budget.clone(),
            travelers: defaults.travelers,
            interests: defaults.interests.clone(),
            include_transportation: defaults.include_transportation,
        }
    }

    /// Check the fields a plan cannot be built without
    pub fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            return Err(TravelPlannerError::validation("Source location cannot be empty"));
        }
        if self.destination.trim().is_empty() {
            return Err(TravelPlannerError::validation("Destination cannot be empty"));
        }
        if self.travelers == 0 {
            return Err(TravelPlannerError::validation(
                "Number of travelers must be at least 1",
            ));
        }

        let start = parse_date("startDate", &self.start_date)?;
        let end = parse_date("endDate", &self.end_date)?;
        if end < start {
            return Err(TravelPlannerError::validation(format!(
                "End date {end} is before start date {start}"
            )));
        }
        Ok(())
    }
}

/// Parse an ISO 8601 calendar date
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        TravelPlannerError::validation(format!("{field} must be a YYYY-MM-DD date, got '{value}'"))
    })
}
