//! Trip preferences and the validated date range derived from them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::TravelAgentError;

/// Formats accepted for `start_date` / `end_date`
///
/// ISO dates come from API clients; the long form is what the mobile app's
/// date picker renders (`Jun 01, 2024`).
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%b %d, %Y"];

/// Preferences submitted to `/generate-plan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelPreferences {
    /// Where the traveller wants to go
    pub destination: String,
    /// Where the traveller starts from
    #[serde(default)]
    pub present_location: String,
    /// First day of the trip, unparsed
    pub start_date: String,
    /// Last day of the trip, unparsed
    pub end_date: String,
    /// Budget label such as "budget", "medium" or "luxury"
    pub budget: String,
    /// Ordered travel styles, e.g. culture, food
    #[serde(default)]
    pub travel_styles: Vec<String>,
}

impl TravelPreferences {
    /// Parse and check the trip dates
    pub fn trip_dates(&self) -> crate::Result<TripDates> {
        let start = parse_date("start_date", &self.start_date)?;
        let end = parse_date("end_date", &self.end_date)?;
        TripDates::new(start, end)
    }

    /// Travel styles as they appear in prompts
    #[must_use]
    pub fn joined_styles(&self) -> String {
        self.travel_styles.join(", ")
    }
}

/// A trip's first and last day, `end >= start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripDates {
    start: NaiveDate,
    end: NaiveDate,
}

impl TripDates {
    /// Build a date range, rejecting trips that end before they start
    pub fn new(start: NaiveDate, end: NaiveDate) -> crate::Result<Self> {
        if end < start {
            return Err(TravelAgentError::validation(format!(
                "end_date {end} is before start_date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whole days between start and end
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

fn parse_date(field: &str, value: &str) -> crate::Result<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| {
            TravelAgentError::validation(format!(
                "{field} '{value}' is not a valid date (expected YYYY-MM-DD or 'Mon DD, YYYY')"
            ))
        })
}
