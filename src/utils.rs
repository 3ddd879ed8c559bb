//! Utility functions for parsing console input

use crate::error::{LeagueError, Result};
use chrono::{Local, NaiveDate};

/// Date format accepted for match dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a numeric record id, naming the record kind in the error
pub fn parse_id(input: &str, kind: &str) -> Result<i64> {
    input.trim().parse::<i64>().map_err(|_| {
        LeagueError::validation(format!("Invalid {} ID - must be a number", kind)).into()
    })
}

/// Parse a `YYYY-MM-DD` date; an empty answer means "no date"
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map(Some)
        .map_err(|_| LeagueError::validation("Invalid date format. Use YYYY-MM-DD").into())
}

/// Parse a match date for scheduling, rejecting dates before `today`
pub fn parse_schedule_date(input: &str, today: NaiveDate) -> Result<Option<NaiveDate>> {
    let date = parse_date(input)?;
    if let Some(date) = date {
        if date < today {
            return Err(LeagueError::validation("Date cannot be in the past").into());
        }
    }
    Ok(date)
}

/// Format an optional date for display
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format(DATE_FORMAT).to_string(),
        None => "TBD".to_string(),
    }
}
