//! Configuration resolution.
//!
//! This module validates the user-supplied inputs of a run (requested total
//! and cursor date), derives the defaults for anything left unset, and loads
//! the optional TOML config file.

mod error;
mod file;

pub use error::ConfigError;
pub use file::FileConfig;

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;

/// Records requested when no total is given.
pub const DEFAULT_TOTAL: usize = 100;

/// How far back the default cursor reaches.
const DEFAULT_LOOKBACK_MONTHS: u32 = 3;

/// Timestamp format of the default cursor, e.g. `2024-09-15T12:00:00.000000+00:00`.
const CURSOR_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f+00:00";

/// Resolves the requested total.
///
/// `None` falls back to [`DEFAULT_TOTAL`].
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTotal`] if an explicit total is zero or negative.
pub fn resolve_total(total: Option<i64>) -> Result<usize, ConfigError> {
    match total {
        None => Ok(DEFAULT_TOTAL),
        Some(value) if value <= 0 => Err(ConfigError::InvalidTotal { value }),
        Some(value) => usize::try_from(value).map_err(|_| ConfigError::InvalidTotal { value }),
    }
}

/// Resolves the cursor date.
///
/// An unset or blank date falls back to three months before `now`. An explicit
/// date is kept verbatim once it parses as an RFC 3339 timestamp, a naive
/// `YYYY-MM-DDTHH:MM:SS` timestamp, or a plain `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDate`] if an explicit date does not parse.
pub fn resolve_date(date: Option<&str>, now: DateTime<Utc>) -> Result<String, ConfigError> {
    let date = match date.map(str::trim) {
        None | Some("") => return Ok(default_cursor_date(now)),
        Some(date) => date,
    };

    let valid = DateTime::parse_from_rfc3339(date).is_ok()
        || NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok();

    if valid {
        Ok(date.to_string())
    } else {
        Err(ConfigError::InvalidDate {
            value: date.to_string(),
        })
    }
}

/// Default cursor: three months before `now`.
#[must_use]
pub fn default_cursor_date(now: DateTime<Utc>) -> String {
    now.checked_sub_months(Months::new(DEFAULT_LOOKBACK_MONTHS))
        .unwrap_or(now)
        .format(CURSOR_FORMAT)
        .to_string()
}

/// Output file name for a run started at `started_at`.
#[must_use]
pub fn output_filename<Tz>(started_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    started_at
        .format("commits_%Y-%m-%d_%H-%M-%S.json")
        .to_string()
}
