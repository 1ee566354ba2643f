//! Calendar date helpers for puzzle day assignment.
//!
//! Every puzzle in the window carries two date strings:
//!
//! | Field  | Pattern       | Example       |
//! |--------|---------------|---------------|
//! | `t`    | `Mon D, YYYY` | `Jan 4, 2024` |
//! | `date` | `YYYY-MM-DD`  | `2024-01-04`  |
//!
//! The display pattern is fixed: English month abbreviations, day without
//! padding, four-digit year. It does not depend on the host locale, so a pack
//! built on a CI runner matches one built on a laptop.
//!
//! Dates are plain calendar dates (`NaiveDate`) with no time-of-day, so the
//! day arithmetic is exact and unaffected by daylight-saving shifts.

use chrono::{Days, NaiveDate};
use thiserror::Error;

/// `strftime` pattern for the human-readable `t` field.
const DISPLAY_FORMAT: &str = "%b %-d, %Y";

/// `strftime` pattern for the `date` field and all date inputs.
const ISO_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum DateError {
    #[error("Invalid date '{input}' (expected YYYY-MM-DD): {source}")]
    Parse {
        input: String,
        source: chrono::ParseError,
    },
    #[error("Date out of range: {epoch} + {index} days")]
    Overflow { epoch: NaiveDate, index: usize },
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(input.trim(), ISO_FORMAT).map_err(|source| DateError::Parse {
        input: input.to_string(),
        source,
    })
}

/// Format a date as `Mon D, YYYY` (e.g. `Jan 4, 2024`).
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Format a date as `YYYY-MM-DD`.
pub fn iso_date(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// The calendar date assigned to the puzzle at `index`: `epoch + index` days.
pub fn date_for_index(epoch: NaiveDate, index: usize) -> Result<NaiveDate, DateError> {
    epoch
        .checked_add_days(Days::new(index as u64))
        .ok_or(DateError::Overflow { epoch, index })
}

/// Whole days from `epoch` to `today`. Negative when `today` precedes the epoch.
pub fn days_since_epoch(epoch: NaiveDate, today: NaiveDate) -> i64 {
    today.signed_duration_since(epoch).num_days()
}
