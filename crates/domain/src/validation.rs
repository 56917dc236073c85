// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Calendar date format used for storage and transport.
pub const ISO_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Validates a rejection reason and returns it trimmed.
///
/// # Errors
///
/// Returns `DomainError::BlankRejectionReason` if the reason is empty or
/// whitespace only.
pub fn validate_rejection_reason(reason: &str) -> Result<String, DomainError> {
    let trimmed: &str = reason.trim();
    if trimmed.is_empty() {
        return Err(DomainError::BlankRejectionReason);
    }
    Ok(trimmed.to_string())
}

/// Validates that `end_date`, when present, is not before `start_date`.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` if the range is inverted.
pub fn validate_date_range(start_date: Date, end_date: Option<Date>) -> Result<(), DomainError> {
    match end_date {
        Some(end_date) if end_date < start_date => Err(DomainError::InvalidDateRange {
            start_date,
            end_date,
        }),
        _ => Ok(()),
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_iso_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), ISO_DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_iso_date(date: Date) -> String {
    // Four-digit years always fit the format
    date.format(ISO_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Trims optional free text, mapping blank input to `None`.
#[must_use]
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
