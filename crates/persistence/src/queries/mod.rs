// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Rows are decoded into domain values here; a row that fails to decode is
//! reported as `PersistenceError::InvalidStoredValue` rather than skipped.

pub mod assignments;
pub mod audit;
pub mod directory;
pub mod requests;

use skillbridge_domain::{DomainError, parse_iso_date};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};

use crate::error::PersistenceError;

/// Parses a stored enum value such as a status or role.
pub(crate) fn decode<T>(value: &str) -> Result<T, PersistenceError>
where
    T: FromStr<Err = DomainError>,
{
    T::from_str(value).map_err(|e| PersistenceError::InvalidStoredValue(e.to_string()))
}

/// Parses a stored RFC 3339 timestamp.
pub(crate) fn decode_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::InvalidStoredValue(format!("timestamp '{value}': {e}")))
}

pub(crate) fn decode_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(decode_timestamp).transpose()
}

/// Parses a stored `YYYY-MM-DD` date.
pub(crate) fn decode_date(value: &str) -> Result<Date, PersistenceError> {
    parse_iso_date(value).map_err(|e| PersistenceError::InvalidStoredValue(e.to_string()))
}
