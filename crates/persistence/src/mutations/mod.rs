// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Every function here runs on the connection it is handed. Callers that
//! need atomicity wrap them in a transaction; see `Persistence::serialized`.

pub mod assignments;
pub mod audit;
pub mod directory;
pub mod requests;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::PersistenceError;

/// Formats a timestamp as RFC 3339 for storage.
pub(crate) fn encode_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::Serialization(format!("timestamp: {e}")))
}

pub(crate) fn encode_optional_timestamp(
    value: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    value.map(encode_timestamp).transpose()
}
