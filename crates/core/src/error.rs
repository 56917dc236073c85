// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use skillbridge_domain::{DomainError, ErrorKind};

/// Errors that can occur while executing commands and queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The backing store failed.
    Store(String),
    /// The command was routed to the wrong entry point.
    UnsupportedCommand(&'static str),
}

impl CoreError {
    /// Returns the domain error kind, or `None` for infrastructure failures.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::DomainViolation(err) => Some(err.kind()),
            Self::Store(_) | Self::UnsupportedCommand(_) => None,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Store(msg) => write!(f, "Store failure: {msg}"),
            Self::UnsupportedCommand(name) => {
                write!(f, "Command {name} is not supported here")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
