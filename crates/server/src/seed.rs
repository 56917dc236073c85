// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Startup seeding of the employee directory and project catalog.
//!
//! The seed file is JSON:
//!
//! ```json
//! {
//!   "employees": [
//!     { "name": "Morgan", "email": "morgan@example.com", "role": "MANAGER" },
//!     { "name": "Alice", "email": "alice@example.com", "role": "EMPLOYEE",
//!       "manager_email": "morgan@example.com" }
//!   ],
//!   "projects": [ { "name": "Atlas", "status": "ACTIVE" } ]
//! }
//! ```
//!
//! Managers must appear before their reports. Employees whose email is
//! already in the directory are skipped, so reseeding a file database is
//! harmless.

use serde::Deserialize;
use skillbridge_domain::{DomainError, Employee, EmployeeRole, Project, ProjectStatus};
use skillbridge_persistence::{Persistence, PersistenceError};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// One directory entry in the seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEmployee {
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// `EMPLOYEE`, `MANAGER` or `HR`.
    pub role: String,
    /// Email of the direct manager, if any.
    #[serde(default)]
    pub manager_email: Option<String>,
}

/// One catalog entry in the seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedProject {
    /// Project name.
    pub name: String,
    /// Project status, `ACTIVE` when omitted.
    #[serde(default)]
    pub status: Option<String>,
}

/// Contents of a seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    /// Directory entries, managers first.
    #[serde(default)]
    pub employees: Vec<SeedEmployee>,
    /// Catalog entries.
    #[serde(default)]
    pub projects: Vec<SeedProject>,
}

/// What a seeding run wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Employees inserted.
    pub employees_created: usize,
    /// Employees skipped because their email already existed.
    pub employees_skipped: usize,
    /// Projects inserted.
    pub projects_created: usize,
    /// Projects skipped because their name already existed.
    pub projects_skipped: usize,
}

/// Errors raised while seeding.
#[derive(Debug)]
pub enum SeedError {
    /// The seed file could not be read.
    Io(std::io::Error),
    /// The seed file is not valid JSON of the expected shape.
    Parse(serde_json::Error),
    /// A role or status value is unknown.
    InvalidValue(DomainError),
    /// A `manager_email` does not match an earlier employee.
    UnknownManager {
        /// The employee being seeded.
        email: String,
        /// The missing manager.
        manager_email: String,
    },
    /// The database rejected a write.
    Persistence(PersistenceError),
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Failed to read seed file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse seed file: {e}"),
            Self::InvalidValue(e) => write!(f, "Invalid seed value: {e}"),
            Self::UnknownManager {
                email,
                manager_email,
            } => write!(
                f,
                "Employee '{email}' names unknown manager '{manager_email}'"
            ),
            Self::Persistence(e) => write!(f, "Failed to store seed data: {e}"),
        }
    }
}

impl std::error::Error for SeedError {}

impl From<std::io::Error> for SeedError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<DomainError> for SeedError {
    fn from(err: DomainError) -> Self {
        Self::InvalidValue(err)
    }
}

impl From<PersistenceError> for SeedError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

/// Reads and applies a seed file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if applying
/// it fails.
pub fn load_seed_file<P: AsRef<Path>>(
    persistence: &mut Persistence,
    path: P,
) -> Result<SeedSummary, SeedError> {
    let raw: String = std::fs::read_to_string(path.as_ref())?;
    let data: SeedData = serde_json::from_str(&raw)?;
    info!(
        path = %path.as_ref().display(),
        employees = data.employees.len(),
        projects = data.projects.len(),
        "Loading seed file"
    );
    apply_seed(persistence, &data)
}

/// Writes seed data into the directory and catalog.
///
/// # Errors
///
/// Returns an error for unknown roles, statuses or managers, or if the
/// database rejects a write.
pub fn apply_seed(
    persistence: &mut Persistence,
    data: &SeedData,
) -> Result<SeedSummary, SeedError> {
    let mut summary: SeedSummary = SeedSummary::default();

    for entry in &data.employees {
        if persistence.find_employee_by_email(&entry.email)?.is_some() {
            debug!(email = %entry.email, "Employee already present, skipping");
            summary.employees_skipped += 1;
            continue;
        }

        let role: EmployeeRole = EmployeeRole::from_str(&entry.role)?;
        let manager_id: Option<i64> = match &entry.manager_email {
            Some(manager_email) => Some(
                persistence
                    .find_employee_by_email(manager_email)?
                    .and_then(|m| m.employee_id)
                    .ok_or_else(|| SeedError::UnknownManager {
                        email: entry.email.clone(),
                        manager_email: manager_email.clone(),
                    })?,
            ),
            None => None,
        };

        persistence.create_employee(&Employee::new(
            entry.name.clone(),
            entry.email.clone(),
            role,
            manager_id,
        ))?;
        summary.employees_created += 1;
    }

    for entry in &data.projects {
        let status: ProjectStatus = match &entry.status {
            Some(status) => ProjectStatus::from_str(status)?,
            None => ProjectStatus::Active,
        };
        match persistence.create_project(&Project::new(entry.name.clone(), status)) {
            Ok(_) => summary.projects_created += 1,
            Err(err) if err.is_constraint() => {
                debug!(name = %entry.name, "Project already present, skipping");
                summary.projects_skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    info!(
        employees_created = summary.employees_created,
        employees_skipped = summary.employees_skipped,
        projects_created = summary.projects_created,
        projects_skipped = summary.projects_skipped,
        "Seed data applied"
    );
    Ok(summary)
}
