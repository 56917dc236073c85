// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Cost treatment of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingType {
    /// Time is billed to a client.
    Billable,
    /// Internal investment work.
    Investment,
}

impl BillingType {
    /// Returns the string representation of the billing type.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Billable => "BILLABLE",
            Self::Investment => "INVESTMENT",
        }
    }
}

impl FromStr for BillingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BILLABLE" => Ok(Self::Billable),
            "INVESTMENT" => Ok(Self::Investment),
            _ => Err(DomainError::InvalidBillingType(s.to_string())),
        }
    }
}

impl std::fmt::Display for BillingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a project in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// Approved but not started.
    Planned,
    /// Running; accepts assignments.
    Active,
    /// Paused.
    OnHold,
    /// Finished.
    Completed,
}

impl ProjectStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "PLANNED",
            Self::Active => "ACTIVE",
            Self::OnHold => "ON_HOLD",
            Self::Completed => "COMPLETED",
        }
    }

    /// Returns true if employees may request allocation to a project in this status.
    #[must_use]
    pub const fn accepts_requests(&self) -> bool {
        matches!(self, Self::Planned | Self::Active)
    }
}

impl FromStr for ProjectStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANNED" => Ok(Self::Planned),
            "ACTIVE" => Ok(Self::Active),
            "ON_HOLD" => Ok(Self::OnHold),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidProjectStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Organizational role recorded in the employee directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeRole {
    /// Individual contributor.
    Employee,
    /// People manager; triages requests from direct reports.
    Manager,
    /// Human resources; final approver.
    Hr,
}

impl EmployeeRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::Manager => "MANAGER",
            Self::Hr => "HR",
        }
    }
}

impl FromStr for EmployeeRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EMPLOYEE" => Ok(Self::Employee),
            "MANAGER" => Ok(Self::Manager),
            "HR" => Ok(Self::Hr),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Share of an employee's capacity committed to one assignment.
///
/// Always within `1..=100`. Defaults to full allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct AllocationPercent(u8);

impl AllocationPercent {
    /// Full allocation.
    pub const FULL: Self = Self(100);

    /// Creates a validated allocation percent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAllocationPercent` if the value is not in `1..=100`.
    pub fn new(value: i64) -> Result<Self, DomainError> {
        match u8::try_from(value) {
            Ok(percent) if (1..=100).contains(&percent) => Ok(Self(percent)),
            _ => Err(DomainError::InvalidAllocationPercent(value)),
        }
    }

    /// Returns the percentage.
    #[must_use]
    pub fn value(&self) -> u32 {
        u32::from(self.0)
    }
}

impl Default for AllocationPercent {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<i64> for AllocationPercent {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AllocationPercent> for u32 {
    fn from(percent: AllocationPercent) -> Self {
        percent.value()
    }
}

impl std::fmt::Display for AllocationPercent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A person in the employee directory.
///
/// The directory is owned by an external collaborator; the allocation engine
/// only reads identity, role, and the reporting line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Store-assigned identifier; `None` until inserted.
    /// Optional to support creation before persistence.
    pub employee_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Directory role.
    pub role: EmployeeRole,
    /// Direct manager, if any.
    pub manager_id: Option<i64>,
}

impl Employee {
    /// Creates a new `Employee` without a persisted identifier.
    #[must_use]
    pub const fn new(
        name: String,
        email: String,
        role: EmployeeRole,
        manager_id: Option<i64>,
    ) -> Self {
        Self {
            employee_id: None,
            name,
            email,
            role,
            manager_id,
        }
    }

    /// Returns a copy with the persisted identifier set.
    #[must_use]
    pub const fn with_id(mut self, employee_id: i64) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    /// Returns true if `manager_id` is this employee's direct manager.
    #[must_use]
    pub fn reports_to(&self, manager_id: i64) -> bool {
        self.manager_id == Some(manager_id)
    }
}

/// A project in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Store-assigned identifier; `None` until inserted.
    pub project_id: Option<i64>,
    /// Project name.
    pub name: String,
    /// Lifecycle status.
    pub status: ProjectStatus,
}

impl Project {
    /// Creates a new `Project` without a persisted identifier.
    #[must_use]
    pub const fn new(name: String, status: ProjectStatus) -> Self {
        Self {
            project_id: None,
            name,
            status,
        }
    }

    /// Returns a copy with the persisted identifier set.
    #[must_use]
    pub const fn with_id(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Ensures the project can take a new assignment right now.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ProjectNotAssignable` unless the project is `ACTIVE`.
    pub fn ensure_assignable(&self, project_id: i64) -> Result<(), DomainError> {
        if self.status == ProjectStatus::Active {
            Ok(())
        } else {
            Err(DomainError::ProjectNotAssignable {
                project_id,
                status: self.status,
            })
        }
    }

    /// Returns the project moved to `ACTIVE`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ProjectNotActivatable` unless the project is `PLANNED`.
    pub fn activate(&self, project_id: i64) -> Result<Self, DomainError> {
        if self.status != ProjectStatus::Planned {
            return Err(DomainError::ProjectNotActivatable {
                project_id,
                status: self.status,
            });
        }
        let mut next: Self = self.clone();
        next.status = ProjectStatus::Active;
        Ok(next)
    }
}
