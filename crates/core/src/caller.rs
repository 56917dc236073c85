// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use skillbridge_audit::Actor;
use skillbridge_domain::{DomainError, Employee, EmployeeRole};

/// The authenticated identity issuing a command.
///
/// Identity is always passed explicitly; the engine never reads it from
/// ambient context. The claimed role is checked against the directory
/// before any command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// The caller's employee identifier.
    pub employee_id: i64,
    /// The role the caller claims to act in.
    pub role: EmployeeRole,
}

impl Caller {
    /// Creates a new caller identity.
    #[must_use]
    pub const fn new(employee_id: i64, role: EmployeeRole) -> Self {
        Self { employee_id, role }
    }

    /// Converts the caller into an audit actor.
    #[must_use]
    pub fn to_actor(&self) -> Actor {
        Actor::new(self.employee_id, self.role.as_str())
    }

    /// Checks the claimed role against the caller's directory record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RoleMismatch` if the roles differ.
    pub fn verify(&self, record: &Employee) -> Result<(), DomainError> {
        if record.role == self.role {
            Ok(())
        } else {
            Err(DomainError::RoleMismatch {
                actor_id: self.employee_id,
                claimed: self.role,
                recorded: record.role,
            })
        }
    }

    /// Ensures the caller holds `role`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RoleNotPermitted` otherwise.
    pub fn require_role(
        &self,
        role: EmployeeRole,
        operation: &'static str,
    ) -> Result<(), DomainError> {
        if self.role == role {
            Ok(())
        } else {
            Err(self.not_permitted(operation))
        }
    }

    /// Ensures the caller may manage `employee`'s assignments directly.
    ///
    /// HR may act on anyone, managers only on their direct reports.
    ///
    /// # Errors
    ///
    /// Returns a forbidden-kind error otherwise.
    pub fn require_staffing_authority(
        &self,
        employee: &Employee,
        operation: &'static str,
    ) -> Result<(), DomainError> {
        match self.role {
            EmployeeRole::Hr => Ok(()),
            EmployeeRole::Manager if employee.reports_to(self.employee_id) => Ok(()),
            EmployeeRole::Manager => Err(DomainError::NotDirectManager {
                actor_id: self.employee_id,
                employee_id: employee.employee_id.unwrap_or_default(),
            }),
            EmployeeRole::Employee => Err(self.not_permitted(operation)),
        }
    }

    /// Ensures the caller may read `employee`'s allocation data.
    ///
    /// Employees see themselves, managers their direct reports, HR everyone.
    ///
    /// # Errors
    ///
    /// Returns a forbidden-kind error otherwise.
    pub fn require_visibility(&self, employee: &Employee) -> Result<(), DomainError> {
        let employee_id: i64 = employee.employee_id.unwrap_or_default();
        if employee_id == self.employee_id || self.role == EmployeeRole::Hr {
            return Ok(());
        }
        if self.role == EmployeeRole::Manager && employee.reports_to(self.employee_id) {
            return Ok(());
        }
        Err(DomainError::NotRequestOwner {
            actor_id: self.employee_id,
            employee_id,
        })
    }

    pub(crate) const fn not_permitted(&self, operation: &'static str) -> DomainError {
        DomainError::RoleNotPermitted {
            actor_id: self.employee_id,
            role: self.role,
            operation,
        }
    }
}
