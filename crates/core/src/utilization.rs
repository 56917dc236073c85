// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::caller::Caller;
use crate::clock::Clock;
use crate::engine::{Engine, verify_caller, visible_employee};
use crate::error::CoreError;
use crate::policy::WorkflowPolicy;
use crate::store::UnitOfWork;
use crate::views::{
    EmployeeUtilization, OrgSummary, ProjectNames, TeamUtilization, employee_utilization,
};
use skillbridge_domain::{Assignment, Employee, EmployeeRole, classify_allocation};
use std::collections::HashMap;

/// Read-only utilization views over current assignments.
pub struct UtilizationAggregator<'a, U: UnitOfWork> {
    engine: Engine<'a, U>,
}

impl<'a, U: UnitOfWork> UtilizationAggregator<'a, U> {
    /// Creates an aggregator over a unit of work.
    pub const fn new(uow: &'a mut U, clock: &'a dyn Clock, policy: WorkflowPolicy) -> Self {
        Self {
            engine: Engine::new(uow, clock, policy),
        }
    }

    /// Returns one employee's utilization.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown employee and forbidden if the caller
    /// may not see them.
    pub fn employee_utilization(
        &mut self,
        caller: Caller,
        employee_id: i64,
    ) -> Result<EmployeeUtilization, CoreError> {
        self.engine.read(move |stores| {
            let employee: Employee = visible_employee(stores, caller, employee_id)?;
            let assignments: Vec<Assignment> = stores.list_assignments_for_employee(employee_id)?;
            let names: ProjectNames = ProjectNames::load(stores)?;
            Ok(employee_utilization(&employee, &assignments, &names))
        })
    }

    /// Returns the utilization of every direct report of `manager_id`.
    ///
    /// # Errors
    ///
    /// Returns forbidden unless the caller is that manager or HR.
    pub fn team_utilization(
        &mut self,
        caller: Caller,
        manager_id: i64,
    ) -> Result<TeamUtilization, CoreError> {
        self.engine.read(move |stores| {
            verify_caller(stores, caller)?;
            let allowed: bool = match caller.role {
                EmployeeRole::Hr => true,
                EmployeeRole::Manager => caller.employee_id == manager_id,
                EmployeeRole::Employee => false,
            };
            if !allowed {
                return Err(caller.not_permitted("view team utilization").into());
            }

            let reports: Vec<Employee> = stores.list_direct_reports(manager_id)?;
            let names: ProjectNames = ProjectNames::load(stores)?;
            let mut members: Vec<EmployeeUtilization> = Vec::with_capacity(reports.len());
            for report in &reports {
                let assignments: Vec<Assignment> = match report.employee_id {
                    Some(id) => stores.list_assignments_for_employee(id)?,
                    None => Vec::new(),
                };
                members.push(employee_utilization(report, &assignments, &names));
            }
            Ok(TeamUtilization {
                manager_id,
                members,
            })
        })
    }

    /// Counts employees by derived status across the organization.
    ///
    /// Only staff with the `EMPLOYEE` role are counted.
    ///
    /// # Errors
    ///
    /// Returns forbidden for plain employees.
    pub fn org_summary(&mut self, caller: Caller) -> Result<OrgSummary, CoreError> {
        self.engine.read(move |stores| {
            verify_caller(stores, caller)?;
            if caller.role == EmployeeRole::Employee {
                return Err(caller.not_permitted("view organization summary").into());
            }

            let mut by_employee: HashMap<i64, Vec<Assignment>> = HashMap::new();
            for assignment in stores.list_active_assignments()? {
                by_employee
                    .entry(assignment.employee_id)
                    .or_default()
                    .push(assignment);
            }

            let mut summary: OrgSummary = OrgSummary::default();
            for employee in stores.list_employees()? {
                if employee.role != EmployeeRole::Employee {
                    continue;
                }
                let assignments: &[Assignment] = employee
                    .employee_id
                    .and_then(|id| by_employee.get(&id))
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                summary.record(classify_allocation(assignments));
            }
            Ok(summary)
        })
    }
}
