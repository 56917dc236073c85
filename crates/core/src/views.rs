// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side projections.

use crate::error::CoreError;
use crate::store::Stores;
use skillbridge_domain::{
    AllocationRequest, AllocationStatus, Assignment, AssignmentStatus, BillingType, Employee,
    FULL_CAPACITY, Project, classify_allocation, committed_allocation,
};
use std::collections::HashMap;
use time::Date;

/// A request with the names a reviewer needs to triage it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestView {
    /// The request.
    pub request: AllocationRequest,
    /// The requesting employee's name.
    pub employee_name: String,
    /// The requested project's name.
    pub project_name: String,
    /// The forwarding manager's name, once forwarded.
    pub forwarded_by_name: Option<String>,
}

/// One active assignment as shown in utilization views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationDetail {
    /// The assignment.
    pub assignment_id: i64,
    /// The project.
    pub project_id: i64,
    /// The project's name.
    pub project_name: String,
    /// Committed percentage.
    pub allocation_percent: u32,
    /// Cost treatment.
    pub billing_type: BillingType,
    /// `ACTIVE` or `ENDED`.
    pub status: AssignmentStatus,
    /// Role on the project.
    pub project_role: Option<String>,
    /// First day.
    pub start_date: Date,
    /// Last day, if set.
    pub end_date: Option<Date>,
    /// Row version, needed for updates.
    pub version: i64,
}

/// An employee's current workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeUtilization {
    /// The employee.
    pub employee_id: i64,
    /// The employee's name.
    pub employee_name: String,
    /// Derived status.
    pub allocation_status: AllocationStatus,
    /// Sum of active percentages, capped at full capacity.
    pub total_allocation: u32,
    /// Remaining headroom.
    pub available_capacity: u32,
    /// Active assignments.
    pub allocations: Vec<AllocationDetail>,
}

/// Utilization of a manager's direct reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamUtilization {
    /// The manager.
    pub manager_id: i64,
    /// One entry per direct report.
    pub members: Vec<EmployeeUtilization>,
}

/// Organization-wide status counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrgSummary {
    /// Employees counted.
    pub total_employees: usize,
    /// Employees with a billable assignment.
    pub billable: usize,
    /// Employees on investment work only.
    pub investment: usize,
    /// Employees without an active assignment.
    pub bench: usize,
}

impl OrgSummary {
    /// Counts one employee in the bucket for `status`.
    pub const fn record(&mut self, status: AllocationStatus) {
        self.total_employees += 1;
        match status {
            AllocationStatus::Billable => self.billable += 1,
            AllocationStatus::Investment => self.investment += 1,
            AllocationStatus::Bench => self.bench += 1,
        }
    }
}

/// The assignment an employee is currently working on, or bench.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentAllocation {
    /// The most recent active assignment, or the most recent ended one
    /// when nothing is active.
    Assigned(AllocationDetail),
    /// No assignments at all.
    Bench,
}

/// Project names, loaded once per query.
pub(crate) struct ProjectNames(HashMap<i64, String>);

impl ProjectNames {
    pub(crate) fn load(stores: &mut dyn Stores) -> Result<Self, CoreError> {
        let projects: Vec<Project> = stores.list_projects()?;
        Ok(Self(
            projects
                .into_iter()
                .filter_map(|p| p.project_id.map(|id| (id, p.name)))
                .collect(),
        ))
    }

    pub(crate) fn name(&self, project_id: i64) -> String {
        self.0
            .get(&project_id)
            .cloned()
            .unwrap_or_else(|| format!("project-{project_id}"))
    }
}

pub(crate) fn allocation_detail(assignment: &Assignment, names: &ProjectNames) -> AllocationDetail {
    AllocationDetail {
        assignment_id: assignment.assignment_id.unwrap_or_default(),
        project_id: assignment.project_id,
        project_name: names.name(assignment.project_id),
        allocation_percent: assignment.allocation_percent.value(),
        billing_type: assignment.billing_type,
        status: assignment.status,
        project_role: assignment.project_role.clone(),
        start_date: assignment.start_date,
        end_date: assignment.end_date,
        version: assignment.version,
    }
}

pub(crate) fn employee_utilization(
    employee: &Employee,
    assignments: &[Assignment],
    names: &ProjectNames,
) -> EmployeeUtilization {
    let committed: u32 = committed_allocation(assignments, None);
    EmployeeUtilization {
        employee_id: employee.employee_id.unwrap_or_default(),
        employee_name: employee.name.clone(),
        allocation_status: classify_allocation(assignments),
        total_allocation: committed.min(FULL_CAPACITY),
        available_capacity: FULL_CAPACITY.saturating_sub(committed),
        allocations: assignments
            .iter()
            .filter(|a| a.is_active())
            .map(|a| allocation_detail(a, names))
            .collect(),
    }
}

pub(crate) fn request_views(
    stores: &mut dyn Stores,
    requests: Vec<AllocationRequest>,
) -> Result<Vec<RequestView>, CoreError> {
    let names: ProjectNames = ProjectNames::load(stores)?;
    let mut people: HashMap<i64, String> = HashMap::new();
    let mut views: Vec<RequestView> = Vec::with_capacity(requests.len());

    for request in requests {
        let employee_name: String = person_name(stores, &mut people, request.employee_id)?;
        let forwarded_by_name: Option<String> = match request.forwarded_by {
            Some(manager_id) => Some(person_name(stores, &mut people, manager_id)?),
            None => None,
        };
        views.push(RequestView {
            project_name: names.name(request.project_id),
            employee_name,
            forwarded_by_name,
            request,
        });
    }
    Ok(views)
}

fn person_name(
    stores: &mut dyn Stores,
    cache: &mut HashMap<i64, String>,
    employee_id: i64,
) -> Result<String, CoreError> {
    if let Some(name) = cache.get(&employee_id) {
        return Ok(name.clone());
    }
    let name: String = stores
        .find_employee(employee_id)?
        .map_or_else(|| format!("employee-{employee_id}"), |e| e.name);
    cache.insert(employee_id, name.clone());
    Ok(name)
}
