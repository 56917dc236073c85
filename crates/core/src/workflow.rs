// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::caller::Caller;
use crate::clock::Clock;
use crate::command::Command;
use crate::engine::{Engine, verify_caller};
use crate::error::CoreError;
use crate::policy::WorkflowPolicy;
use crate::state::CommitReceipt;
use crate::store::UnitOfWork;
use crate::views::{RequestView, request_views};
use skillbridge_audit::Cause;
use skillbridge_domain::{
    AllocationPercent, AllocationRequest, Assignment, BillingType, Employee, EmployeeRole,
    RequestStatus,
};
use std::collections::HashSet;
use tracing::info;

/// Outcome of an HR approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    /// The request, now `APPROVED`.
    pub request: AllocationRequest,
    /// The assignment created for it.
    pub assignment: Assignment,
}

/// Drives allocation requests from creation through manager triage to the
/// HR decision.
pub struct AllocationWorkflow<'a, U: UnitOfWork> {
    engine: Engine<'a, U>,
}

impl<'a, U: UnitOfWork> AllocationWorkflow<'a, U> {
    /// Creates a workflow over a unit of work.
    pub const fn new(uow: &'a mut U, clock: &'a dyn Clock, policy: WorkflowPolicy) -> Self {
        Self {
            engine: Engine::new(uow, clock, policy),
        }
    }

    /// Creates a `PENDING_MANAGER` request for `employee_id`.
    ///
    /// # Errors
    ///
    /// Returns a conflict if the employee has an active assignment or an
    /// open request, and forbidden if the caller is not the employee.
    pub fn create_request(
        &mut self,
        caller: Caller,
        cause: Cause,
        employee_id: i64,
        project_id: i64,
    ) -> Result<AllocationRequest, CoreError> {
        let receipt: CommitReceipt = self.engine.execute(
            caller,
            cause,
            Command::CreateRequest {
                employee_id,
                project_id,
            },
        )?;
        let request: AllocationRequest = committed_request(receipt)?;
        info!(
            request_id = ?request.request_id,
            employee_id,
            project_id,
            "Allocation request created"
        );
        Ok(request)
    }

    /// Forwards a request to HR with a billing type.
    ///
    /// # Errors
    ///
    /// Returns forbidden unless the caller is the employee's manager, an
    /// invalid-state error unless the request is `PENDING_MANAGER`, and a
    /// validation error if the billing type is missing.
    pub fn forward(
        &mut self,
        caller: Caller,
        cause: Cause,
        request_id: i64,
        billing_type: Option<BillingType>,
        comments: Option<String>,
    ) -> Result<AllocationRequest, CoreError> {
        let receipt: CommitReceipt = self.engine.execute(
            caller,
            cause,
            Command::ForwardRequest {
                request_id,
                billing_type,
                comments,
            },
        )?;
        committed_request(receipt)
    }

    /// Approves a `PENDING_HR` request and creates its assignment.
    ///
    /// The capacity check and both writes happen in one serialized unit.
    ///
    /// # Errors
    ///
    /// Returns forbidden unless the caller is HR, an invalid-state error
    /// unless the request is `PENDING_HR`, and a capacity error if the
    /// allocation does not fit.
    pub fn approve(
        &mut self,
        caller: Caller,
        cause: Cause,
        request_id: i64,
        allocation_percent: Option<AllocationPercent>,
    ) -> Result<Approval, CoreError> {
        let receipt: CommitReceipt = self.engine.execute(
            caller,
            cause,
            Command::ApproveRequest {
                request_id,
                allocation_percent,
            },
        )?;
        let assignment: Assignment = receipt
            .assignment
            .clone()
            .ok_or_else(|| CoreError::Store(String::from("approval wrote no assignment")))?;
        let request: AllocationRequest = committed_request(receipt)?;
        info!(
            request_id,
            assignment_id = ?assignment.assignment_id,
            "Allocation request approved"
        );
        Ok(Approval {
            request,
            assignment,
        })
    }

    /// Rejects a request at the caller's stage.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank reason, forbidden for
    /// employees and unrelated managers, and an invalid-state error if the
    /// request is not at the caller's stage.
    pub fn reject(
        &mut self,
        caller: Caller,
        cause: Cause,
        request_id: i64,
        reason: &str,
    ) -> Result<AllocationRequest, CoreError> {
        let receipt: CommitReceipt = self.engine.execute(
            caller,
            cause,
            Command::RejectRequest {
                request_id,
                reason: reason.to_string(),
            },
        )?;
        committed_request(receipt)
    }

    /// Lists the caller's own requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is unknown or the store fails.
    pub fn list_mine(&mut self, caller: Caller) -> Result<Vec<RequestView>, CoreError> {
        self.engine.read(move |stores| {
            verify_caller(stores, caller)?;
            let requests: Vec<AllocationRequest> =
                stores.list_requests_for_employee(caller.employee_id)?;
            request_views(stores, requests)
        })
    }

    /// Lists requests awaiting the caller's decision.
    ///
    /// Managers see `PENDING_MANAGER` requests of their direct reports; HR
    /// sees every `PENDING_HR` request.
    ///
    /// # Errors
    ///
    /// Returns forbidden for employees.
    pub fn list_pending_for_reviewer(
        &mut self,
        caller: Caller,
    ) -> Result<Vec<RequestView>, CoreError> {
        self.engine.read(move |stores| {
            verify_caller(stores, caller)?;
            let requests: Vec<AllocationRequest> = match caller.role {
                EmployeeRole::Hr => stores.list_requests_by_status(RequestStatus::PendingHr)?,
                EmployeeRole::Manager => {
                    let reports: HashSet<i64> = stores
                        .list_direct_reports(caller.employee_id)?
                        .iter()
                        .filter_map(|e: &Employee| e.employee_id)
                        .collect();
                    stores
                        .list_requests_by_status(RequestStatus::PendingManager)?
                        .into_iter()
                        .filter(|r| reports.contains(&r.employee_id))
                        .collect()
                }
                EmployeeRole::Employee => {
                    return Err(caller.not_permitted("review requests").into());
                }
            };
            request_views(stores, requests)
        })
    }
}

fn committed_request(receipt: CommitReceipt) -> Result<AllocationRequest, CoreError> {
    receipt
        .request
        .ok_or_else(|| CoreError::Store(String::from("transition wrote no request")))
}
