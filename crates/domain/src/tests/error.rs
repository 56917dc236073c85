// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, ErrorKind, ProjectStatus, RequestStatus};
use time::macros::date;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidAllocationPercent(150);
    assert_eq!(
        format!("{err}"),
        "Invalid allocation percent: 150. Must be between 1 and 100"
    );

    let err: DomainError = DomainError::InvalidBillingType(String::from("FREE"));
    assert_eq!(format!("{err}"), "Invalid billing type: FREE");

    let err: DomainError = DomainError::BlankRejectionReason;
    assert_eq!(format!("{err}"), "Rejection reason cannot be empty");

    let err: DomainError = DomainError::InvalidDateRange {
        start_date: date!(2026 - 03 - 01),
        end_date: date!(2026 - 02 - 01),
    };
    assert_eq!(
        format!("{err}"),
        "End date 2026-02-01 must not be before start date 2026-03-01"
    );

    let err: DomainError = DomainError::RequestNotInState {
        request_id: 4,
        expected: RequestStatus::PendingHr,
        actual: RequestStatus::Approved,
    };
    assert_eq!(
        format!("{err}"),
        "Allocation request 4 is APPROVED, expected PENDING_HR"
    );

    let err: DomainError = DomainError::ProjectNotAssignable {
        project_id: 3,
        status: ProjectStatus::OnHold,
    };
    assert_eq!(
        format!("{err}"),
        "Project 3 is ON_HOLD and does not accept allocations"
    );
}

#[test]
fn test_capacity_error_display_carries_figures() {
    let err: DomainError = DomainError::CapacityExceeded {
        employee_id: 9,
        current: 60,
        requested: 50,
        available: 40,
    };
    assert_eq!(
        format!("{err}"),
        "Employee 9 is allocated 60%, cannot add 50% (40% available)"
    );
}

#[test]
fn test_error_kinds_cover_taxonomy() {
    assert_eq!(DomainError::MissingBillingType.kind(), ErrorKind::Validation);
    assert_eq!(DomainError::BlankRejectionReason.kind(), ErrorKind::Validation);
    assert_eq!(DomainError::ProjectNotFound(1).kind(), ErrorKind::NotFound);
    assert_eq!(DomainError::AssignmentNotActive(1).kind(), ErrorKind::InvalidState);
    assert_eq!(
        DomainError::NotDirectManager {
            actor_id: 1,
            employee_id: 2
        }
        .kind(),
        ErrorKind::Forbidden
    );
    assert_eq!(
        DomainError::OpenRequestExists {
            employee_id: 1,
            request_id: 2
        }
        .kind(),
        ErrorKind::Conflict
    );
    assert_eq!(
        DomainError::CapacityExceeded {
            employee_id: 1,
            current: 100,
            requested: 1,
            available: 0
        }
        .kind(),
        ErrorKind::CapacityExceeded
    );
    assert_eq!(
        DomainError::StaleAssignmentVersion {
            assignment_id: 1,
            expected: 0,
            actual: 1
        }
        .kind(),
        ErrorKind::ConcurrentModification
    );
}
