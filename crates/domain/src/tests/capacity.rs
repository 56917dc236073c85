// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_assignment;
use crate::{
    AllocationPercent, Assignment, BillingType, CapacityCheck, DomainError, check_capacity,
    committed_allocation,
};
use time::macros::date;

#[test]
fn test_empty_history_has_full_headroom() {
    let check: CapacityCheck = check_capacity(&[], AllocationPercent::FULL, None);
    assert_eq!(check.current_total, 0);
    assert_eq!(check.available, 100);
    assert!(!check.would_exceed);
}

#[test]
fn test_exceeding_candidate_reports_figures() {
    let existing: Vec<Assignment> = vec![create_test_assignment(
        1,
        BillingType::Billable,
        60,
        date!(2026 - 01 - 05),
    )];
    let check: CapacityCheck =
        check_capacity(&existing, AllocationPercent::new(50).unwrap(), None);

    assert!(check.would_exceed);
    assert_eq!(
        check.ensure_fits(7),
        Err(DomainError::CapacityExceeded {
            employee_id: 7,
            current: 60,
            requested: 50,
            available: 40,
        })
    );
}

#[test]
fn test_exact_fill_is_allowed() {
    let existing: Vec<Assignment> = vec![create_test_assignment(
        1,
        BillingType::Billable,
        60,
        date!(2026 - 01 - 05),
    )];
    let check: CapacityCheck =
        check_capacity(&existing, AllocationPercent::new(40).unwrap(), None);
    assert!(!check.would_exceed);
    assert!(check.ensure_fits(7).is_ok());
}

#[test]
fn test_ended_assignments_do_not_count() {
    let ended: Assignment =
        create_test_assignment(1, BillingType::Billable, 80, date!(2026 - 01 - 05))
            .end(date!(2026 - 02 - 01))
            .unwrap();
    let active: Assignment =
        create_test_assignment(2, BillingType::Investment, 30, date!(2026 - 02 - 02));

    assert_eq!(committed_allocation(&[ended, active], None), 30);
}

#[test]
fn test_excluded_assignment_is_not_double_counted() {
    let first: Assignment =
        create_test_assignment(1, BillingType::Billable, 70, date!(2026 - 01 - 05));
    let second: Assignment =
        create_test_assignment(2, BillingType::Investment, 30, date!(2026 - 01 - 05));
    let existing: Vec<Assignment> = vec![first, second];

    // Re-checking assignment 1 at its own 70% still fits.
    let check: CapacityCheck =
        check_capacity(&existing, AllocationPercent::new(70).unwrap(), Some(1));
    assert_eq!(check.current_total, 30);
    assert!(!check.would_exceed);

    let check: CapacityCheck =
        check_capacity(&existing, AllocationPercent::new(71).unwrap(), Some(1));
    assert!(check.would_exceed);
}

#[test]
fn test_display_total_is_capped() {
    let existing: Vec<Assignment> = vec![
        create_test_assignment(1, BillingType::Billable, 80, date!(2026 - 01 - 05)),
        create_test_assignment(2, BillingType::Billable, 40, date!(2026 - 01 - 05)),
    ];
    let check: CapacityCheck = check_capacity(&existing, AllocationPercent::FULL, None);
    assert_eq!(check.current_total, 120);
    assert_eq!(check.display_total(), 100);
    assert_eq!(check.available, 0);
}
