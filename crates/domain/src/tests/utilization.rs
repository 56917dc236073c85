// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_assignment;
use crate::{
    AllocationStatus, Assignment, BillingType, classify_allocation, current_assignment,
    most_recent_assignment,
};
use time::macros::date;

#[test]
fn test_no_assignments_is_bench() {
    assert_eq!(classify_allocation(&[]), AllocationStatus::Bench);
}

#[test]
fn test_any_billable_assignment_classifies_billable() {
    let assignments: Vec<Assignment> = vec![
        create_test_assignment(1, BillingType::Investment, 50, date!(2026 - 01 - 05)),
        create_test_assignment(2, BillingType::Billable, 50, date!(2026 - 01 - 05)),
    ];
    assert_eq!(classify_allocation(&assignments), AllocationStatus::Billable);
}

#[test]
fn test_investment_only_classifies_investment() {
    let assignments: Vec<Assignment> = vec![create_test_assignment(
        1,
        BillingType::Investment,
        50,
        date!(2026 - 01 - 05),
    )];
    assert_eq!(
        classify_allocation(&assignments),
        AllocationStatus::Investment
    );
}

#[test]
fn test_only_ended_assignments_is_bench() {
    let ended: Assignment =
        create_test_assignment(1, BillingType::Billable, 100, date!(2026 - 01 - 05))
            .end(date!(2026 - 03 - 01))
            .unwrap();
    assert_eq!(classify_allocation(&[ended]), AllocationStatus::Bench);
}

#[test]
fn test_most_recent_picks_latest_start() {
    let older: Assignment =
        create_test_assignment(1, BillingType::Billable, 50, date!(2026 - 01 - 05));
    let newer: Assignment =
        create_test_assignment(2, BillingType::Investment, 50, date!(2026 - 04 - 01))
            .end(date!(2026 - 05 - 01))
            .unwrap();
    let assignments: Vec<Assignment> = vec![older, newer];

    assert_eq!(
        most_recent_assignment(&assignments).unwrap().assignment_id,
        Some(2)
    );
    assert_eq!(
        current_assignment(&assignments).unwrap().assignment_id,
        Some(1)
    );
    assert!(most_recent_assignment(&[]).is_none());
}

#[test]
fn test_current_falls_back_to_latest_ended() {
    let first: Assignment =
        create_test_assignment(1, BillingType::Billable, 50, date!(2026 - 01 - 05))
            .end(date!(2026 - 02 - 01))
            .unwrap();
    let second: Assignment =
        create_test_assignment(2, BillingType::Investment, 30, date!(2026 - 02 - 10))
            .end(date!(2026 - 03 - 01))
            .unwrap();
    let assignments: Vec<Assignment> = vec![first, second];

    assert_eq!(
        current_assignment(&assignments).unwrap().assignment_id,
        Some(2)
    );
    assert!(current_assignment(&[]).is_none());
}
