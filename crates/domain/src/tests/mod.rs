// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod capacity;
mod error;
mod utilization;

use crate::{AllocationPercent, Assignment, BillingType};
use time::Date;

pub fn create_test_assignment(
    assignment_id: i64,
    billing_type: BillingType,
    percent: i64,
    start_date: Date,
) -> Assignment {
    Assignment::new_active(
        7,
        1,
        billing_type,
        AllocationPercent::new(percent).unwrap(),
        start_date,
        None,
        None,
    )
    .unwrap()
    .with_id(assignment_id)
}
