// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod allocation_request;
mod assignment;
mod capacity;
mod error;
mod types;
mod utilization;
mod validation;

#[cfg(test)]
mod tests;

pub use allocation_request::{AllocationRequest, RequestStatus};
pub use assignment::{Assignment, AssignmentChanges, AssignmentStatus};
pub use capacity::{CapacityCheck, FULL_CAPACITY, check_capacity, committed_allocation};
pub use error::{DomainError, ErrorKind};
pub use types::{AllocationPercent, BillingType, Employee, EmployeeRole, Project, ProjectStatus};
pub use utilization::{
    AllocationStatus, classify_allocation, current_assignment, most_recent_assignment,
};
pub use validation::{
    ISO_DATE_FORMAT, format_iso_date, normalize_optional_text, parse_iso_date,
    validate_date_range, validate_rejection_reason,
};
