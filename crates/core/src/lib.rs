// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Allocation workflow and capacity engine.
//!
//! Commands are applied as pure transitions over the loaded state of one
//! employee and committed through a [`UnitOfWork`] that serializes all
//! writes touching that employee's allocation.

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

mod apply;
mod assignments;
mod caller;
mod clock;
mod command;
mod engine;
mod error;
mod policy;
mod state;
mod store;
mod utilization;
mod views;
mod workflow;

#[cfg(test)]
mod tests;

pub use apply::{ApplyContext, apply, apply_catalog};
pub use assignments::AssignmentManager;
pub use caller::Caller;
pub use clock::{Clock, FixedClock, SystemClock};
pub use command::{AssignmentDraft, Command};
pub use engine::Engine;
pub use error::CoreError;
pub use policy::WorkflowPolicy;
pub use state::{CommitReceipt, Mutation, State, TransitionResult};
pub use store::{AllocationRequestStore, AssignmentStore, AuditLog, Directory, Stores, UnitOfWork};
pub use utilization::UtilizationAggregator;
pub use views::{
    AllocationDetail, CurrentAllocation, EmployeeUtilization, OrgSummary, RequestView,
    TeamUtilization,
};
pub use workflow::{AllocationWorkflow, Approval};
