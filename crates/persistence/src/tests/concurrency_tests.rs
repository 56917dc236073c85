// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{TestOrg, billable_draft, seed_org, test_cause, test_clock};
use crate::Persistence;
use skillbridge::{AssignmentManager, CoreError, FixedClock, WorkflowPolicy};
use skillbridge_domain::{Assignment, ErrorKind};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_racing_assignments_cannot_overcommit() {
    let dir: tempfile::TempDir = tempfile::tempdir().unwrap();
    let path: std::path::PathBuf = dir.path().join("race.db");

    let mut first: Persistence = Persistence::new_with_file(&path).unwrap();
    let org: TestOrg = seed_org(&mut first);
    let second: Persistence = Persistence::connect_file(&path).unwrap();

    let barrier: Arc<Barrier> = Arc::new(Barrier::new(2));
    let handles: Vec<thread::JoinHandle<Result<Assignment, CoreError>>> = [first, second]
        .into_iter()
        .map(|mut persistence| {
            let barrier: Arc<Barrier> = Arc::clone(&barrier);
            thread::spawn(move || {
                let clock: FixedClock = test_clock();
                barrier.wait();
                AssignmentManager::new(&mut persistence, &clock, WorkflowPolicy::default())
                    .create_assignment(
                        org.hr_caller(),
                        test_cause(),
                        billable_draft(org.alice, org.active_project, 60),
                    )
            })
        })
        .collect();

    let results: Vec<Result<Assignment, CoreError>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    let successes: usize = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    let failure: &CoreError = results
        .iter()
        .find_map(|r| r.as_ref().err())
        .unwrap();
    assert_eq!(failure.kind(), Some(ErrorKind::CapacityExceeded));

    let mut check: Persistence = Persistence::new_with_file(&path).unwrap();
    assert_eq!(check.allocation_version(org.alice).unwrap(), 1);
    let all: Vec<Assignment> =
        AssignmentManager::new(&mut check, &test_clock(), WorkflowPolicy::default())
            .list_all(org.hr_caller())
            .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].allocation_percent.value(), 60);
}
