// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn predicates_match_phase() {
    let build = BuildSnapshot::new(7, BuildPhase::Running);
    assert!(build.is_running());
    assert!(!build.is_enqueued());
    assert!(!build.is_success());
    assert!(!build.is_failure());
    assert!(!build.is_aborted());
    assert_eq!(build.number, 7);
}

#[test]
fn each_phase_answers_exactly_one_predicate() {
    for phase in [
        BuildPhase::Enqueued,
        BuildPhase::Running,
        BuildPhase::Succeeded,
        BuildPhase::Failed,
        BuildPhase::Aborted,
    ] {
        let build = BuildSnapshot::new(1, phase);
        let hits = [
            build.is_enqueued(),
            build.is_running(),
            build.is_success(),
            build.is_failure(),
            build.is_aborted(),
        ]
        .iter()
        .filter(|hit| **hit)
        .count();
        assert_eq!(hits, 1, "phase {phase} should satisfy exactly one predicate");
    }
}
