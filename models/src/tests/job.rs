use crate::{JobPhase, JobStatus};

/// **VALUE**: Pins the legal edges of the job state machine.
///
/// **WHY THIS MATTERS**: The orchestrator refuses any transition this table rejects. A wrong
/// edge either lets a cancelled job flip to Succeeded or blocks a legitimate completion.
///
/// **BUG THIS CATCHES**: Would catch a terminal state accepting a successor, or the sync
/// path losing its direct Submitting -> Succeeded edge.
#[test]
fn given_state_machine_when_checking_edges_then_only_forward_moves_allowed() {
    use JobStatus::*;

    // GIVEN/WHEN/THEN: forward edges
    assert!(Idle.can_transition_to(Submitting));
    assert!(Submitting.can_transition_to(Succeeded));
    assert!(Submitting.can_transition_to(Polling));
    assert!(Submitting.can_transition_to(Cancelled));
    assert!(Polling.can_transition_to(TimedOut));
    assert!(Polling.can_transition_to(Succeeded));

    // THEN: no backward or skipping edges
    assert!(!Polling.can_transition_to(Submitting));
    assert!(!Idle.can_transition_to(Succeeded));
    assert!(!Submitting.can_transition_to(TimedOut));
}

#[test]
fn given_terminal_status_when_checking_successors_then_none_allowed() {
    let all = [
        JobStatus::Idle,
        JobStatus::Submitting,
        JobStatus::Polling,
        JobStatus::Succeeded,
        JobStatus::Failed,
        JobStatus::TimedOut,
        JobStatus::Cancelled,
    ];

    for terminal in all.iter().filter(|s| s.is_terminal()) {
        for next in all {
            assert!(
                !terminal.can_transition_to(next),
                "{terminal} must not move to {next}"
            );
        }
        assert!(!terminal.is_cancellable());
    }
}

#[test]
fn given_in_flight_status_when_checked_then_cancellable() {
    assert!(JobStatus::Submitting.is_cancellable());
    assert!(JobStatus::Polling.is_cancellable());
    assert!(!JobStatus::Idle.is_cancellable());
}

#[test]
fn given_terminal_status_when_mapping_phase_then_matches_label() {
    assert_eq!(
        JobPhase::for_terminal(JobStatus::Succeeded).map(|p| p.label()),
        Some("done")
    );
    assert_eq!(
        JobPhase::for_terminal(JobStatus::TimedOut),
        Some(JobPhase::TimedOut)
    );
    assert_eq!(JobPhase::for_terminal(JobStatus::Polling), None);
    assert_eq!(JobPhase::Polling.label(), "waiting for remote processing");
}
