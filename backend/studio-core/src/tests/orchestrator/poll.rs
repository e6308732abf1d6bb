// Unit tests for the poll schedule.

use crate::orchestrator::{PollConfig, PollSchedule};

use std::time::Duration;

fn assert_close(actual: Duration, expected: Duration) {
    let diff = actual.abs_diff(expected);
    assert!(
        diff < Duration::from_millis(1),
        "expected ~{expected:?}, got {actual:?}"
    );
}

/// **VALUE**: The default schedule is a fixed interval with no jitter.
///
/// **WHY THIS MATTERS**: Long-running video jobs are checked every 10 s; a
/// growing or jittered interval would change how quickly results appear.
///
/// **BUG THIS CATCHES**: Would catch the backoff defaults (0.5 jitter, 1.5x
/// growth) leaking into the schedule.
#[test]
fn given_default_config_when_delays_drawn_then_fixed_interval() {
    // GIVEN
    let mut schedule = PollSchedule::new(&PollConfig::default());

    // WHEN / THEN
    for _ in 0..20 {
        assert_close(schedule.next_delay(), Duration::from_secs(10));
    }
}

#[test]
fn given_multiplier_when_delays_drawn_then_grow_until_max_interval() {
    // GIVEN
    let config = PollConfig {
        interval: Duration::from_secs(2),
        multiplier: 2.0,
        max_interval: Duration::from_secs(10),
        ..PollConfig::default()
    };
    let mut schedule = PollSchedule::new(&config);

    // WHEN
    let delays: Vec<Duration> = (0..5).map(|_| schedule.next_delay()).collect();

    // THEN
    assert_close(delays[0], Duration::from_secs(2));
    assert_close(delays[1], Duration::from_secs(4));
    assert_close(delays[2], Duration::from_secs(8));
    assert_close(delays[3], Duration::from_secs(10));
    assert_close(delays[4], Duration::from_secs(10));
}

#[test]
fn given_multiplier_below_one_when_schedule_built_then_clamped_to_fixed() {
    let config = PollConfig {
        interval: Duration::from_secs(3),
        multiplier: 0.1,
        ..PollConfig::default()
    };
    let mut schedule = PollSchedule::new(&config);

    schedule.next_delay();
    assert_close(schedule.next_delay(), Duration::from_secs(3));
}
