use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(600);
pub const DEFAULT_MAX_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Timing limits for one job.
///
/// `max_wait` bounds the whole job from submission, sync calls included.
/// `max_attempts`, when set, additionally caps the number of status checks.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_wait: Duration,
    pub max_attempts: Option<u32>,
    pub multiplier: f64,
    pub max_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
            max_attempts: None,
            multiplier: 1.0,
            max_interval: DEFAULT_MAX_POLL_INTERVAL,
        }
    }
}

/// Delays between status checks.
///
/// No jitter; with the default multiplier of 1.0 every delay equals the
/// configured interval.
pub struct PollSchedule {
    backoff: ExponentialBackoff,
}

impl PollSchedule {
    pub fn new(config: &PollConfig) -> Self {
        let backoff = ExponentialBackoff {
            current_interval: config.interval,
            initial_interval: config.interval,
            randomization_factor: 0.0,
            multiplier: config.multiplier.max(1.0),
            max_interval: config.max_interval.max(config.interval),
            // The job deadline is enforced on tokio's clock instead
            max_elapsed_time: None,
            ..Default::default()
        };

        Self { backoff }
    }

    pub fn next_delay(&mut self) -> Duration {
        self.backoff
            .next_backoff()
            .unwrap_or(self.backoff.max_interval)
    }
}
