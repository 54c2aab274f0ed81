use gs_config::SpawnRetryConfig;

use std::time::Duration;

/// Delay schedule for re-attempting a failed spawn.
#[derive(Debug, Clone)]
pub struct SpawnBackoff {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: bool,
}

impl SpawnBackoff {
    pub fn new(config: &SpawnRetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: config.initial_delay(),
            max_delay: config.max_delay(),
            multiplier: config.backoff_multiplier,
            jitter: config.jitter,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retry number `attempt` (1-based), or `None` once retries
    /// are exhausted.
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_attempts {
            return None;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = base.min(self.max_delay.as_secs_f64());

        let delay = if self.jitter {
            let jitter_factor = 0.9 + rand::random::<f64>() * 0.2; // 0.9 to 1.1
            (capped * jitter_factor).min(self.max_delay.as_secs_f64())
        } else {
            capped
        };

        Some(Duration::from_secs_f64(delay))
    }
}
