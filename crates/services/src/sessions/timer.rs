use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Default countdown resolution: one tick per second.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owned countdown tick source for one active session.
///
/// Dropping the timer cancels it; no task is spawned.
#[derive(Debug)]
pub struct TickTimer {
    interval: Interval,
}

impl TickTimer {
    /// Arms a timer whose first tick fires one `period` from now.
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn start(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    /// Waits for the next tick. Cancel-safe: dropping the future loses no tick.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let start = Instant::now();
        let mut timer = TickTimer::start(DEFAULT_TICK_PERIOD);
        timer.tick().await;
        assert_eq!(start.elapsed(), DEFAULT_TICK_PERIOD);
        timer.tick().await;
        assert_eq!(start.elapsed(), DEFAULT_TICK_PERIOD * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_wait_does_not_skip_a_tick() {
        let start = Instant::now();
        let mut timer = TickTimer::start(Duration::from_millis(500));
        let raced = tokio::time::timeout(Duration::from_millis(100), timer.tick()).await;
        assert!(raced.is_err());
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }
}
