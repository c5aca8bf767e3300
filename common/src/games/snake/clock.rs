use std::time::Duration;

/// Fixed-interval tick source driven by elapsed time fed in by the host.
/// Time that is not fed while the clock is disabled is simply never seen, so
/// a paused session resumes mid-interval without catching up.
#[derive(Clone, Debug)]
pub struct SimulationClock {
    interval: Duration,
    until_next_tick: Duration,
    enabled: bool,
}

impl SimulationClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            until_next_tick: interval,
            enabled: false,
        }
    }

    /// Enables the clock with a full interval before the first tick.
    pub fn start(&mut self) {
        self.enabled = true;
        self.until_next_tick = self.interval;
    }

    /// Re-enables the clock, keeping the progress made towards the next tick.
    pub fn resume(&mut self) {
        self.enabled = true;
    }

    pub fn stop(&mut self) {
        self.enabled = false;
    }

    pub fn time_to_next_tick(&self) -> Option<Duration> {
        self.enabled.then_some(self.until_next_tick)
    }

    pub fn elapse(&mut self, elapsed: Duration) {
        if self.enabled {
            self.until_next_tick = self.until_next_tick.saturating_sub(elapsed);
        }
    }

    pub fn take_due_tick(&mut self) -> bool {
        if !self.enabled || !self.until_next_tick.is_zero() {
            return false;
        }
        self.until_next_tick = self.interval;
        true
    }
}
