//! Phase timing on the monotonic clock.

use tokio::time::Instant;

use super::models::PhaseTimings;

/// Tracks the whole run from the start of planning.
#[derive(Debug, Clone, Copy)]
pub struct PhaseTimer {
    started: Instant,
}

/// Brackets a single phase.
#[derive(Debug, Clone, Copy)]
pub struct PhaseClock {
    started: Instant,
}

impl PhaseTimer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn phase(&self) -> PhaseClock {
        PhaseClock {
            started: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the timer started.
    pub fn total_ms(&self) -> u64 {
        millis_since(self.started)
    }

    /// Build the final timings once all four phases have completed.
    pub fn assemble(
        &self,
        planning_ms: u64,
        gathering_ms: u64,
        synthesis_ms: u64,
        verification_ms: u64,
    ) -> PhaseTimings {
        let phases = planning_ms + gathering_ms + synthesis_ms + verification_ms;
        PhaseTimings {
            planning_ms,
            gathering_ms,
            synthesis_ms,
            verification_ms,
            // Millisecond truncation can leave the total just under the sum
            total_ms: self.total_ms().max(phases),
        }
    }
}

impl PhaseClock {
    pub fn finish(self) -> u64 {
        millis_since(self.started)
    }
}

fn millis_since(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
