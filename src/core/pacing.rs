//=========================================================================
// Frame Pacing
//=========================================================================
//
// Timing for the fixed-rate dispatch loop.
//
// Each loop iteration is a tick. Elapsed time is measured from one tick
// START to the next tick START, not from the end of the previous sleep,
// so a slow frame shows up in the next tick's elapsed reading instead
// of being absorbed silently.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

//=== Frame Budget ========================================================

/// Wall-clock time allotted to one tick at the given rate.
pub(crate) fn frame_budget(frame_rate: f64) -> Duration {
    Duration::from_secs_f64(1.0 / frame_rate)
}

//=== Tick ================================================================

/// One loop iteration, as seen by the pacer.
pub(crate) struct Tick {
    start: Instant,
    elapsed: Duration,
}

impl Tick {
    /// Milliseconds between the previous tick's start and this one's.
    pub(crate) fn elapsed_millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

//=== FramePacer ==========================================================

/// Keeps loop iterations to a fixed wall-clock budget.
pub(crate) struct FramePacer {
    frame_budget: Duration,
    last_tick: Instant,
}

impl FramePacer {
    /// Creates a pacer; the first tick's elapsed time is measured from
    /// this call.
    pub(crate) fn new(frame_budget: Duration) -> Self {
        Self {
            frame_budget,
            last_tick: Instant::now(),
        }
    }

    /// Marks the start of a tick, measuring the time elapsed since the
    /// previous tick started.
    pub(crate) fn begin_tick(&self) -> Tick {
        let start = Instant::now();
        Tick {
            start,
            elapsed: start.duration_since(self.last_tick),
        }
    }

    /// Sleeps off whatever remains of the tick's budget.
    ///
    /// A tick that already spent its budget is not penalized further:
    /// the loop moves straight on to the next tick.
    pub(crate) fn end_tick(&mut self, tick: &Tick) {
        let cost = tick.start.elapsed();
        if cost < self.frame_budget {
            thread::sleep(self.frame_budget - cost);
        }
        self.last_tick = tick.start;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
