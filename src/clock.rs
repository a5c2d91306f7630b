//! Simulation clock — drives the query time over an immutable timeline.
//!
//! The clock is purely cooperative and single-threaded: the embedding
//! driver (a UI loop, a test, the demo binary) calls [`SimClock::tick`]
//! at whatever real-time rate it likes, and every mutation goes through
//! `&mut self`, so there is exactly one writer by construction. A
//! `tick` outside the `Running` state is a no-op, which makes
//! cancellation unconditional: after `pause` or `restart`, a stale tick
//! from the old driving loop cannot advance time.

use crate::process::Process;
use crate::projector::{project, Projection};
use crate::time::SimTime;
use crate::timeline::Timeline;

// ── ClockState ────────────────────────────────────────────────────────

/// The clock's run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum ClockState {
    /// At `t = 0`, never played (or just restarted).
    Stopped,
    /// Advancing one tick per `tick()` call.
    Running,
    /// Halted mid-run; `play` resumes.
    Paused,
    /// Reached the end of the timeline.
    Finished,
}

// ── SimClock ──────────────────────────────────────────────────────────

/// Owns the timeline, the process set, and the current query time.
///
/// Projections are recomputed from scratch on every call — the clock
/// deliberately holds no derived state, so scrubbing and restarting
/// can never drift from a fresh computation.
#[derive(Debug, Clone)]
pub struct SimClock {
    processes: Vec<Process>,
    timeline: Timeline,
    now: SimTime,
    state: ClockState,
    /// Ticks per real-time second; a pacing hint for the embedding
    /// driver, never consulted by the clock itself.
    speed: u32,
}

impl SimClock {
    /// Create a clock over a computed timeline, stopped at `t = 0`.
    pub fn new(processes: Vec<Process>, timeline: Timeline) -> Self {
        SimClock {
            processes,
            timeline,
            now: SimTime::ZERO,
            state: ClockState::Stopped,
            speed: 1,
        }
    }

    /// Current query time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Current run state.
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// End of the timeline; the clock clamps here.
    pub fn total_time(&self) -> SimTime {
        self.timeline.total_time()
    }

    /// The immutable timeline being driven.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The process set the timeline was computed for.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Pacing hint in ticks per second.
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Set the pacing hint. Zero is clamped to 1.
    pub fn set_speed(&mut self, ticks_per_second: u32) {
        self.speed = ticks_per_second.max(1);
    }

    // ── Transitions ───────────────────────────────────────────

    /// Start or resume. Only meaningful from `Stopped` or `Paused`; a
    /// finished clock must be restarted first.
    pub fn play(&mut self) {
        if matches!(self.state, ClockState::Stopped | ClockState::Paused) {
            self.state = ClockState::Running;
        }
    }

    /// Halt a running clock.
    pub fn pause(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Paused;
        }
    }

    /// Advance one tick manually. Usable from any non-`Running` state;
    /// clamps at the end of the timeline.
    pub fn step(&mut self) {
        if self.state == ClockState::Running {
            return;
        }
        self.advance_one();
        // Stepping off t=0 leaves the clock paused rather than
        // "never played".
        if self.state == ClockState::Stopped {
            self.state = ClockState::Paused;
        }
    }

    /// Drive the clock while `Running`. Returns `true` if time
    /// advanced. Reaching the end auto-transitions to `Finished`.
    pub fn tick(&mut self) -> bool {
        if self.state != ClockState::Running {
            return false;
        }
        self.advance_one();
        true
    }

    /// Back to `Stopped` at `t = 0`. The timeline is untouched.
    pub fn restart(&mut self) {
        self.now = SimTime::ZERO;
        self.state = ClockState::Stopped;
    }

    /// Atomically replace the timeline (after an algorithm or process
    /// change) and reset to `Stopped` at `t = 0`. The old projection
    /// basis disappears in the same call, so no query can observe a
    /// half-updated clock.
    pub fn load(&mut self, processes: Vec<Process>, timeline: Timeline) {
        self.processes = processes;
        self.timeline = timeline;
        self.restart();
    }

    fn advance_one(&mut self) {
        let total = self.total_time();
        if self.now < total {
            self.now = self.now.advance(1).expect("simulated time overflow");
        }
        if self.now >= total {
            self.now = total;
            self.state = ClockState::Finished;
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Project all process states and metrics at the current time.
    pub fn projection(&self) -> Projection {
        project(&self.timeline, &self.processes, self.now)
    }
}
