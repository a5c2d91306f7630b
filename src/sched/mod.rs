//! The scheduling engine: `(processes, algorithm) -> Timeline`.
//!
//! [`schedule`] is a pure function — no side effects, no shared state,
//! deterministic for fixed inputs. Each algorithm works on a private
//! [`RunState`] arena of process slots instead of mutating its inputs,
//! and returns a fresh [`Timeline`].
//!
//! # Module structure
//!
//! | Sub-module | Discipline |
//! |---|---|
//! | [`fcfs`] | first-come-first-served |
//! | [`sjf`] | shortest-job-first, non-preemptive |
//! | [`priority`] | priority, preemptive and non-preemptive |
//! | [`round_robin`] | round robin with a fixed quantum |
//! | [`multilevel`] | multilevel feedback queues |

pub mod fcfs;
pub mod multilevel;
pub mod priority;
pub mod round_robin;
pub mod sjf;

use crate::algorithm::Algorithm;
use crate::error::{KairosError, KairosResult};
use crate::process::{validate_processes, Process, ProcessId};
use crate::timeline::{Slice, Timeline};

/// Compute the execution timeline for a process set under the given
/// discipline.
///
/// Fails atomically: all input validation happens before any
/// scheduling work, so an `Err` never corresponds to a partially
/// computed timeline.
pub fn schedule(processes: &[Process], algorithm: Algorithm) -> KairosResult<Timeline> {
    validate_processes(processes)?;
    validate_parameters(algorithm)?;

    let timeline = match algorithm {
        Algorithm::Fcfs => fcfs::run(processes),
        Algorithm::Sjf => sjf::run(processes),
        Algorithm::PriorityPreemptive => priority::run_preemptive(processes),
        Algorithm::PriorityNonPreemptive => priority::run_non_preemptive(processes),
        Algorithm::RoundRobin { quantum } => round_robin::run(processes, quantum),
        Algorithm::Multilevel { levels, usage_limit } => {
            multilevel::run(processes, levels, usage_limit)
        }
    };

    debug_assert!(
        timeline.verify(processes).is_ok(),
        "scheduler produced an invariant-violating timeline"
    );
    Ok(timeline)
}

/// Parameter checks for algorithm values constructed directly (the
/// string boundary already validates parsed ones).
pub(crate) fn validate_parameters(algorithm: Algorithm) -> KairosResult<()> {
    match algorithm {
        Algorithm::RoundRobin { quantum } if quantum == 0 => Err(KairosError::ZeroQuantum),
        Algorithm::Multilevel { levels, .. } if levels == 0 => {
            Err(KairosError::InvalidLevelCount)
        }
        Algorithm::Multilevel { usage_limit, .. } if usage_limit == 0 => {
            Err(KairosError::InvalidUsageLimit)
        }
        _ => Ok(()),
    }
}

// ── Run state ─────────────────────────────────────────────────────────

/// One process's mutable bookkeeping during a scheduling run.
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub id: ProcessId,
    pub arrival: u64,
    pub exec_time: u64,
    pub priority: i32,
    pub remaining: u64,
}

/// The arena of process slots one scheduling run works on.
///
/// Slots are held in `(arrival, id)` order — the global tie-break order
/// — so "first by arrival" is always "first in the vector" and every
/// linear scan resolves ties deterministically.
#[derive(Debug, Clone)]
pub(crate) struct RunState {
    pub slots: Vec<Slot>,
}

impl RunState {
    pub fn new(processes: &[Process]) -> Self {
        let mut slots: Vec<Slot> = processes
            .iter()
            .map(|p| Slot {
                id: p.id,
                arrival: p.arrival.ticks(),
                exec_time: p.exec_time,
                priority: p.priority,
                remaining: p.exec_time,
            })
            .collect();
        slots.sort_by(|a, b| a.arrival.cmp(&b.arrival).then(a.id.cmp(&b.id)));
        RunState { slots }
    }

    pub fn all_finished(&self) -> bool {
        self.slots.iter().all(|s| s.remaining == 0)
    }

    /// Earliest arrival among unfinished slots; the idle-CPU jump
    /// target when nothing is ready.
    pub fn earliest_pending_arrival(&self) -> Option<u64> {
        self.slots
            .iter()
            .find(|s| s.remaining > 0)
            .map(|s| s.arrival)
    }
}

// ── Slice accumulator ─────────────────────────────────────────────────

/// Collects slices in dispatch order, merging contiguous runs of the
/// same process into a single slice.
///
/// Used by the tick-granular disciplines: a preemptive run emits one
/// slice per maximal run of consecutive ticks on the same process, not
/// one slice per tick.
#[derive(Debug, Default)]
pub(crate) struct SliceAccumulator {
    slices: Vec<Slice>,
}

impl SliceAccumulator {
    pub fn new() -> Self {
        SliceAccumulator { slices: Vec::new() }
    }

    pub fn push(&mut self, process: ProcessId, start: u64, end: u64) {
        debug_assert!(end > start, "empty slice pushed");
        if let Some(last) = self.slices.last_mut() {
            if last.process == process && last.end.ticks() == start {
                last.end = crate::time::SimTime::new(end);
                return;
            }
        }
        self.slices.push(Slice::new(process, start, end));
    }

    pub fn into_timeline(self) -> Timeline {
        Timeline::from_ordered(self.slices)
    }
}
