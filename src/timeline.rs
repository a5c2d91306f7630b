//! Timeline — the ordered sequence of CPU-execution slices produced by
//! a scheduling run.
//!
//! A [`Timeline`] is produced once per `(processes, algorithm)` pair
//! and is immutable afterward; changing any input means recomputing the
//! whole thing. The structural invariants (ordering, non-overlap,
//! per-process duration sums, arrival bounds) are enforced by
//! [`Timeline::verify`], which is also the acceptance check applied to
//! timelines returned by a remote scheduler.

use crate::error::{KairosError, KairosResult};
use crate::process::{Process, ProcessId};
use crate::time::SimTime;

// ── Slice ─────────────────────────────────────────────────────────────

/// One contiguous assignment of the CPU to a process over `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Slice {
    /// The process holding the CPU.
    pub process: ProcessId,
    /// First tick of the slice (inclusive).
    pub start: SimTime,
    /// End of the slice (exclusive); always `> start`.
    pub end: SimTime,
}

impl Slice {
    /// Convenience constructor from raw ticks.
    pub fn new(process: ProcessId, start: u64, end: u64) -> Self {
        Slice {
            process,
            start: SimTime::new(start),
            end: SimTime::new(end),
        }
    }

    /// Slice length in ticks.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.end.ticks() - self.start.ticks()
    }
}

impl std::fmt::Display for Slice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.process, self.start.ticks(), self.end.ticks())
    }
}

// ── Timeline ──────────────────────────────────────────────────────────

/// The ordered, non-overlapping sequence of execution slices for one
/// scheduling run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeline {
    slices: Vec<Slice>,
}

impl Timeline {
    /// Wrap slices the schedulers produced. The schedulers emit slices
    /// in dispatch order, so ordering holds by construction; the
    /// scheduling entry point still double-checks in debug builds.
    pub(crate) fn from_ordered(slices: Vec<Slice>) -> Self {
        Timeline { slices }
    }

    /// Build a timeline from untrusted slices (e.g. a remote response),
    /// verifying every structural invariant against the process set.
    pub fn from_slices(slices: Vec<Slice>, processes: &[Process]) -> KairosResult<Timeline> {
        let timeline = Timeline { slices };
        timeline.verify(processes)?;
        Ok(timeline)
    }

    /// All slices in start order.
    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Whether the timeline holds no slices.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// The instant the last slice ends; total simulated duration.
    pub fn total_time(&self) -> SimTime {
        self.slices
            .iter()
            .map(|s| s.end)
            .max()
            .unwrap_or(SimTime::ZERO)
    }

    /// The slices belonging to one process, in chronological order.
    pub fn slices_for(&self, process: ProcessId) -> impl Iterator<Item = &Slice> {
        self.slices.iter().filter(move |s| s.process == process)
    }

    /// Ticks `process` has executed strictly before `t`, counting only
    /// slices that have started (`start < t`) and truncating the one
    /// still in progress.
    pub fn executed_before(&self, process: ProcessId, t: SimTime) -> u64 {
        self.slices_for(process)
            .filter(|s| s.start < t)
            .map(|s| s.end.min(t).ticks() - s.start.ticks())
            .sum()
    }

    /// Check every structural invariant against the process set:
    ///
    /// - each slice is non-empty and references a known process
    /// - slices are sorted by start and mutually non-overlapping
    /// - no slice starts before its process arrives
    /// - per-process slice durations sum to exactly `exec_time`
    pub fn verify(&self, processes: &[Process]) -> KairosResult<()> {
        for slice in &self.slices {
            if slice.end <= slice.start {
                return Err(KairosError::TimelineViolation(format!(
                    "slice {} is empty or reversed",
                    slice
                )));
            }
            let process = processes
                .iter()
                .find(|p| p.id == slice.process)
                .ok_or_else(|| {
                    KairosError::TimelineViolation(format!(
                        "slice references unknown process {}",
                        slice.process
                    ))
                })?;
            if slice.start < process.arrival {
                return Err(KairosError::TimelineViolation(format!(
                    "slice {} starts before arrival {}",
                    slice, process.arrival
                )));
            }
        }

        for pair in self.slices.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(KairosError::TimelineViolation(format!(
                    "slices {} and {} overlap or are out of order",
                    pair[0], pair[1]
                )));
            }
        }

        for process in processes {
            let total: u64 = self.slices_for(process.id).map(|s| s.duration()).sum();
            if total != process.exec_time {
                return Err(KairosError::TimelineViolation(format!(
                    "process {} executes {} ticks, expected {}",
                    process.id, total, process.exec_time
                )));
            }
        }

        Ok(())
    }
}
