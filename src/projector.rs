//! State projector — reconstructs every process's lifecycle state and
//! derived metrics for an arbitrary query time.
//!
//! `project` is a pure function over `(timeline, processes, t)`: it
//! recomputes everything from scratch on every call and caches nothing
//! between calls. That is a deliberate invariant — scrubbing backward,
//! stepping forward, and restarting all produce bit-identical results
//! to a fresh computation at the same instant, leaving no room for
//! incremental-state drift.

use crate::process::{Process, ProcessId};
use crate::time::SimTime;
use crate::timeline::Timeline;

// ── Phase ─────────────────────────────────────────────────────────────

/// A process's lifecycle phase at a query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// The query time is before the process's arrival.
    NotArrived,
    /// Arrived but not holding the CPU.
    Ready,
    /// Held the CPU during the tick ending at the query time.
    Running,
    /// All demanded ticks executed.
    Finished,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::NotArrived => "Not Arrived",
            Phase::Ready => "Ready",
            Phase::Running => "Running",
            Phase::Finished => "Finished",
        };
        f.write_str(s)
    }
}

// ── ProcessSnapshot ───────────────────────────────────────────────────

/// One process's derived state at a query time. Never stored or
/// mutated incrementally; always recomputed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessSnapshot {
    pub id: ProcessId,
    pub phase: Phase,
    /// Ticks executed strictly before the query time.
    pub executed: u64,
    /// Ticks still owed; zero once finished.
    pub remaining: u64,
    /// Ticks spent ready-but-not-running; frozen at completion.
    pub waiting_time: u64,
    /// Completion minus arrival; zero until finished.
    pub turnaround_time: u64,
    /// First dispatch minus arrival; zero until first dispatched.
    pub response_time: u64,
    /// Absolute time of the first dispatch, if it has happened.
    pub first_response_time: Option<SimTime>,
    /// Absolute completion time, once finished.
    pub completion_time: Option<SimTime>,
}

// ── Metrics ───────────────────────────────────────────────────────────

/// Aggregate metrics at a query time. Averages are restricted to the
/// processes they apply to: waiting over arrived processes, turnaround
/// over finished ones, response over first-dispatched ones.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    /// Fraction of elapsed ticks the CPU spent executing, in `[0, 1]`.
    pub cpu_utilization: f64,
    /// Finished processes per elapsed tick.
    pub throughput: f64,
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
    pub avg_response: f64,
    /// Number of finished processes.
    pub finished: usize,
}

/// The full projection for one query time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection {
    pub at: SimTime,
    pub processes: Vec<ProcessSnapshot>,
    pub metrics: Metrics,
}

// ── Projection ────────────────────────────────────────────────────────

/// Project every process's state and the aggregate metrics at time `t`,
/// using only slices that started before `t`.
pub fn project(timeline: &Timeline, processes: &[Process], t: SimTime) -> Projection {
    let snapshots: Vec<ProcessSnapshot> = processes
        .iter()
        .map(|p| snapshot(timeline, p, t))
        .collect();

    let metrics = aggregate(&snapshots, processes, t);
    Projection {
        at: t,
        processes: snapshots,
        metrics,
    }
}

fn snapshot(timeline: &Timeline, process: &Process, t: SimTime) -> ProcessSnapshot {
    let executed = timeline.executed_before(process.id, t);
    let remaining = process.exec_time - executed;
    let finished = remaining == 0;

    let visible_slices = || timeline.slices_for(process.id).filter(|s| s.start < t);

    let first_response_time = visible_slices().map(|s| s.start).min();
    let completion_time = if finished {
        timeline.slices_for(process.id).map(|s| s.end).max()
    } else {
        None
    };

    let phase = if finished {
        Phase::Finished
    } else if visible_slices().last().is_some_and(|s| s.end >= t) {
        Phase::Running
    } else if process.arrival > t {
        Phase::NotArrived
    } else {
        Phase::Ready
    };

    // Waiting stops accruing at completion; until then it is the
    // arrived-but-not-executed portion of elapsed time.
    let reference = completion_time.unwrap_or(t).ticks();
    let waiting_time = reference
        .saturating_sub(process.arrival.ticks())
        .saturating_sub(executed);

    let turnaround_time = completion_time
        .and_then(|c| c.duration_since(process.arrival))
        .unwrap_or(0);

    let response_time = first_response_time
        .and_then(|r| r.duration_since(process.arrival))
        .unwrap_or(0);

    ProcessSnapshot {
        id: process.id,
        phase,
        executed,
        remaining,
        waiting_time,
        turnaround_time,
        response_time,
        first_response_time,
        completion_time,
    }
}

fn aggregate(snapshots: &[ProcessSnapshot], processes: &[Process], t: SimTime) -> Metrics {
    let ticks = t.ticks();
    let finished = snapshots.iter().filter(|s| s.phase == Phase::Finished).count();

    let executed_total: u64 = snapshots.iter().map(|s| s.executed).sum();
    let cpu_utilization = if ticks > 0 {
        executed_total as f64 / ticks as f64
    } else {
        0.0
    };
    let throughput = if ticks > 0 {
        finished as f64 / ticks as f64
    } else {
        0.0
    };

    let arrived: Vec<&ProcessSnapshot> = snapshots
        .iter()
        .zip(processes)
        .filter(|(_, p)| p.arrival <= t)
        .map(|(s, _)| s)
        .collect();
    let avg_waiting = mean(arrived.iter().map(|s| s.waiting_time));

    let avg_turnaround = mean(
        snapshots
            .iter()
            .filter(|s| s.phase == Phase::Finished)
            .map(|s| s.turnaround_time),
    );

    let avg_response = mean(
        snapshots
            .iter()
            .filter(|s| s.first_response_time.is_some())
            .map(|s| s.response_time),
    );

    Metrics {
        cpu_utilization,
        throughput,
        avg_waiting,
        avg_turnaround,
        avg_response,
        finished,
    }
}

fn mean(values: impl Iterator<Item = u64>) -> f64 {
    let mut sum = 0u64;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
