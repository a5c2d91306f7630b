//! Process model — the immutable description of a schedulable unit.
//!
//! A [`Process`] carries everything the schedulers need: arrival time,
//! total CPU demand, priority, and a list of internal [`CpuEvent`]s
//! pinned to execution offsets. Processes are owned by the caller and
//! never mutated by the engine; every scheduling run works on its own
//! private run state.

use crate::error::{KairosError, KairosResult};
use crate::time::SimTime;

// ── Process ID ────────────────────────────────────────────────────────

/// A unique identifier for a simulated process.
///
/// `ProcessId` is intentionally a newtype around `u32` rather than a
/// bare integer to prevent accidental confusion with other integer
/// values (tick counts, priorities, offsets) at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessId(u32);

impl ProcessId {
    /// Create a process ID from a raw integer.
    #[inline]
    pub fn new(id: u32) -> Self {
        ProcessId(id)
    }

    /// Return the underlying integer.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

// ── CPU Event ─────────────────────────────────────────────────────────

/// An internal event occurring after `offset` ticks of *executed* CPU
/// time.
///
/// Offsets count executed ticks, not wall-clock ticks: a process
/// preempted for 10 ticks fires an event at `offset = 3` during its
/// third tick on the CPU regardless of how long it sat in the ready
/// queue. The [event correlator](crate::correlate) maps offsets to
/// absolute simulated times once a timeline exists.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct CpuEvent {
    /// Executed-ticks offset within the owning process, `< exec_time`.
    pub offset: u64,
    /// Human-readable operation description.
    pub label: String,
}

impl CpuEvent {
    /// Convenience constructor.
    pub fn new(offset: u64, label: impl Into<String>) -> Self {
        CpuEvent {
            offset,
            label: label.into(),
        }
    }
}

// ── Process ───────────────────────────────────────────────────────────

/// An immutable description of a schedulable unit.
///
/// Invariants (checked by [`Process::validate`]):
/// - `exec_time > 0`
/// - `events` sorted ascending by `offset`
/// - every event `offset < exec_time`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Process {
    /// Unique, stable identifier.
    pub id: ProcessId,
    /// Simulated time at which the process becomes eligible to run.
    pub arrival: SimTime,
    /// Total CPU demand in ticks.
    pub exec_time: u64,
    /// Scheduling priority; numerically lower values are more urgent.
    pub priority: i32,
    /// Internal events, sorted ascending by executed-ticks offset.
    pub events: Vec<CpuEvent>,
}

impl Process {
    /// Create a process without events and with default priority 0.
    pub fn new(id: u32, arrival: u64, exec_time: u64) -> Self {
        Process {
            id: ProcessId::new(id),
            arrival: SimTime::new(arrival),
            exec_time,
            priority: 0,
            events: Vec::new(),
        }
    }

    /// Builder-style priority setter.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Builder-style event attachment. Events must be added in offset
    /// order; [`Process::validate`] rejects out-of-order lists.
    pub fn with_event(mut self, offset: u64, label: impl Into<String>) -> Self {
        self.events.push(CpuEvent::new(offset, label));
        self
    }

    /// Check the per-process invariants.
    pub fn validate(&self) -> KairosResult<()> {
        if self.exec_time == 0 {
            return Err(KairosError::ZeroExecTime(self.id));
        }
        for pair in self.events.windows(2) {
            if pair[1].offset < pair[0].offset {
                return Err(KairosError::UnsortedEvents(self.id));
            }
        }
        for event in &self.events {
            if event.offset >= self.exec_time {
                return Err(KairosError::EventOutOfRange {
                    process: self.id,
                    offset: event.offset,
                    exec_time: self.exec_time,
                });
            }
        }
        Ok(())
    }
}

/// Validate a whole process set: per-process invariants, non-emptiness,
/// and ID uniqueness. Called by the scheduler before any work starts so
/// failures are atomic.
pub fn validate_processes(processes: &[Process]) -> KairosResult<()> {
    if processes.is_empty() {
        return Err(KairosError::EmptyProcessSet);
    }
    let mut seen: Vec<ProcessId> = Vec::with_capacity(processes.len());
    for process in processes {
        process.validate()?;
        if seen.contains(&process.id) {
            return Err(KairosError::DuplicateProcessId(process.id));
        }
        seen.push(process.id);
    }
    Ok(())
}
