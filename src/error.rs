//! Structured error types for kairos.
//!
//! All fallible public APIs return `Result<T, KairosError>`. Input
//! problems are rejected before any scheduling work begins, so a failed
//! call never leaves a partially built timeline behind.

use crate::process::ProcessId;

/// The top-level error type for the scheduling engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum KairosError {
    // ── Input validation ──────────────────────────────────

    /// The process set is empty.
    EmptyProcessSet,

    /// Two processes share the same ID.
    DuplicateProcessId(ProcessId),

    /// A process demands zero CPU time.
    ZeroExecTime(ProcessId),

    /// An event offset is at or past the process's total demand.
    EventOutOfRange {
        process: ProcessId,
        offset: u64,
        exec_time: u64,
    },

    /// A process's event list is not sorted by offset.
    UnsortedEvents(ProcessId),

    // ── Algorithm parameters ──────────────────────────────

    /// Round Robin was selected without a quantum.
    MissingQuantum,

    /// Round Robin was given a zero quantum.
    ZeroQuantum,

    /// Multilevel was selected without a level count, or with zero.
    InvalidLevelCount,

    /// Multilevel was selected without a usage limit, or with zero.
    InvalidUsageLimit,

    // ── Serialization boundary ────────────────────────────

    /// An algorithm identifier did not match any known algorithm.
    /// Only surfaced by strict parsing; the lenient path falls back
    /// to FCFS instead.
    UnknownAlgorithm(String),

    // ── Timeline verification ─────────────────────────────

    /// A timeline (typically a remote result) violates the structural
    /// invariants: ordering, non-overlap, duration sums, or arrivals.
    TimelineViolation(String),
}

impl std::fmt::Display for KairosError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KairosError::EmptyProcessSet => write!(f, "process set is empty"),
            KairosError::DuplicateProcessId(id) => {
                write!(f, "duplicate process id {}", id)
            }
            KairosError::ZeroExecTime(id) => {
                write!(f, "process {} has zero execution time", id)
            }
            KairosError::EventOutOfRange { process, offset, exec_time } => write!(
                f,
                "process {} has an event at offset {} but only executes {} ticks",
                process, offset, exec_time
            ),
            KairosError::UnsortedEvents(id) => {
                write!(f, "process {} has events out of offset order", id)
            }
            KairosError::MissingQuantum => {
                write!(f, "round robin requires a quantum")
            }
            KairosError::ZeroQuantum => {
                write!(f, "round robin quantum must be positive")
            }
            KairosError::InvalidLevelCount => {
                write!(f, "multilevel requires a positive level count")
            }
            KairosError::InvalidUsageLimit => {
                write!(f, "multilevel requires a positive usage limit")
            }
            KairosError::UnknownAlgorithm(id) => {
                write!(f, "unknown algorithm id {:?}", id)
            }
            KairosError::TimelineViolation(msg) => {
                write!(f, "timeline invariant violated: {}", msg)
            }
        }
    }
}

impl std::error::Error for KairosError {}

/// Convenience alias for `Result<T, KairosError>`.
pub type KairosResult<T> = Result<T, KairosError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessId;

    #[test]
    fn test_error_display_empty_set() {
        let e = KairosError::EmptyProcessSet;
        assert_eq!(e.to_string(), "process set is empty");
    }

    #[test]
    fn test_error_display_event_out_of_range() {
        let e = KairosError::EventOutOfRange {
            process: ProcessId::new(2),
            offset: 9,
            exec_time: 5,
        };
        let s = e.to_string();
        assert!(s.contains("P2"));
        assert!(s.contains("offset 9"));
    }

    #[test]
    fn test_error_display_unknown_algorithm() {
        let e = KairosError::UnknownAlgorithm("LIFO".into());
        assert!(e.to_string().contains("LIFO"));
    }

    #[test]
    fn test_error_is_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(KairosError::MissingQuantum);
        assert!(!e.to_string().is_empty());
    }

    #[test]
    fn test_kairos_result_ok() {
        let r: KairosResult<u32> = Ok(42);
        assert_eq!(r.unwrap(), 42);
    }

    #[test]
    fn test_kairos_result_err() {
        let r: KairosResult<u32> = Err(KairosError::ZeroQuantum);
        assert!(r.is_err());
    }
}
