//! Algorithm selection — a closed set of scheduling disciplines.
//!
//! Internally every discipline is a tagged [`Algorithm`] variant
//! carrying its own parameters, so dispatch is exhaustive and the
//! "unknown algorithm" class of bugs cannot exist past the
//! serialization boundary. String identifiers only appear at that
//! boundary: [`Algorithm::from_id`] parses strictly, while
//! [`Algorithm::from_id_or_default`] preserves the historical
//! default-to-FCFS fallback for unrecognized identifiers.

use crate::error::{KairosError, KairosResult};

// ── Algorithm ─────────────────────────────────────────────────────────

/// A scheduling discipline together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// First-come-first-served: run in arrival order to completion.
    Fcfs,
    /// Shortest-job-first, non-preemptive.
    Sjf,
    /// Preemptive priority; lower values win, re-decided every tick.
    PriorityPreemptive,
    /// Non-preemptive priority; decided only at run boundaries.
    PriorityNonPreemptive,
    /// Round robin with a fixed time quantum.
    RoundRobin { quantum: u64 },
    /// Multilevel feedback queues with usage-based demotion.
    Multilevel { levels: usize, usage_limit: u32 },
}

/// Optional parameters accompanying an algorithm identifier at the
/// serialization boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AlgorithmParams {
    /// Time quantum; required for Round Robin.
    pub quantum: Option<u64>,
    /// Priority-level count; required for Multilevel.
    pub levels: Option<usize>,
    /// CPU-usage demotion threshold; required for Multilevel.
    pub usage_limit: Option<u32>,
}

impl Algorithm {
    /// The canonical string identifier used on the wire.
    pub fn id(&self) -> &'static str {
        match self {
            Algorithm::Fcfs => "FCFS",
            Algorithm::Sjf => "SJF",
            Algorithm::PriorityPreemptive => "Priority-Preemptive",
            Algorithm::PriorityNonPreemptive => "Priority-Non-Preemptive",
            Algorithm::RoundRobin { .. } => "Round Robin",
            Algorithm::Multilevel { .. } => "Multilevel",
        }
    }

    /// Whether this discipline needs a quantum parameter.
    pub fn requires_quantum(&self) -> bool {
        matches!(self, Algorithm::RoundRobin { .. })
    }

    /// Parse an identifier strictly: unknown identifiers are an error.
    ///
    /// Parameter validation happens here so that a request either
    /// yields a fully formed `Algorithm` or fails before scheduling.
    pub fn from_id(id: &str, params: AlgorithmParams) -> KairosResult<Algorithm> {
        match id {
            "FCFS" => Ok(Algorithm::Fcfs),
            "SJF" => Ok(Algorithm::Sjf),
            "Priority-Preemptive" => Ok(Algorithm::PriorityPreemptive),
            "Priority-Non-Preemptive" => Ok(Algorithm::PriorityNonPreemptive),
            "Round Robin" => {
                let quantum = params.quantum.ok_or(KairosError::MissingQuantum)?;
                if quantum == 0 {
                    return Err(KairosError::ZeroQuantum);
                }
                Ok(Algorithm::RoundRobin { quantum })
            }
            "Multilevel" => {
                let levels = params.levels.ok_or(KairosError::InvalidLevelCount)?;
                let usage_limit = params.usage_limit.ok_or(KairosError::InvalidUsageLimit)?;
                if levels == 0 {
                    return Err(KairosError::InvalidLevelCount);
                }
                if usage_limit == 0 {
                    return Err(KairosError::InvalidUsageLimit);
                }
                Ok(Algorithm::Multilevel { levels, usage_limit })
            }
            other => Err(KairosError::UnknownAlgorithm(other.to_string())),
        }
    }

    /// Parse an identifier leniently: an unknown identifier falls back
    /// to FCFS.
    ///
    /// This is the documented, intentional backward-compatible behavior
    /// of the wire boundary — old clients sending retired identifiers
    /// still get a valid schedule. Known identifiers with invalid
    /// parameters still fail: only the *unknown id* case is recovered.
    pub fn from_id_or_default(id: &str, params: AlgorithmParams) -> KairosResult<Algorithm> {
        match Algorithm::from_id(id, params) {
            Err(KairosError::UnknownAlgorithm(_)) => Ok(Algorithm::Fcfs),
            other => other,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::RoundRobin { quantum } => {
                write!(f, "Round Robin (quantum {})", quantum)
            }
            Algorithm::Multilevel { levels, usage_limit } => {
                write!(f, "Multilevel ({} levels, limit {})", levels, usage_limit)
            }
            other => f.write_str(other.id()),
        }
    }
}

// ── Catalog ───────────────────────────────────────────────────────────

/// Descriptive metadata for one selectable algorithm, as served to
/// external configuration surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct AlgorithmInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub requires_quantum: bool,
}

/// The catalog of selectable algorithms, in presentation order.
pub fn catalog() -> &'static [AlgorithmInfo] {
    &[
        AlgorithmInfo {
            id: "FCFS",
            name: "First Come First Served (FCFS)",
            description: "Processes are executed in the order they arrive",
            requires_quantum: false,
        },
        AlgorithmInfo {
            id: "SJF",
            name: "Shortest Job First (SJF)",
            description: "Process with shortest burst time is executed first",
            requires_quantum: false,
        },
        AlgorithmInfo {
            id: "Priority-Preemptive",
            name: "Priority Scheduling (Preemptive)",
            description: "Higher priority processes can preempt lower priority ones",
            requires_quantum: false,
        },
        AlgorithmInfo {
            id: "Priority-Non-Preemptive",
            name: "Priority Scheduling (Non-Preemptive)",
            description: "Higher priority processes are scheduled first without preemption",
            requires_quantum: false,
        },
        AlgorithmInfo {
            id: "Round Robin",
            name: "Round Robin (RR)",
            description: "Each process gets a fixed time quantum in circular order",
            requires_quantum: true,
        },
        AlgorithmInfo {
            id: "Multilevel",
            name: "Multilevel Feedback Queues",
            description: "Per-priority queues with usage-based demotion between levels",
            requires_quantum: false,
        },
    ]
}
