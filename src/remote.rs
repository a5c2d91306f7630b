//! Remote scheduling boundary with deterministic local fallback.
//!
//! The actual transport (HTTP client, IPC, whatever) lives outside the
//! core; this module fixes the contract it must satisfy: the same input
//! shape as the local scheduler, a response that passes the full
//! [`Timeline`] invariant check, and — on *any* failure — a fallback to
//! the local pure scheduler. Local and remote results are contractually
//! interchangeable, so callers never need to know which side computed
//! their timeline beyond the reported [`ScheduleSource`].

use crate::algorithm::Algorithm;
use crate::error::{KairosError, KairosResult};
use crate::process::{validate_processes, Process};
use crate::sched;
use crate::timeline::{Slice, Timeline};

// ── TransportError ────────────────────────────────────────────────────

/// Why a remote submission failed. Never fatal to the simulation — the
/// fallback combinator recovers every variant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum TransportError {
    /// No response within the transport's deadline.
    Timeout { after_ms: u64 },
    /// Connection-level failure (DNS, refused, reset).
    Connection(String),
    /// The remote answered with a non-success status.
    Status(u16),
    /// The response arrived but could not be decoded.
    MalformedResponse(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Timeout { after_ms } => {
                write!(f, "remote scheduler timed out after {}ms", after_ms)
            }
            TransportError::Connection(msg) => write!(f, "connection failed: {}", msg),
            TransportError::Status(code) => write!(f, "remote returned status {}", code),
            TransportError::MalformedResponse(msg) => {
                write!(f, "malformed response: {}", msg)
            }
        }
    }
}

impl std::error::Error for TransportError {}

// ── Wire shapes ───────────────────────────────────────────────────────

/// The request submitted to a remote scheduler — exactly the local
/// scheduler's input, flattened to wire-friendly fields.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleRequest {
    pub processes: Vec<Process>,
    /// Canonical algorithm identifier.
    pub algorithm: String,
    pub quantum: Option<u64>,
    pub levels: Option<usize>,
    pub usage_limit: Option<u32>,
}

impl ScheduleRequest {
    pub fn new(processes: &[Process], algorithm: Algorithm) -> Self {
        let (quantum, levels, usage_limit) = match algorithm {
            Algorithm::RoundRobin { quantum } => (Some(quantum), None, None),
            Algorithm::Multilevel { levels, usage_limit } => {
                (None, Some(levels), Some(usage_limit))
            }
            _ => (None, None, None),
        };
        ScheduleRequest {
            processes: processes.to_vec(),
            algorithm: algorithm.id().to_string(),
            quantum,
            levels,
            usage_limit,
        }
    }
}

/// A remote scheduler's answer: the timeline as ordered slice records.
/// Accepted only after passing the full invariant check.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleResponse {
    pub slices: Vec<Slice>,
}

// ── Transport ─────────────────────────────────────────────────────────

/// The boundary a transport implementation must satisfy.
///
/// Implementations own their timeout policy; a blocking transport must
/// give up on its own and return [`TransportError::Timeout`] rather
/// than stall the caller indefinitely.
pub trait ScheduleTransport {
    fn execute(&mut self, request: &ScheduleRequest) -> Result<ScheduleResponse, TransportError>;
}

// ── Fallback combinator ───────────────────────────────────────────────

/// Why the local scheduler was used despite a transport being present.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum FallbackCause {
    /// The transport itself failed.
    Transport(TransportError),
    /// The response decoded but violated a timeline invariant.
    InvalidTimeline(String),
}

/// Which side produced the timeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum ScheduleSource {
    /// No transport configured; computed locally.
    Local,
    /// The remote result was accepted.
    Remote,
    /// The remote attempt failed; the local scheduler recovered.
    LocalFallback(FallbackCause),
}

/// The timeline together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleOutcome {
    pub timeline: Timeline,
    pub source: ScheduleSource,
}

/// Schedule via the transport when one is given, falling back to the
/// local scheduler on any failure.
///
/// Input validation runs first either way, so an invalid process set is
/// rejected identically whether or not a transport is configured —
/// remote submission never launders bad input.
pub fn schedule_with_fallback(
    processes: &[Process],
    algorithm: Algorithm,
    transport: Option<&mut dyn ScheduleTransport>,
) -> KairosResult<ScheduleOutcome> {
    validate_processes(processes)?;
    sched::validate_parameters(algorithm)?;

    let Some(transport) = transport else {
        let timeline = sched::schedule(processes, algorithm)?;
        return Ok(ScheduleOutcome {
            timeline,
            source: ScheduleSource::Local,
        });
    };

    let request = ScheduleRequest::new(processes, algorithm);
    let cause = match transport.execute(&request) {
        Ok(response) => match Timeline::from_slices(response.slices, processes) {
            Ok(timeline) => {
                return Ok(ScheduleOutcome {
                    timeline,
                    source: ScheduleSource::Remote,
                })
            }
            Err(KairosError::TimelineViolation(msg)) => FallbackCause::InvalidTimeline(msg),
            Err(other) => return Err(other),
        },
        Err(error) => FallbackCause::Transport(error),
    };

    let timeline = sched::schedule(processes, algorithm)?;
    Ok(ScheduleOutcome {
        timeline,
        source: ScheduleSource::LocalFallback(cause),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessId;

    /// A well-behaved remote: computes the same pure schedule.
    struct CompliantTransport;

    impl ScheduleTransport for CompliantTransport {
        fn execute(
            &mut self,
            request: &ScheduleRequest,
        ) -> Result<ScheduleResponse, TransportError> {
            let algorithm = crate::algorithm::Algorithm::from_id(
                &request.algorithm,
                crate::algorithm::AlgorithmParams {
                    quantum: request.quantum,
                    levels: request.levels,
                    usage_limit: request.usage_limit,
                },
            )
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;
            let timeline = sched::schedule(&request.processes, algorithm)
                .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;
            Ok(ScheduleResponse {
                slices: timeline.slices().to_vec(),
            })
        }
    }

    /// A remote that never answers in time.
    struct DeadTransport;

    impl ScheduleTransport for DeadTransport {
        fn execute(&mut self, _: &ScheduleRequest) -> Result<ScheduleResponse, TransportError> {
            Err(TransportError::Timeout { after_ms: 5000 })
        }
    }

    /// A remote that answers with an invariant-violating timeline.
    struct CorruptTransport;

    impl ScheduleTransport for CorruptTransport {
        fn execute(&mut self, _: &ScheduleRequest) -> Result<ScheduleResponse, TransportError> {
            Ok(ScheduleResponse {
                slices: vec![
                    Slice::new(ProcessId::new(1), 0, 4),
                    Slice::new(ProcessId::new(2), 2, 6),
                ],
            })
        }
    }

    fn processes() -> Vec<Process> {
        vec![Process::new(1, 0, 4), Process::new(2, 1, 3)]
    }

    #[test]
    fn test_no_transport_computes_locally() {
        let outcome =
            schedule_with_fallback(&processes(), Algorithm::Fcfs, None).unwrap();
        assert_eq!(outcome.source, ScheduleSource::Local);
        assert_eq!(outcome.timeline.total_time().ticks(), 7);
    }

    #[test]
    fn test_compliant_remote_accepted() {
        let mut transport = CompliantTransport;
        let outcome =
            schedule_with_fallback(&processes(), Algorithm::Fcfs, Some(&mut transport))
                .unwrap();
        assert_eq!(outcome.source, ScheduleSource::Remote);
    }

    #[test]
    fn test_remote_and_local_results_interchangeable() {
        let mut transport = CompliantTransport;
        let remote =
            schedule_with_fallback(&processes(), Algorithm::RoundRobin { quantum: 2 }, Some(&mut transport))
                .unwrap();
        let local =
            schedule_with_fallback(&processes(), Algorithm::RoundRobin { quantum: 2 }, None)
                .unwrap();
        assert_eq!(remote.timeline, local.timeline);
    }

    #[test]
    fn test_timeout_falls_back_to_local() {
        let mut transport = DeadTransport;
        let outcome =
            schedule_with_fallback(&processes(), Algorithm::Fcfs, Some(&mut transport))
                .unwrap();
        assert_eq!(
            outcome.source,
            ScheduleSource::LocalFallback(FallbackCause::Transport(TransportError::Timeout {
                after_ms: 5000
            }))
        );
        // The fallback timeline equals a pure local run.
        let local = sched::schedule(&processes(), Algorithm::Fcfs).unwrap();
        assert_eq!(outcome.timeline, local);
    }

    #[test]
    fn test_invalid_remote_timeline_falls_back() {
        let mut transport = CorruptTransport;
        let outcome =
            schedule_with_fallback(&processes(), Algorithm::Fcfs, Some(&mut transport))
                .unwrap();
        assert!(matches!(
            outcome.source,
            ScheduleSource::LocalFallback(FallbackCause::InvalidTimeline(_))
        ));
        let local = sched::schedule(&processes(), Algorithm::Fcfs).unwrap();
        assert_eq!(outcome.timeline, local);
    }

    #[test]
    fn test_invalid_input_rejected_before_submission() {
        // An empty set must fail identically with or without a
        // transport; the remote never sees it.
        let mut transport = CompliantTransport;
        assert_eq!(
            schedule_with_fallback(&[], Algorithm::Fcfs, Some(&mut transport)),
            Err(KairosError::EmptyProcessSet)
        );
    }

    #[test]
    fn test_invalid_parameters_rejected_before_submission() {
        let mut transport = CompliantTransport;
        assert_eq!(
            schedule_with_fallback(
                &processes(),
                Algorithm::RoundRobin { quantum: 0 },
                Some(&mut transport)
            ),
            Err(KairosError::ZeroQuantum)
        );
    }

    #[test]
    fn test_request_carries_algorithm_parameters() {
        let request =
            ScheduleRequest::new(&processes(), Algorithm::RoundRobin { quantum: 4 });
        assert_eq!(request.algorithm, "Round Robin");
        assert_eq!(request.quantum, Some(4));

        let request = ScheduleRequest::new(
            &processes(),
            Algorithm::Multilevel { levels: 3, usage_limit: 2 },
        );
        assert_eq!(request.levels, Some(3));
        assert_eq!(request.usage_limit, Some(2));
    }
}
