//! Step-by-step simulator API for external interfaces.
//!
//! Wraps a computed schedule and its clock behind a controlled surface:
//! step control, state inspection, and JSON export. This is the
//! foundation for the WASM export, CLI tools, and any FFI.
//!
//! JSON export goes through `serde_json` when the `serialize` feature
//! is enabled and a manual deterministic writer otherwise.

use crate::algorithm::{self, Algorithm};
use crate::clock::{ClockState, SimClock};
use crate::correlate::annotate;
use crate::error::KairosResult;
use crate::process::Process;
use crate::projector::{Phase, Projection};
use crate::remote::{schedule_with_fallback, ScheduleSource, ScheduleTransport};
use crate::timeline::Timeline;

// ── StepResult ────────────────────────────────────────────────────────

/// Result of a single simulation step.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct StepResult {
    /// Simulated time after the step.
    pub time: u64,
    /// What the CPU is doing at this instant.
    pub description: String,
    /// Finished process count so far.
    pub finished: usize,
}

// ── SimulatorApi ──────────────────────────────────────────────────────

/// High-level API wrapping one scheduling run for external consumption.
pub struct SimulatorApi {
    algorithm: Algorithm,
    clock: SimClock,
}

impl SimulatorApi {
    /// Schedule locally and wrap the result.
    pub fn new(processes: Vec<Process>, algorithm: Algorithm) -> KairosResult<Self> {
        let timeline = crate::sched::schedule(&processes, algorithm)?;
        Ok(SimulatorApi {
            algorithm,
            clock: SimClock::new(processes, timeline),
        })
    }

    /// Schedule through a remote transport with local fallback, and
    /// report which side produced the timeline.
    pub fn with_transport(
        processes: Vec<Process>,
        algorithm: Algorithm,
        transport: &mut dyn ScheduleTransport,
    ) -> KairosResult<(Self, ScheduleSource)> {
        let outcome = schedule_with_fallback(&processes, algorithm, Some(transport))?;
        let api = SimulatorApi {
            algorithm,
            clock: SimClock::new(processes, outcome.timeline),
        };
        Ok((api, outcome.source))
    }

    /// The discipline this run was scheduled under.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Advance one tick. Returns `None` once the simulation is over.
    pub fn step(&mut self) -> Option<StepResult> {
        if self.clock.state() == ClockState::Finished {
            return None;
        }
        self.clock.step();
        let projection = self.clock.projection();
        Some(StepResult {
            time: self.clock.now().ticks(),
            description: describe(&projection),
            finished: projection.metrics.finished,
        })
    }

    /// Step to the end of the timeline. Returns ticks advanced.
    pub fn run_to_end(&mut self) -> u64 {
        let start = self.clock.now().ticks();
        while self.step().is_some() {}
        self.clock.now().ticks() - start
    }

    /// Whether the clock has reached the end of the timeline.
    pub fn is_finished(&self) -> bool {
        self.clock.state() == ClockState::Finished
    }

    /// Current simulated time in ticks.
    pub fn current_time(&self) -> u64 {
        self.clock.now().ticks()
    }

    /// Fresh projection at the current time.
    pub fn projection(&self) -> Projection {
        self.clock.projection()
    }

    /// The computed timeline.
    pub fn timeline(&self) -> &Timeline {
        self.clock.timeline()
    }

    /// Access the underlying clock (play/pause/restart/speed).
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Mutable access to the underlying clock.
    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    // ── JSON Export ───────────────────────────────────────────

    /// Export the projection at the current time as a JSON string.
    #[cfg(feature = "serialize")]
    pub fn state_json(&self) -> String {
        serde_json::to_string_pretty(&self.clock.projection()).unwrap_or_else(|_| "{}".into())
    }

    /// Export the projection at the current time as a JSON string.
    #[cfg(not(feature = "serialize"))]
    pub fn state_json(&self) -> String {
        let projection = self.clock.projection();
        let mut s = String::from("{\n");

        s.push_str(&format!("  \"current_time\": {},\n", projection.at.ticks()));

        s.push_str("  \"processes\": [\n");
        for (i, p) in projection.processes.iter().enumerate() {
            s.push_str(&format!(
                "    {{\"id\": {}, \"phase\": \"{}\", \"executed\": {}, \"remaining\": {}, \"waiting\": {}, \"turnaround\": {}, \"response\": {}}}",
                p.id.raw(),
                p.phase,
                p.executed,
                p.remaining,
                p.waiting_time,
                p.turnaround_time,
                p.response_time,
            ));
            if i < projection.processes.len() - 1 {
                s.push(',');
            }
            s.push('\n');
        }
        s.push_str("  ],\n");

        s.push_str(&format!(
            "  \"metrics\": {{\"cpu_utilization\": {}, \"throughput\": {}, \"finished\": {}}}\n",
            projection.metrics.cpu_utilization,
            projection.metrics.throughput,
            projection.metrics.finished,
        ));

        s.push('}');
        s
    }

    /// Export the annotated timeline as a JSON array string.
    #[cfg(feature = "serialize")]
    pub fn timeline_json(&self) -> String {
        let annotated = annotate(self.clock.timeline(), self.clock.processes());
        serde_json::to_string_pretty(&annotated).unwrap_or_else(|_| "[]".into())
    }

    /// Export the annotated timeline as a JSON array string.
    #[cfg(not(feature = "serialize"))]
    pub fn timeline_json(&self) -> String {
        let annotated = annotate(self.clock.timeline(), self.clock.processes());
        let mut s = String::from("[\n");
        for (i, entry) in annotated.iter().enumerate() {
            s.push_str(&format!(
                "  {{\"process\": {}, \"start\": {}, \"end\": {}, \"events\": [",
                entry.slice.process.raw(),
                entry.slice.start.ticks(),
                entry.slice.end.ticks(),
            ));
            for (j, event) in entry.events.iter().enumerate() {
                let at = event.at.map(|t| t.ticks()).unwrap_or(0);
                s.push_str(&format!(
                    "{{\"offset\": {}, \"at\": {}, \"label\": \"{}\"}}",
                    event.offset,
                    at,
                    event.label.replace('"', "\\\""),
                ));
                if j < entry.events.len() - 1 {
                    s.push_str(", ");
                }
            }
            s.push_str("]}");
            if i < annotated.len() - 1 {
                s.push(',');
            }
            s.push('\n');
        }
        s.push(']');
        s
    }

    /// Export the algorithm catalog as a JSON array string.
    #[cfg(feature = "serialize")]
    pub fn algorithms_json() -> String {
        serde_json::to_string_pretty(algorithm::catalog()).unwrap_or_else(|_| "[]".into())
    }

    /// Export the algorithm catalog as a JSON array string.
    #[cfg(not(feature = "serialize"))]
    pub fn algorithms_json() -> String {
        let catalog = algorithm::catalog();
        let mut s = String::from("[\n");
        for (i, info) in catalog.iter().enumerate() {
            s.push_str(&format!(
                "  {{\"id\": \"{}\", \"name\": \"{}\", \"requires_quantum\": {}}}",
                info.id, info.name, info.requires_quantum,
            ));
            if i < catalog.len() - 1 {
                s.push(',');
            }
            s.push('\n');
        }
        s.push(']');
        s
    }
}

// ── Describe helpers ──────────────────────────────────────────────────

fn describe(projection: &Projection) -> String {
    let running = projection
        .processes
        .iter()
        .find(|p| p.phase == Phase::Running);
    match running {
        Some(p) => format!("{} running ({} remaining)", p.id, p.remaining),
        None if projection.metrics.finished == projection.processes.len() => {
            "all processes finished".to_string()
        }
        None => "cpu idle".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ScenarioBuilder;

    fn api() -> SimulatorApi {
        ScenarioBuilder::new()
            .process(1, 0, 3)
            .process(2, 1, 2)
            .build()
            .unwrap()
    }

    #[test]
    fn test_api_step_by_step() {
        let mut api = api();

        let r1 = api.step().unwrap();
        assert_eq!(r1.time, 1);
        assert!(r1.description.contains("P1"));
        assert_eq!(r1.finished, 0);

        for _ in 0..3 {
            api.step();
        }
        let r5 = api.step().unwrap();
        assert_eq!(r5.time, 5);
        assert_eq!(r5.finished, 2);
        assert_eq!(r5.description, "all processes finished");

        assert!(api.step().is_none());
        assert!(api.is_finished());
    }

    #[test]
    fn test_api_run_to_end() {
        let mut api = api();
        let advanced = api.run_to_end();
        assert_eq!(advanced, 5);
        assert!(api.is_finished());
        assert_eq!(api.current_time(), 5);
    }

    #[test]
    fn test_api_state_json() {
        let mut api = api();
        api.run_to_end();

        let json = api.state_json();
        assert!(json.contains("current_time"));
        assert!(json.contains("processes"));
        assert!(json.contains("metrics"));
    }

    #[test]
    fn test_api_timeline_json() {
        let api = ScenarioBuilder::new()
            .process(1, 0, 3)
            .event(1, "load data from memory")
            .build()
            .unwrap();

        let json = api.timeline_json();
        assert!(json.contains("\"start\""));
        assert!(json.contains("load data from memory"));
    }

    #[test]
    fn test_api_algorithms_json() {
        let json = SimulatorApi::algorithms_json();
        assert!(json.contains("FCFS"));
        assert!(json.contains("Round Robin"));
        assert!(json.contains("requires_quantum"));
    }

    #[test]
    fn test_api_reports_algorithm() {
        let api = ScenarioBuilder::new()
            .process(1, 0, 3)
            .round_robin(2)
            .build()
            .unwrap();
        assert_eq!(api.algorithm(), Algorithm::RoundRobin { quantum: 2 });
    }
}
