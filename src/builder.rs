//! Fluent builder for simulation setup.
//!
//! Hides the boilerplate of assembling a process set, choosing a
//! discipline, and running the scheduler — while keeping everything
//! deterministic. This is the programmatic face of the setup/config
//! boundary and the workhorse of the test suite.

use crate::algorithm::Algorithm;
use crate::api::SimulatorApi;
use crate::error::KairosResult;
use crate::process::Process;
use crate::timeline::Timeline;

/// Fluent builder for a `(processes, algorithm)` scenario.
///
/// # Example
/// ```rust
/// use kairos::ScenarioBuilder;
///
/// let mut api = ScenarioBuilder::new()
///     .process(1, 0, 7)
///     .process(2, 1, 4)
///     .event(2, "store result in register")
///     .prioritized(3, 2, 8, 1)
///     .round_robin(4)
///     .build()
///     .unwrap();
/// api.run_to_end();
/// ```
pub struct ScenarioBuilder {
    processes: Vec<Process>,
    algorithm: Algorithm,
}

impl ScenarioBuilder {
    /// Create an empty scenario defaulting to FCFS.
    pub fn new() -> Self {
        ScenarioBuilder {
            processes: Vec::new(),
            algorithm: Algorithm::Fcfs,
        }
    }

    // ── Processes ─────────────────────────────────────────────

    /// Add a process with default priority 0.
    pub fn process(mut self, id: u32, arrival: u64, exec_time: u64) -> Self {
        self.processes.push(Process::new(id, arrival, exec_time));
        self
    }

    /// Add a process with an explicit priority (lower = more urgent).
    pub fn prioritized(
        mut self,
        id: u32,
        arrival: u64,
        exec_time: u64,
        priority: i32,
    ) -> Self {
        self.processes
            .push(Process::new(id, arrival, exec_time).with_priority(priority));
        self
    }

    /// Add a pre-built process.
    pub fn add(mut self, process: Process) -> Self {
        self.processes.push(process);
        self
    }

    /// Attach an internal event to the most recently added process.
    /// A no-op when no process has been added yet.
    pub fn event(mut self, offset: u64, label: &str) -> Self {
        if let Some(process) = self.processes.last_mut() {
            process.events.push(crate::process::CpuEvent::new(offset, label));
        }
        self
    }

    // ── Algorithm ─────────────────────────────────────────────

    /// Select a discipline directly.
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Select shortest-job-first.
    pub fn sjf(self) -> Self {
        self.algorithm(Algorithm::Sjf)
    }

    /// Select preemptive priority.
    pub fn priority_preemptive(self) -> Self {
        self.algorithm(Algorithm::PriorityPreemptive)
    }

    /// Select non-preemptive priority.
    pub fn priority_non_preemptive(self) -> Self {
        self.algorithm(Algorithm::PriorityNonPreemptive)
    }

    /// Select round robin with the given quantum.
    pub fn round_robin(self, quantum: u64) -> Self {
        self.algorithm(Algorithm::RoundRobin { quantum })
    }

    /// Select multilevel feedback queues.
    pub fn multilevel(self, levels: usize, usage_limit: u32) -> Self {
        self.algorithm(Algorithm::Multilevel { levels, usage_limit })
    }

    // ── Build ─────────────────────────────────────────────────

    /// The assembled inputs, for callers that drive the scheduler
    /// themselves.
    pub fn into_parts(self) -> (Vec<Process>, Algorithm) {
        (self.processes, self.algorithm)
    }

    /// Run the scheduler and return just the timeline.
    pub fn schedule(self) -> KairosResult<Timeline> {
        crate::sched::schedule(&self.processes, self.algorithm)
    }

    /// Run the scheduler and wrap the result in a [`SimulatorApi`].
    pub fn build(self) -> KairosResult<SimulatorApi> {
        SimulatorApi::new(self.processes, self.algorithm)
    }
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KairosError;
    use crate::process::ProcessId;

    #[test]
    fn test_builder_basic() {
        let timeline = ScenarioBuilder::new()
            .process(1, 0, 3)
            .process(2, 1, 2)
            .schedule()
            .unwrap();
        assert_eq!(timeline.total_time().ticks(), 5);
    }

    #[test]
    fn test_builder_event_attaches_to_last_process() {
        let (processes, _) = ScenarioBuilder::new()
            .process(1, 0, 3)
            .process(2, 1, 4)
            .event(2, "compare values")
            .into_parts();
        assert!(processes[0].events.is_empty());
        assert_eq!(processes[1].events.len(), 1);
        assert_eq!(processes[1].events[0].offset, 2);
    }

    #[test]
    fn test_builder_algorithm_selection() {
        let (_, algorithm) = ScenarioBuilder::new()
            .process(1, 0, 1)
            .round_robin(3)
            .into_parts();
        assert_eq!(algorithm, Algorithm::RoundRobin { quantum: 3 });
    }

    #[test]
    fn test_builder_prioritized() {
        let timeline = ScenarioBuilder::new()
            .prioritized(1, 0, 5, 2)
            .prioritized(2, 1, 2, 0)
            .priority_preemptive()
            .schedule()
            .unwrap();
        // P2 preempts at t=1.
        assert_eq!(timeline.slices()[1].process, ProcessId::new(2));
    }

    #[test]
    fn test_builder_surfaces_validation_errors() {
        let result = ScenarioBuilder::new().process(1, 0, 0).schedule();
        assert_eq!(result, Err(KairosError::ZeroExecTime(ProcessId::new(1))));
    }

    #[test]
    fn test_builder_empty_scenario_rejected() {
        assert_eq!(
            ScenarioBuilder::new().schedule(),
            Err(KairosError::EmptyProcessSet)
        );
    }
}
