//! Priority scheduling, preemptive and non-preemptive. Numerically
//! lower priority values are more urgent; ties fall back to
//! `(arrival, id)`.

use crate::process::Process;
use crate::timeline::{Slice, Timeline};

use super::{RunState, SliceAccumulator};

/// Preemptive variant: the decision is re-made every tick, so a more
/// urgent arrival takes the CPU at its arrival instant. Consecutive
/// ticks on the same process coalesce into one slice.
pub(crate) fn run_preemptive(processes: &[Process]) -> Timeline {
    let mut state = RunState::new(processes);

    let mut acc = SliceAccumulator::new();
    let mut now = 0u64;

    while !state.all_finished() {
        let chosen = state
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.remaining > 0 && s.arrival <= now)
            .min_by_key(|(_, s)| s.priority)
            .map(|(i, _)| i);

        let Some(index) = chosen else {
            now = state
                .earliest_pending_arrival()
                .expect("unfinished slot must have an arrival");
            continue;
        };

        let slot = &mut state.slots[index];
        acc.push(slot.id, now, now + 1);
        slot.remaining -= 1;
        now += 1;
    }

    acc.into_timeline()
}

/// Non-preemptive variant: the same selection rule, but applied only at
/// completion and idle boundaries. Once dispatched, a process runs to
/// completion.
pub(crate) fn run_non_preemptive(processes: &[Process]) -> Timeline {
    let mut state = RunState::new(processes);

    let mut slices = Vec::with_capacity(state.slots.len());
    let mut now = 0u64;

    while !state.all_finished() {
        let chosen = state
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.remaining > 0 && s.arrival <= now)
            .min_by_key(|(_, s)| s.priority)
            .map(|(i, _)| i);

        let Some(index) = chosen else {
            now = state
                .earliest_pending_arrival()
                .expect("unfinished slot must have an arrival");
            continue;
        };

        let slot = &mut state.slots[index];
        let end = now + slot.exec_time;
        slices.push(Slice::new(slot.id, now, end));
        slot.remaining = 0;
        now = end;
    }

    Timeline::from_ordered(slices)
}

#[cfg(test)]
mod tests {
    use crate::algorithm::Algorithm;
    use crate::process::{Process, ProcessId};
    use crate::sched::schedule;
    use crate::timeline::Slice;

    #[test]
    fn test_preemption_at_arrival_instant() {
        // P1 (priority 1) is running when P2 (priority 0) arrives at
        // t=3: P1's slice closes at 3 and P2 starts immediately.
        let processes = vec![
            Process::new(1, 0, 6).with_priority(1),
            Process::new(2, 3, 2).with_priority(0),
        ];
        let timeline = schedule(&processes, Algorithm::PriorityPreemptive).unwrap();
        assert_eq!(
            timeline.slices(),
            &[
                Slice::new(ProcessId::new(1), 0, 3),
                Slice::new(ProcessId::new(2), 3, 5),
                Slice::new(ProcessId::new(1), 5, 9),
            ]
        );
    }

    #[test]
    fn test_preemptive_no_switch_for_equal_priority() {
        // An equal-priority arrival does not preempt: the running
        // process wins the (arrival, id) tie-break at every tick.
        let processes = vec![
            Process::new(1, 0, 5).with_priority(2),
            Process::new(2, 2, 3).with_priority(2),
        ];
        let timeline = schedule(&processes, Algorithm::PriorityPreemptive).unwrap();
        assert_eq!(
            timeline.slices(),
            &[
                Slice::new(ProcessId::new(1), 0, 5),
                Slice::new(ProcessId::new(2), 5, 8),
            ]
        );
    }

    #[test]
    fn test_preemptive_resumes_after_urgent_work() {
        let processes = vec![
            Process::new(1, 0, 4).with_priority(3),
            Process::new(2, 1, 2).with_priority(1),
            Process::new(3, 1, 1).with_priority(0),
        ];
        let timeline = schedule(&processes, Algorithm::PriorityPreemptive).unwrap();
        assert_eq!(
            timeline.slices(),
            &[
                Slice::new(ProcessId::new(1), 0, 1),
                Slice::new(ProcessId::new(3), 1, 2),
                Slice::new(ProcessId::new(2), 2, 4),
                Slice::new(ProcessId::new(1), 4, 7),
            ]
        );
    }

    #[test]
    fn test_non_preemptive_runs_to_completion() {
        let processes = vec![
            Process::new(1, 0, 6).with_priority(1),
            Process::new(2, 3, 2).with_priority(0),
        ];
        let timeline = schedule(&processes, Algorithm::PriorityNonPreemptive).unwrap();
        assert_eq!(
            timeline.slices(),
            &[
                Slice::new(ProcessId::new(1), 0, 6),
                Slice::new(ProcessId::new(2), 6, 8),
            ]
        );
    }

    #[test]
    fn test_non_preemptive_picks_most_urgent_at_boundary() {
        let processes = vec![
            Process::new(1, 0, 4).with_priority(5),
            Process::new(2, 1, 3).with_priority(2),
            Process::new(3, 2, 3).with_priority(1),
        ];
        let timeline = schedule(&processes, Algorithm::PriorityNonPreemptive).unwrap();
        let order: Vec<u32> = timeline.slices().iter().map(|s| s.process.raw()).collect();
        assert_eq!(order, vec![1, 3, 2]);
    }

    #[test]
    fn test_idle_gap_then_priority_order() {
        let processes = vec![
            Process::new(1, 5, 2).with_priority(1),
            Process::new(2, 5, 2).with_priority(0),
        ];
        let timeline = schedule(&processes, Algorithm::PriorityPreemptive).unwrap();
        assert_eq!(
            timeline.slices(),
            &[
                Slice::new(ProcessId::new(2), 5, 7),
                Slice::new(ProcessId::new(1), 7, 9),
            ]
        );
    }
}
