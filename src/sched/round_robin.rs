//! Round robin: a FIFO ready queue where each dispatch runs at most one
//! quantum.
//!
//! Queue discipline when a quantum expires: processes that arrived
//! during the run are enqueued *before* the preempted process is
//! re-enqueued, so queue position always reflects arrival order.
//! Simultaneous arrivals are ordered by id. Slices are recorded one per
//! dispatch — a process re-dispatched back-to-back keeps separate
//! slices, so no slice ever exceeds the quantum except a final short
//! run.

use std::collections::VecDeque;

use crate::process::Process;
use crate::timeline::{Slice, Timeline};

use super::RunState;

pub(crate) fn run(processes: &[Process], quantum: u64) -> Timeline {
    let mut state = RunState::new(processes);

    let mut slices = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut next_arrival = 0usize; // index into the (arrival, id)-sorted slots
    let mut now = 0u64;

    while next_arrival < state.slots.len() || !queue.is_empty() {
        while next_arrival < state.slots.len() && state.slots[next_arrival].arrival <= now {
            queue.push_back(next_arrival);
            next_arrival += 1;
        }

        let Some(index) = queue.pop_front() else {
            now = state.slots[next_arrival].arrival;
            continue;
        };

        let run_time = quantum.min(state.slots[index].remaining);
        let end = now + run_time;
        slices.push(Slice::new(state.slots[index].id, now, end));
        state.slots[index].remaining -= run_time;
        now = end;

        // Arrivals during this run join the queue ahead of the
        // preempted process.
        while next_arrival < state.slots.len() && state.slots[next_arrival].arrival <= now {
            queue.push_back(next_arrival);
            next_arrival += 1;
        }

        if state.slots[index].remaining > 0 {
            queue.push_back(index);
        }
    }

    Timeline::from_ordered(slices)
}

#[cfg(test)]
mod tests {
    use crate::algorithm::Algorithm;
    use crate::process::{Process, ProcessId};
    use crate::sched::schedule;
    use crate::timeline::Slice;

    fn rr(quantum: u64) -> Algorithm {
        Algorithm::RoundRobin { quantum }
    }

    #[test]
    fn test_first_dispatch_before_later_arrivals() {
        let processes = vec![
            Process::new(1, 0, 7),
            Process::new(2, 1, 4),
            Process::new(3, 2, 8),
            Process::new(4, 3, 5),
        ];
        let timeline = schedule(&processes, rr(4)).unwrap();
        // P1 arrives first and is dispatched before P2 joins at t=1.
        assert_eq!(timeline.slices()[0], Slice::new(ProcessId::new(1), 0, 4));
    }

    #[test]
    fn test_quantum_bounds_every_dispatch() {
        let processes = vec![
            Process::new(1, 0, 7),
            Process::new(2, 1, 4),
            Process::new(3, 2, 8),
            Process::new(4, 3, 5),
        ];
        let quantum = 4;
        let timeline = schedule(&processes, rr(quantum)).unwrap();
        for slice in timeline.slices() {
            assert!(slice.duration() <= quantum, "slice {} exceeds quantum", slice);
        }
    }

    #[test]
    fn test_arrivals_enqueue_before_preempted_process() {
        // P1 runs [0,2); P2 arrives at t=1, so after P1's quantum the
        // order is P2 then P1.
        let processes = vec![Process::new(1, 0, 4), Process::new(2, 1, 2)];
        let timeline = schedule(&processes, rr(2)).unwrap();
        assert_eq!(
            timeline.slices(),
            &[
                Slice::new(ProcessId::new(1), 0, 2),
                Slice::new(ProcessId::new(2), 2, 4),
                Slice::new(ProcessId::new(1), 4, 6),
            ]
        );
    }

    #[test]
    fn test_final_run_shorter_than_quantum() {
        let processes = vec![Process::new(1, 0, 5)];
        let timeline = schedule(&processes, rr(2)).unwrap();
        assert_eq!(
            timeline.slices(),
            &[
                Slice::new(ProcessId::new(1), 0, 2),
                Slice::new(ProcessId::new(1), 2, 4),
                Slice::new(ProcessId::new(1), 4, 5),
            ]
        );
    }

    #[test]
    fn test_idle_jump_to_next_arrival() {
        let processes = vec![Process::new(1, 0, 2), Process::new(2, 9, 2)];
        let timeline = schedule(&processes, rr(4)).unwrap();
        assert_eq!(
            timeline.slices(),
            &[
                Slice::new(ProcessId::new(1), 0, 2),
                Slice::new(ProcessId::new(2), 9, 11),
            ]
        );
    }

    #[test]
    fn test_simultaneous_arrivals_ordered_by_id() {
        let processes = vec![
            Process::new(2, 0, 2),
            Process::new(1, 0, 2),
            Process::new(3, 0, 2),
        ];
        let timeline = schedule(&processes, rr(1)).unwrap();
        let first_round: Vec<u32> = timeline.slices()[..3]
            .iter()
            .map(|s| s.process.raw())
            .collect();
        assert_eq!(first_round, vec![1, 2, 3]);
    }

    #[test]
    fn test_arrival_at_quantum_boundary_beats_requeue() {
        // P2's arrival coincides exactly with P1's quantum expiry; the
        // arrival wins the queue slot.
        let processes = vec![Process::new(1, 0, 4), Process::new(2, 2, 2)];
        let timeline = schedule(&processes, rr(2)).unwrap();
        assert_eq!(timeline.slices()[1].process, ProcessId::new(2));
    }
}
