//! Shortest-job-first, non-preemptive: at every completion or idle
//! boundary, dispatch the arrived, unfinished process with the smallest
//! total demand. A shorter job arriving mid-run does not preempt.

use crate::process::Process;
use crate::timeline::{Slice, Timeline};

use super::RunState;

pub(crate) fn run(processes: &[Process]) -> Timeline {
    let mut state = RunState::new(processes);

    let mut slices = Vec::with_capacity(state.slots.len());
    let mut now = 0u64;

    while !state.all_finished() {
        // Slots are already in (arrival, id) order, so min_by on
        // exec_time alone keeps the required tie-break.
        let chosen = state
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.remaining > 0 && s.arrival <= now)
            .min_by_key(|(_, s)| s.exec_time)
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
