//! First-come-first-served: run in `(arrival, id)` order, each process
//! to completion. The CPU idles forward whenever the next process has
//! not arrived yet.

use crate::process::Process;
use crate::timeline::{Slice, Timeline};

use super::RunState;

pub(crate) fn run(processes: &[Process]) -> Timeline {
    let state = RunState::new(processes);

    let mut slices = Vec::with_capacity(state.slots.len());
    let mut now = 0u64;

    for slot in &state.slots {
        if now < slot.arrival {
            now = slot.arrival;
        }
        let end = now + slot.exec_time;
        slices.push(Slice::new(slot.id, now, end));
        now = end;
    }

    Timeline::from_ordered(slices)
}
