//! Multilevel feedback queues.
//!
//! A process's priority selects its initial level (clamped to
//! `[0, levels)`; level 0 is the most urgent). The CPU always serves
//! the front of the highest non-empty level, and each dispatch runs
//! until the process finishes or the next arrival instant, whichever
//! comes first. Within a level the queue is kept in ascending order of
//! remaining demand (ties keep insertion order). A process interrupted
//! `usage_limit` times without finishing is demoted one level, its
//! usage counter reset. Contiguous runs of the same process coalesce
//! into a single slice.

use std::collections::VecDeque;

use crate::process::Process;
use crate::timeline::Timeline;

use super::{RunState, SliceAccumulator};

pub(crate) fn run(processes: &[Process], levels: usize, usage_limit: u32) -> Timeline {
    let mut state = RunState::new(processes);

    let mut queues: Vec<VecDeque<usize>> = vec![VecDeque::new(); levels];
    let mut usage = vec![0u32; state.slots.len()];
    let mut acc = SliceAccumulator::new();
    let mut next_arrival = 0usize;
    let mut now = 0u64;

    while next_arrival < state.slots.len() || queues.iter().any(|q| !q.is_empty()) {
        while next_arrival < state.slots.len() && state.slots[next_arrival].arrival <= now {
            let level = level_for(state.slots[next_arrival].priority, levels);
            insert_by_remaining(&mut queues[level], next_arrival, &state);
            next_arrival += 1;
        }

        let horizon = state
            .slots
            .get(next_arrival)
            .map(|s| s.arrival)
            .unwrap_or(u64::MAX);

        let Some(level) = queues.iter().position(|q| !q.is_empty()) else {
            now = horizon;
            continue;
        };

        let index = *queues[level].front().expect("level is non-empty");
        let remaining = state.slots[index].remaining;
        let run_time = remaining.min(horizon - now);

        acc.push(state.slots[index].id, now, now + run_time);
        now += run_time;

        if run_time == remaining {
            state.slots[index].remaining = 0;
            queues[level].pop_front();
        } else {
            state.slots[index].remaining -= run_time;
            usage[index] += 1;
            if usage[index] >= usage_limit && level + 1 < levels {
                queues[level].pop_front();
                usage[index] = 0;
                insert_by_remaining(&mut queues[level + 1], index, &state);
            }
        }
    }

    acc.into_timeline()
}

fn level_for(priority: i32, levels: usize) -> usize {
    priority.clamp(0, levels as i32 - 1) as usize
}

/// Insert `index` keeping the queue sorted ascending by remaining
/// demand; equal remainders keep FIFO order.
fn insert_by_remaining(queue: &mut VecDeque<usize>, index: usize, state: &RunState) {
    let remaining = state.slots[index].remaining;
    let position = queue
        .iter()
        .position(|&other| state.slots[other].remaining > remaining)
        .unwrap_or(queue.len());
    queue.insert(position, index);
}
