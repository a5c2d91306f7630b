//! Event correlator — maps per-process event offsets (executed CPU
//! ticks) to absolute simulated times.
//!
//! A process preempted into several slices executes its ticks
//! discontinuously, so an event at offset `k` is found by walking that
//! process's slices in order, accumulating executed time: the event
//! lands in the slice whose window `[accumulated, accumulated + len)`
//! contains `k`, at `slice.start + (k - accumulated)`. The correlator
//! is stateless over `(process, timeline)` and is recomputed whenever
//! the timeline changes.

use crate::process::Process;
use crate::time::SimTime;
use crate::timeline::{Slice, Timeline};

// ── PlacedEvent ───────────────────────────────────────────────────────

/// A process event resolved against a timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedEvent {
    /// Executed-ticks offset within the owning process.
    pub offset: u64,
    /// Operation description, copied from the process definition.
    pub label: String,
    /// Absolute simulated time, or `None` if the process has not
    /// executed `offset` ticks yet.
    pub at: Option<SimTime>,
}

// ── Correlation ───────────────────────────────────────────────────────

/// Place all of `process`'s events against the full timeline.
///
/// On a complete timeline every event resolves to `Some`, because slice
/// durations sum to `exec_time` and offsets are below it.
pub fn correlate(process: &Process, timeline: &Timeline) -> Vec<PlacedEvent> {
    place(process, timeline.slices_for(process.id), None)
}

/// Place `process`'s events using only execution visible strictly
/// before `cutoff`. Events beyond the executed prefix are reported with
/// `at: None` ("not yet occurred").
pub fn correlate_at(process: &Process, timeline: &Timeline, cutoff: SimTime) -> Vec<PlacedEvent> {
    place(process, timeline.slices_for(process.id), Some(cutoff))
}

fn place<'a>(
    process: &Process,
    slices: impl Iterator<Item = &'a Slice>,
    cutoff: Option<SimTime>,
) -> Vec<PlacedEvent> {
    // Window list: (executed-before, start, len) per visible slice.
    let mut windows: Vec<(u64, u64, u64)> = Vec::new();
    let mut accumulated = 0u64;
    for slice in slices {
        let (start, end) = match cutoff {
            Some(t) if slice.start >= t => continue,
            Some(t) => (slice.start.ticks(), slice.end.min(t).ticks()),
            None => (slice.start.ticks(), slice.end.ticks()),
        };
        windows.push((accumulated, start, end - start));
        accumulated += end - start;
    }

    process
        .events
        .iter()
        .map(|event| {
            let at = windows
                .iter()
                .find(|(acc, _, len)| event.offset >= *acc && event.offset < acc + len)
                .map(|(acc, start, _)| SimTime::new(start + (event.offset - acc)));
            PlacedEvent {
                offset: event.offset,
                label: event.label.clone(),
                at,
            }
        })
        .collect()
}

// ── Annotated timeline ────────────────────────────────────────────────

/// A slice annotated with the events that fire inside it, for the
/// rendering/metrics output boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotatedSlice {
    pub slice: Slice,
    /// Events firing within `[slice.start, slice.end)`, all resolved.
    pub events: Vec<PlacedEvent>,
}

/// Annotate every slice of the timeline with its correlated events.
pub fn annotate(timeline: &Timeline, processes: &[Process]) -> Vec<AnnotatedSlice> {
    timeline
        .slices()
        .iter()
        .map(|slice| {
            let events = processes
                .iter()
                .find(|p| p.id == slice.process)
                .map(|process| {
                    correlate(process, timeline)
                        .into_iter()
                        .filter(|e| {
                            e.at.is_some_and(|at| at >= slice.start && at < slice.end)
                        })
                        .collect()
                })
                .unwrap_or_default();
            AnnotatedSlice { slice: *slice, events }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;
    use crate::sched::schedule;

    #[test]
    fn test_events_in_unsplit_run() {
        let processes = vec![Process::new(1, 3, 5)
            .with_event(0, "load instruction")
            .with_event(4, "store result in register")];
        let timeline = schedule(&processes, Algorithm::Fcfs).unwrap();

        let placed = correlate(&processes[0], &timeline);
        assert_eq!(placed[0].at, Some(SimTime::new(3)));
        assert_eq!(placed[1].at, Some(SimTime::new(7)));
    }

    #[test]
    fn test_events_across_preemption_split() {
        // P1 executes [0,3) and [5,9); offset 4 is its 5th executed
        // tick, which happens at absolute time 6.
        let processes = vec![
            Process::new(1, 0, 7)
                .with_event(2, "compare values")
                .with_event(3, "push to stack")
                .with_event(4, "pop from stack"),
            Process::new(2, 3, 2).with_priority(-1),
        ];
        let timeline = schedule(&processes, Algorithm::PriorityPreemptive).unwrap();
        // Timeline: P1:0-3, P2:3-5, P1:5-9.

        let placed = correlate(&processes[0], &timeline);
        assert_eq!(placed[0].at, Some(SimTime::new(2)));
        assert_eq!(placed[1].at, Some(SimTime::new(5)));
        assert_eq!(placed[2].at, Some(SimTime::new(6)));
    }

    #[test]
    fn test_cutoff_marks_future_events_pending() {
        let processes = vec![Process::new(1, 0, 6)
            .with_event(1, "early")
            .with_event(5, "late")];
        let timeline = schedule(&processes, Algorithm::Fcfs).unwrap();

        let placed = correlate_at(&processes[0], &timeline, SimTime::new(3));
        assert_eq!(placed[0].at, Some(SimTime::new(1)));
        assert_eq!(placed[1].at, None);
    }

    #[test]
    fn test_cutoff_at_zero_places_nothing() {
        let processes = vec![Process::new(1, 0, 4).with_event(0, "first tick")];
        let timeline = schedule(&processes, Algorithm::Fcfs).unwrap();
        let placed = correlate_at(&processes[0], &timeline, SimTime::ZERO);
        assert_eq!(placed[0].at, None);
    }

    #[test]
    fn test_event_at_resume_boundary() {
        // Offset equal to the ticks executed in the first run maps to
        // the first tick of the resumed slice, not the gap.
        let processes = vec![
            Process::new(1, 0, 6).with_event(3, "resume marker"),
            Process::new(2, 3, 4).with_priority(-1),
        ];
        let timeline = schedule(&processes, Algorithm::PriorityPreemptive).unwrap();
        // Timeline: P1:0-3, P2:3-7, P1:7-10.

        let placed = correlate(&processes[0], &timeline);
        assert_eq!(placed[0].at, Some(SimTime::new(7)));
    }

    #[test]
    fn test_annotate_attaches_events_to_owning_slice() {
        let processes = vec![
            Process::new(1, 0, 7).with_event(2, "a").with_event(4, "b"),
            Process::new(2, 3, 2).with_priority(-1),
        ];
        let timeline = schedule(&processes, Algorithm::PriorityPreemptive).unwrap();
        // Timeline: P1:0-3, P2:3-5, P1:5-9.

        let annotated = annotate(&timeline, &processes);
        assert_eq!(annotated.len(), 3);
        assert_eq!(annotated[0].events.len(), 1); // offset 2 at T=2
        assert_eq!(annotated[1].events.len(), 0);
        assert_eq!(annotated[2].events.len(), 1); // offset 4 at T=6
        assert_eq!(annotated[2].events[0].at, Some(SimTime::new(6)));
    }
}
