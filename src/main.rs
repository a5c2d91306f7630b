use kairos::{catalog, correlate, project, schedule, Algorithm, Process, Timeline};

fn main() {
    println!("═══════════════════════════════════════════════════════");
    println!("  Kairos — Deterministic CPU Scheduling Simulator");
    println!("═══════════════════════════════════════════════════════");
    println!();

    let processes = vec![
        Process::new(1, 0, 7)
            .with_event(1, "load data from memory")
            .with_event(5, "write to cache"),
        Process::new(2, 1, 4).with_priority(1).with_event(2, "compare values"),
        Process::new(3, 2, 8).with_priority(2),
        Process::new(4, 3, 5).with_priority(0),
    ];

    let algorithms = [
        Algorithm::Fcfs,
        Algorithm::Sjf,
        Algorithm::PriorityPreemptive,
        Algorithm::PriorityNonPreemptive,
        Algorithm::RoundRobin { quantum: 4 },
        Algorithm::Multilevel { levels: 3, usage_limit: 2 },
    ];

    println!("  {} selectable algorithms in the catalog", catalog().len());
    println!();

    for algorithm in algorithms {
        match schedule(&processes, algorithm) {
            Ok(timeline) => print_run(algorithm, &processes, &timeline),
            Err(e) => println!("  {}: failed — {}", algorithm, e),
        }
    }

    // ── Determinism check: two independent runs must agree ────
    let run1 = schedule(&processes, Algorithm::RoundRobin { quantum: 4 }).unwrap();
    let run2 = schedule(&processes, Algorithm::RoundRobin { quantum: 4 }).unwrap();
    println!("  Verification:");
    if run1 == run2 {
        println!("    ✓ Timelines are IDENTICAL — deterministic scheduling confirmed.");
    } else {
        println!("    ✗ MISMATCH — determinism violation detected!");
    }
}

fn print_run(algorithm: Algorithm, processes: &[Process], timeline: &Timeline) {
    println!("  {}", algorithm);

    for process in processes {
        println!("    {:>3} │{}│", process.id.to_string(), gantt_row(timeline, process));
    }

    let total = timeline.total_time();
    let projection = project(timeline, processes, total);
    println!(
        "    total {} · cpu {:.1}% · throughput {:.3}/tick",
        total,
        projection.metrics.cpu_utilization * 100.0,
        projection.metrics.throughput,
    );
    println!(
        "    avg waiting {:.2} · avg turnaround {:.2} · avg response {:.2}",
        projection.metrics.avg_waiting,
        projection.metrics.avg_turnaround,
        projection.metrics.avg_response,
    );

    for process in processes {
        for event in correlate(process, timeline) {
            if let Some(at) = event.at {
                println!("    event {} @ {}: {}", process.id, at, event.label);
            }
        }
    }
    println!();
}

fn gantt_row(timeline: &Timeline, process: &Process) -> String {
    let total = timeline.total_time().ticks();
    (0..total)
        .map(|t| {
            let covered = timeline
                .slices_for(process.id)
                .any(|s| s.start.ticks() <= t && t < s.end.ticks());
            if covered {
                '█'
            } else {
                '·'
            }
        })
        .collect()
}
