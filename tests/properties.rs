use mlfq_sched::{EventKind, Level, MlfqConfig, MlfqEngine, Process, TraceEvent};
use proptest::prelude::*;
use std::collections::HashMap;

fn workload() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..60, 1i64..40), 0..12)
}

fn schedule() -> impl Strategy<Value = MlfqConfig> {
    (1u64..8, 1u64..12, 0u64..40)
        .prop_map(|(q0, q1, aging)| MlfqConfig::new(q0, q1, aging).unwrap())
}

fn build(specs: &[(i64, i64)]) -> Vec<Process> {
    specs
        .iter()
        .enumerate()
        .map(|(i, &(at, bt))| Process::new(format!("P{}", i), at, bt).unwrap())
        .collect()
}

proptest! {
    #[test]
    fn timing_identities_hold(specs in workload(), config in schedule()) {
        let mut engine = MlfqEngine::new(config);
        engine.run(build(&specs)).unwrap();
        prop_assert_eq!(engine.completed().len(), specs.len());

        for p in engine.completed() {
            prop_assert_eq!(p.remaining_time(), 0);
            prop_assert_eq!(p.turnaround_time(), p.finish_time() - p.arrival_time());
            prop_assert_eq!(p.waiting_time(), p.turnaround_time() - p.burst_time());
            prop_assert!(p.response_time() <= p.waiting_time());
        }
    }

    #[test]
    fn cpu_time_matches_total_work(specs in workload(), config in schedule()) {
        let mut engine = MlfqEngine::new(config);
        engine.run(build(&specs)).unwrap();

        let total_burst: u64 = specs.iter().map(|&(_, bt)| bt as u64).sum();
        let last_arrival = specs.iter().map(|&(at, _)| at as u64).max().unwrap_or(0);
        prop_assert_eq!(engine.busy_ticks(), total_burst);
        prop_assert!(engine.global_time() >= total_burst);
        if !specs.is_empty() {
            prop_assert!(engine.global_time() > last_arrival);
        }
    }

    #[test]
    fn never_dispatched_before_arrival(specs in workload(), config in schedule()) {
        let mut engine = MlfqEngine::new(config);
        engine.run(build(&specs)).unwrap();

        let arrival: HashMap<String, u64> = engine
            .completed()
            .iter()
            .map(|p| (p.id().to_string(), p.arrival_time()))
            .collect();
        for e in engine.trace().iter().filter(|e| e.kind == EventKind::Dispatched) {
            prop_assert!(e.tick >= arrival[&e.id]);
        }
        for slice in engine.gantt().slices() {
            prop_assert!(slice.start >= arrival[&slice.id]);
        }
    }

    #[test]
    fn runs_are_deterministic(specs in workload(), config in schedule()) {
        let mut first = MlfqEngine::new(config);
        first.run(build(&specs)).unwrap();
        let mut second = MlfqEngine::new(config);
        second.run(build(&specs)).unwrap();

        prop_assert_eq!(first.completed(), second.completed());
        prop_assert_eq!(first.trace(), second.trace());
        prop_assert_eq!(first.global_time(), second.global_time());
    }

    #[test]
    fn levels_only_drop_by_one_or_return_to_q0(specs in workload(), config in schedule()) {
        let mut engine = MlfqEngine::new(config);
        engine.run(build(&specs)).unwrap();

        let mut level: HashMap<&str, Level> = HashMap::new();
        for e in engine.trace() {
            match e.kind {
                EventKind::Arrived | EventKind::AgedPromoted => {
                    prop_assert_eq!(e.level, Level::Q0);
                }
                EventKind::Demoted => {
                    let before = level[e.id.as_str()];
                    prop_assert_eq!(e.level, before.demoted());
                    prop_assert!(before != Level::Q2);
                }
                EventKind::Dispatched | EventKind::Preempted | EventKind::Completed => {
                    prop_assert_eq!(e.level, level[e.id.as_str()]);
                }
            }
            level.insert(e.id.as_str(), e.level);
        }
    }
}

#[test]
fn aged_within_one_tick_of_threshold() {
    // three long jobs keep each other waiting in the lower levels
    let config = MlfqConfig::new(2, 3, 5).unwrap();
    let mut engine = MlfqEngine::new(config);
    engine
        .run(build(&[(0, 40), (0, 40), (0, 40)]))
        .unwrap();

    let aged: Vec<_> = engine
        .trace()
        .iter()
        .filter(|e| e.kind == EventKind::AgedPromoted)
        .collect();
    assert!(!aged.is_empty());

    // a process waits at most threshold + 1 ticks at a lower level before it
    // is promoted, counted from its last demotion
    for promotion in aged {
        let history: Vec<&TraceEvent> = engine
            .trace()
            .iter()
            .filter(|e| e.id == promotion.id && e.tick <= promotion.tick)
            .collect();
        let demoted_at = history
            .iter()
            .filter(|e| e.kind == EventKind::Demoted)
            .map(|e| e.tick)
            .last()
            .unwrap();
        let ran_since = history.iter().any(|e| {
            e.kind == EventKind::Dispatched && e.tick >= demoted_at && e.tick < promotion.tick
        });

        let elapsed = promotion.tick - demoted_at;
        assert!(elapsed > config.aging_threshold);
        if !ran_since {
            assert_eq!(elapsed, config.aging_threshold + 1);
        }
    }
}
