//! Discrete-time MLFQ simulation.
//!
//! Each tick runs, in this order: arrival admission, aging sweep, dispatch
//! selection with preemption, one tick of execution, and post-execution
//! resolution (completion or demotion). Processes are moved by value between
//! the arrival backlog, the ready queues, the running slot and the completed
//! list, so each one lives in exactly one place at a time.

use crate::config::MlfqConfig;
use crate::error::{Result, SchedError};
use crate::process::{Process, State};
use crate::schedulers::{Level, ReadyQueue};
use crate::trace::{EventKind, GanttChart, TraceEvent};
use log::{debug, info, trace};
use std::collections::{HashSet, VecDeque};

pub struct MlfqEngine {
    config: MlfqConfig,
    global_time: u64,
    queues: [ReadyQueue; 3],
    current: Option<Process>,
    backlog: VecDeque<Process>,
    completed: Vec<Process>,
    total: usize,

    events: Vec<TraceEvent>,
    gantt: GanttChart,
}

impl Default for MlfqEngine {
    fn default() -> Self {
        MlfqEngine::new(MlfqConfig::default())
    }
}

impl MlfqEngine {
    pub fn new(config: MlfqConfig) -> Self {
        MlfqEngine {
            config,
            global_time: 0,
            queues: Level::ALL.map(|level| ReadyQueue::new(level, config.discipline(level))),
            current: None,
            backlog: VecDeque::new(),
            completed: Vec::new(),
            total: 0,
            events: Vec::new(),
            gantt: GanttChart::new(),
        }
    }

    pub fn config(&self) -> &MlfqConfig {
        &self.config
    }

    pub fn global_time(&self) -> u64 {
        self.global_time
    }

    /// Finished processes in completion order.
    pub fn completed(&self) -> &[Process] {
        &self.completed
    }

    pub fn trace(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn gantt(&self) -> &GanttChart {
        &self.gantt
    }

    pub fn busy_ticks(&self) -> u64 {
        self.gantt.busy_ticks()
    }

    pub fn idle_ticks(&self) -> u64 {
        self.global_time - self.busy_ticks()
    }

    pub fn running(&self) -> Option<&Process> {
        self.current.as_ref()
    }

    pub fn queue(&self, level: Level) -> &ReadyQueue {
        &self.queues[level.index()]
    }

    /// Simulates `processes` to completion and returns them in completion
    /// order. Any state left from a previous run is discarded first.
    pub fn run(&mut self, processes: Vec<Process>) -> Result<&[Process]> {
        self.reset();
        validate(&processes)?;
        if processes.is_empty() {
            return Ok(&self.completed);
        }

        let limit = tick_limit(&processes)?;
        self.load(processes);

        info!(
            "starting MLFQ run: {} processes, config {}, tick limit {}",
            self.total, self.config, limit
        );
        self.run_until(limit)?;

        info!(
            "run finished at tick {} ({} busy, {} idle)",
            self.global_time,
            self.busy_ticks(),
            self.idle_ticks()
        );
        Ok(&self.completed)
    }

    fn load(&mut self, processes: Vec<Process>) {
        self.total = processes.len();

        let mut backlog = processes;
        backlog.sort_by_key(Process::arrival_time);
        self.backlog = backlog.into_iter().collect();
    }

    fn run_until(&mut self, limit: u64) -> Result<()> {
        while self.completed.len() < self.total {
            if self.global_time >= limit {
                return Err(SchedError::SimulationDiverged {
                    limit,
                    completed: self.completed.len(),
                    total: self.total,
                });
            }
            self.step()?;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.global_time = 0;
        for queue in self.queues.iter_mut() {
            queue.clear();
        }
        self.current = None;
        self.backlog.clear();
        self.completed.clear();
        self.total = 0;
        self.events.clear();
        self.gantt.clear();
    }

    fn step(&mut self) -> Result<()> {
        self.admit_arrivals();
        self.age_starved();
        self.dispatch();
        self.execute_tick()?;
        self.global_time += 1;
        Ok(())
    }

    fn admit_arrivals(&mut self) {
        let now = self.global_time;
        while self
            .backlog
            .front()
            .map_or(false, |p| p.arrival_time() <= now)
        {
            let Some(mut process) = self.backlog.pop_front() else {
                break;
            };
            process.reset_queue_time();
            debug!("{}: {} arrived (burst {})", now, process.id(), process.burst_time());
            self.record(now, process.id(), Level::Q0, EventKind::Arrived);
            self.queues[Level::Q0.index()].add(process);
        }
    }

    fn age_starved(&mut self) {
        let now = self.global_time;
        let threshold = self.config.aging_threshold;

        let mut aged = Vec::new();
        for level in [Level::Q1, Level::Q2] {
            aged.extend(self.queues[level.index()].drain_starved(threshold));
        }

        for mut process in aged {
            debug!(
                "{}: {} aged {} -> Q0 after waiting {}",
                now,
                process.id(),
                process.level(),
                process.time_in_queue()
            );
            process.reset_queue_time();
            self.record(now, process.id(), Level::Q0, EventKind::AgedPromoted);
            self.queues[Level::Q0.index()].add(process);
        }
    }

    fn highest_ready(&self) -> Option<Level> {
        self.queues
            .iter()
            .find(|queue| !queue.is_empty())
            .map(ReadyQueue::level)
    }

    fn dispatch(&mut self) {
        let now = self.global_time;
        let Some(level) = self.highest_ready() else {
            return;
        };

        // only a strictly higher level displaces the running process
        if let Some(running) = &self.current {
            if level >= running.level() {
                return;
            }
        }

        if let Some(mut preempted) = self.current.take() {
            preempted.quantum_used = 0;
            let back_to = preempted.level();
            debug!(
                "{}: {} preempted by {} work, back to {} ({} left)",
                now,
                preempted.id(),
                level,
                back_to,
                preempted.remaining_time()
            );
            self.record(now, preempted.id(), back_to, EventKind::Preempted);
            self.queues[back_to.index()].add(preempted);
        }

        if let Some(mut next) = self.queues[level.index()].next() {
            next.mark_started(now);
            next.state = State::Running;
            next.quantum_used = 0;
            debug!("{}: dispatch {} from {}", now, next.id(), level);
            self.record(now, next.id(), level, EventKind::Dispatched);
            self.current = Some(next);
        }
    }

    fn execute_tick(&mut self) -> Result<()> {
        let now = self.global_time;

        for queue in self.queues.iter_mut() {
            queue.tick_waiting(1);
        }
        trace!(
            "{}: {} {} {}",
            now,
            self.queues[0].describe(),
            self.queues[1].describe(),
            self.queues[2].describe()
        );

        let Some(mut running) = self.current.take() else {
            trace!("{}: cpu idle", now);
            return Ok(());
        };

        let done = running.execute(1, now)?;
        running.quantum_used += 1;
        self.gantt.record(now, running.id(), running.level());

        let end = now + 1;
        if done {
            debug!(
                "{}: {} completed (turnaround {}, waiting {})",
                end,
                running.id(),
                running.turnaround_time(),
                running.waiting_time()
            );
            self.record(end, running.id(), running.level(), EventKind::Completed);
            self.completed.push(running);
        } else if self.quantum_expired(&running) {
            running.quantum_used = 0;
            let level = running.level().demoted();
            running.reset_queue_time();
            debug!(
                "{}: {} used its {} quantum, demoted to {}",
                end,
                running.id(),
                running.level(),
                level
            );
            self.record(end, running.id(), level, EventKind::Demoted);
            self.queues[level.index()].add(running);
        } else {
            self.current = Some(running);
        }
        Ok(())
    }

    fn quantum_expired(&self, process: &Process) -> bool {
        self.queues[process.level().index()]
            .discipline()
            .quantum()
            .map_or(false, |quantum| process.quantum_used >= quantum)
    }

    fn record(&mut self, tick: u64, id: &str, level: Level, kind: EventKind) {
        self.events.push(TraceEvent {
            tick,
            id: id.to_string(),
            level,
            kind,
        });
    }
}

fn validate(processes: &[Process]) -> Result<()> {
    let mut seen = HashSet::with_capacity(processes.len());
    for process in processes {
        if !seen.insert(process.id()) {
            return Err(SchedError::DuplicateId(process.id().to_string()));
        }
        let pristine = process.state() == State::NotArrived
            && process.remaining_time() == process.burst_time()
            && !process.has_started()
            && process.waiting_time() == 0
            && process.time_in_queue() == 0;
        if !pristine {
            return Err(SchedError::InvalidState {
                id: process.id().to_string(),
                reason: "process was already scheduled",
            });
        }
    }
    Ok(())
}

/// Upper bound on the ticks a run can take: the CPU is never idle once the
/// last process has arrived.
fn tick_limit(processes: &[Process]) -> Result<u64> {
    let last_arrival = processes
        .iter()
        .map(Process::arrival_time)
        .max()
        .unwrap_or(0);
    processes
        .iter()
        .map(Process::burst_time)
        .try_fold(last_arrival, u64::checked_add)
        .ok_or_else(|| {
            SchedError::InvalidArgument("total burst time overflows the tick counter".to_string())
        })
}
