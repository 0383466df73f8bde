use crate::process::{Process, State};
use std::collections::VecDeque;
use std::fmt;

/// Priority level of a ready queue. `Q0` is the highest priority; the
/// derived ordering sorts higher priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Q0,
    Q1,
    Q2,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Q0, Level::Q1, Level::Q2];

    pub fn index(self) -> usize {
        match self {
            Level::Q0 => 0,
            Level::Q1 => 1,
            Level::Q2 => 2,
        }
    }

    /// One level down. The lowest level stays where it is.
    pub fn demoted(self) -> Level {
        match self {
            Level::Q0 => Level::Q1,
            Level::Q1 | Level::Q2 => Level::Q2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Q0 => "Q0",
            Level::Q1 => "Q1",
            Level::Q2 => "Q2",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Preempted on quantum expiry and demoted.
    RoundRobin { quantum: u64 },
    /// Runs until done or displaced by a higher level.
    Fcfs,
}

impl Discipline {
    pub fn quantum(self) -> Option<u64> {
        match self {
            Discipline::RoundRobin { quantum } => Some(quantum),
            Discipline::Fcfs => None,
        }
    }
}

/// One level of the feedback queue. Dispatch order is insertion order.
#[derive(Debug)]
pub struct ReadyQueue {
    level: Level,
    discipline: Discipline,
    queue: VecDeque<Process>,
}

impl ReadyQueue {
    pub fn new(level: Level, discipline: Discipline) -> Self {
        ReadyQueue {
            level,
            discipline,
            queue: VecDeque::new(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    pub fn add(&mut self, mut process: Process) {
        process.level = self.level;
        process.state = State::Ready;
        self.queue.push_back(process);
    }

    pub fn next(&mut self) -> Option<Process> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.queue.iter()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn tick_waiting(&mut self, delta: u64) {
        for process in self.queue.iter_mut() {
            process.tick_waiting(delta);
        }
    }

    /// Removes every process that has waited more than `threshold` ticks at
    /// this level, keeping the relative order of both the removed and the
    /// remaining processes.
    pub fn drain_starved(&mut self, threshold: u64) -> Vec<Process> {
        let mut starved = Vec::new();
        let mut kept = VecDeque::with_capacity(self.queue.len());
        for process in self.queue.drain(..) {
            if process.time_in_queue() > threshold {
                starved.push(process);
            } else {
                kept.push_back(process);
            }
        }
        self.queue = kept;
        starved
    }

    /// Queue contents as `id:remaining` pairs, for trace logging.
    pub fn describe(&self) -> String {
        let items: Vec<String> = self
            .queue
            .iter()
            .map(|p| format!("{}:{}", p.id(), p.remaining_time()))
            .collect();
        format!("{}[{}]", self.level, items.join(" "))
    }
}
