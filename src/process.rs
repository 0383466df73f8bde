use crate::error::{Result, SchedError};
use crate::schedulers::Level;

/// Lifecycle state of a simulated process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    NotArrived,
    Ready,
    Running,
    Done,
}

/// A process with a fixed workload and the bookkeeping the scheduler keeps
/// for it. Timing fields are in ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    id: String,
    arrival: u64,
    burst: u64,

    pub(crate) state: State,
    pub(crate) level: Level,
    pub(crate) quantum_used: u64,
    remaining: u64,
    time_in_queue: u64,
    has_started: bool,

    // stats
    waiting: u64,
    response: u64,
    finish: u64,
    turnaround: u64,
}

impl Process {
    pub fn new(id: impl Into<String>, arrival: i64, burst: i64) -> Result<Process> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SchedError::InvalidArgument("process id is empty".to_string()));
        }
        if arrival < 0 {
            return Err(SchedError::InvalidArgument(format!(
                "process {}: arrival time {} is negative",
                id, arrival
            )));
        }
        if burst <= 0 {
            return Err(SchedError::InvalidArgument(format!(
                "process {}: burst time {} must be positive",
                id, burst
            )));
        }

        Ok(Process {
            id,
            arrival: arrival as u64,
            burst: burst as u64,
            state: State::NotArrived,
            level: Level::Q0,
            quantum_used: 0,
            remaining: burst as u64,
            time_in_queue: 0,
            has_started: false,
            waiting: 0,
            response: 0,
            finish: 0,
            turnaround: 0,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn arrival_time(&self) -> u64 {
        self.arrival
    }

    pub fn burst_time(&self) -> u64 {
        self.burst
    }

    pub fn remaining_time(&self) -> u64 {
        self.remaining
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn time_in_queue(&self) -> u64 {
        self.time_in_queue
    }

    /// Ticks used since the process was last dispatched.
    pub fn quantum_used(&self) -> u64 {
        self.quantum_used
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn waiting_time(&self) -> u64 {
        self.waiting
    }

    /// Ticks from arrival to first dispatch. Zero until the process starts.
    pub fn response_time(&self) -> u64 {
        self.response
    }

    pub fn finish_time(&self) -> u64 {
        self.finish
    }

    pub fn turnaround_time(&self) -> u64 {
        self.turnaround
    }

    pub fn is_completed(&self) -> bool {
        self.state == State::Done
    }

    /// Records the first dispatch. Later calls are no-ops.
    pub(crate) fn mark_started(&mut self, current_time: u64) {
        if !self.has_started {
            self.response = current_time.saturating_sub(self.arrival);
            self.has_started = true;
        }
    }

    /// Runs the process for up to `ticks` starting at `current_time`.
    /// Returns whether the process finished.
    pub fn execute(&mut self, ticks: u64, current_time: u64) -> Result<bool> {
        if self.is_completed() {
            return Err(SchedError::InvalidState {
                id: self.id.clone(),
                reason: "execute called on a completed process",
            });
        }
        self.mark_started(current_time);

        let consumed = ticks.min(self.remaining);
        self.remaining -= consumed;

        if self.remaining == 0 {
            self.state = State::Done;
            self.finish = current_time + consumed;
            self.turnaround = self.finish - self.arrival;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn tick_waiting(&mut self, delta: u64) {
        self.waiting += delta;
        self.time_in_queue += delta;
    }

    pub fn reset_queue_time(&mut self) {
        self.time_in_queue = 0;
    }
}
