use crate::error::SchedError;
use crate::process::Process;
use std::cmp::Ordering;
use std::str::FromStr;

/// Summary statistics over a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub total_time: u64,
    pub busy_time: u64,
    pub cpu_utilization: f64,
    pub avg_turnaround_time: f64,
    pub avg_wait_time: f64,
    pub avg_response_time: f64,
    pub max_wait_time: u64,
    pub throughput: f64,
}

impl Stats {
    pub fn compute(completed: &[Process], total_time: u64, busy_time: u64) -> Stats {
        let count = completed.len();
        let mean = |field: fn(&Process) -> u64| -> f64 {
            if count == 0 {
                0.0
            } else {
                completed.iter().map(field).sum::<u64>() as f64 / count as f64
            }
        };
        let per_tick = |value: f64| -> f64 {
            if total_time == 0 {
                0.0
            } else {
                value / total_time as f64
            }
        };

        Stats {
            total_time,
            busy_time,
            cpu_utilization: per_tick(busy_time as f64),
            avg_turnaround_time: mean(Process::turnaround_time),
            avg_wait_time: mean(Process::waiting_time),
            avg_response_time: mean(Process::response_time),
            max_wait_time: completed
                .iter()
                .map(Process::waiting_time)
                .max()
                .unwrap_or(0),
            throughput: per_tick(count as f64),
        }
    }
}

/// Display order for the per-process table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Completion,
    Arrival,
    Id,
    Finish,
}

impl SortKey {
    pub fn compare(self, a: &Process, b: &Process) -> Ordering {
        match self {
            SortKey::Completion => Ordering::Equal,
            SortKey::Arrival => a
                .arrival_time()
                .cmp(&b.arrival_time())
                .then_with(|| a.id().cmp(b.id())),
            SortKey::Id => a.id().cmp(b.id()),
            SortKey::Finish => a.finish_time().cmp(&b.finish_time()),
        }
    }

    /// Returns the processes in this order. The sort is stable, so ties keep
    /// completion order.
    pub fn sorted<'a>(self, completed: &'a [Process]) -> Vec<&'a Process> {
        let mut rows: Vec<&Process> = completed.iter().collect();
        rows.sort_by(|a, b| self.compare(a, b));
        rows
    }
}

impl FromStr for SortKey {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" | "completion" => Ok(SortKey::Completion),
            "a" | "arrival" => Ok(SortKey::Arrival),
            "i" | "id" => Ok(SortKey::Id),
            "f" | "finish" => Ok(SortKey::Finish),
            other => Err(SchedError::InvalidArgument(format!(
                "unknown sort key: {}. Must be one of c, a, i, f",
                other
            ))),
        }
    }
}
