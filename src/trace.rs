use crate::schedulers::Level;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Arrived,
    AgedPromoted,
    Dispatched,
    Preempted,
    Demoted,
    Completed,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Arrived => "Arrived",
            EventKind::AgedPromoted => "AgedPromoted",
            EventKind::Dispatched => "Dispatched",
            EventKind::Preempted => "Preempted",
            EventKind::Demoted => "Demoted",
            EventKind::Completed => "Completed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduling event. `tick` is when it takes effect and `level` is the
/// queue the process belongs to afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub tick: u64,
    pub id: String,
    pub level: Level,
    pub kind: EventKind,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:5} | {:>6} | {} | {}",
            self.tick, self.id, self.level, self.kind
        )
    }
}

/// A contiguous run of one process on the CPU, `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttSlice {
    pub start: u64,
    pub end: u64,
    pub id: String,
    pub level: Level,
}

impl GanttSlice {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }
}

/// Execution order on the CPU, built one tick at a time.
#[derive(Debug, Default, Clone)]
pub struct GanttChart {
    slices: Vec<GanttSlice>,
}

impl GanttChart {
    pub fn new() -> Self {
        GanttChart { slices: Vec::new() }
    }

    /// Records that `id` ran at `level` during `tick`. Extends the last slice
    /// when the same process keeps running at the same level.
    pub fn record(&mut self, tick: u64, id: &str, level: Level) {
        if let Some(last) = self.slices.last_mut() {
            if last.end == tick && last.id == id && last.level == level {
                last.end += 1;
                return;
            }
        }
        self.slices.push(GanttSlice {
            start: tick,
            end: tick + 1,
            id: id.to_string(),
            level,
        });
    }

    pub fn slices(&self) -> &[GanttSlice] {
        &self.slices
    }

    pub fn busy_ticks(&self) -> u64 {
        self.slices.iter().map(GanttSlice::len).sum()
    }

    pub fn clear(&mut self) {
        self.slices.clear();
    }
}

impl fmt::Display for GanttChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prev_end = 0;
        for slice in &self.slices {
            if slice.start > prev_end {
                write!(f, "|{}-{} idle", prev_end, slice.start)?;
            }
            write!(f, "|{}-{} {}({})", slice.start, slice.end, slice.id, slice.level)?;
            prev_end = slice.end;
        }
        if !self.slices.is_empty() {
            write!(f, "|")?;
        }
        Ok(())
    }
}
