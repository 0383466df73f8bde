//! Multi-level feedback queue scheduling simulator.
//!
//! Three ready queues: Q0 and Q1 are round robin with their own quantum, Q2 is
//! first come first served. A process that uses its whole quantum drops one
//! level; a process that waits too long in Q1 or Q2 is aged back to Q0.
//!
//! ```no_run
//! use mlfq_sched::{MlfqConfig, MlfqEngine, Process};
//!
//! let processes = vec![
//!     Process::new("P1", 0, 10)?,
//!     Process::new("P2", 4, 4)?,
//! ];
//! let mut engine = MlfqEngine::new(MlfqConfig::default());
//! for p in engine.run(processes)? {
//!     println!("{} finished at {}", p.id(), p.finish_time());
//! }
//! # Ok::<(), mlfq_sched::SchedError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod process;
pub mod report;
pub mod schedulers;
pub mod trace;
pub mod utils;

pub use config::MlfqConfig;
pub use engine::MlfqEngine;
pub use error::{Result, SchedError};
pub use process::{Process, State};
pub use report::{SortKey, Stats};
pub use schedulers::{Discipline, Level, ReadyQueue};
pub use trace::{EventKind, GanttChart, GanttSlice, TraceEvent};
