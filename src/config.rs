use crate::error::{Result, SchedError};
use crate::schedulers::{Discipline, Level};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_QUANTUM_Q0: u64 = 4;
pub const DEFAULT_QUANTUM_Q1: u64 = 8;
pub const DEFAULT_AGING_THRESHOLD: u64 = 30;

/// Schedule spec accepted on the command line: `<q0>:<q1>[:<aging>]`.
pub const SCHEDSPEC_PATTERN: &str = r"^(\d+):(\d+)(?::(\d+))?$";

/// Quanta for the round-robin levels and the aging threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MlfqConfig {
    pub quantum_q0: u64,
    pub quantum_q1: u64,
    pub aging_threshold: u64,
}

impl Default for MlfqConfig {
    fn default() -> Self {
        MlfqConfig {
            quantum_q0: DEFAULT_QUANTUM_Q0,
            quantum_q1: DEFAULT_QUANTUM_Q1,
            aging_threshold: DEFAULT_AGING_THRESHOLD,
        }
    }
}

impl MlfqConfig {
    pub fn new(quantum_q0: u64, quantum_q1: u64, aging_threshold: u64) -> Result<Self> {
        if quantum_q0 == 0 || quantum_q1 == 0 {
            return Err(SchedError::InvalidArgument(format!(
                "quanta must be positive (got {}:{})",
                quantum_q0, quantum_q1
            )));
        }
        Ok(MlfqConfig {
            quantum_q0,
            quantum_q1,
            aging_threshold,
        })
    }

    pub fn discipline(&self, level: Level) -> Discipline {
        match level {
            Level::Q0 => Discipline::RoundRobin {
                quantum: self.quantum_q0,
            },
            Level::Q1 => Discipline::RoundRobin {
                quantum: self.quantum_q1,
            },
            Level::Q2 => Discipline::Fcfs,
        }
    }
}

impl FromStr for MlfqConfig {
    type Err = SchedError;

    fn from_str(spec: &str) -> Result<Self> {
        let re = Regex::new(SCHEDSPEC_PATTERN)
            .map_err(|e| SchedError::InvalidArgument(e.to_string()))?;
        let caps = re.captures(spec.trim()).ok_or_else(|| {
            SchedError::InvalidArgument(format!(
                "invalid scheduler specification: {}. Must be <q0>:<q1> or <q0>:<q1>:<aging>",
                spec
            ))
        })?;

        let number = |idx: usize| -> Result<Option<u64>> {
            caps.get(idx)
                .map(|m| {
                    m.as_str().parse::<u64>().map_err(|e| {
                        SchedError::InvalidArgument(format!("{}: {}", m.as_str(), e))
                    })
                })
                .transpose()
        };

        let q0 = number(1)?.unwrap_or(DEFAULT_QUANTUM_Q0);
        let q1 = number(2)?.unwrap_or(DEFAULT_QUANTUM_Q1);
        let aging = number(3)?.unwrap_or(DEFAULT_AGING_THRESHOLD);
        MlfqConfig::new(q0, q1, aging)
    }
}

impl fmt::Display for MlfqConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.quantum_q0, self.quantum_q1, self.aging_threshold
        )
    }
}
