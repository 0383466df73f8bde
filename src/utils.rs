use crate::error::{Result, SchedError};
use crate::process::Process;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const LINE_PATTERN: &str = r"^\s*(\S+)\s+(-?\d+)\s+(-?\d+)\s*$";

// The input file holds one process per line: `<id> <arrival> <burst>`.
// Lines starting with '#' and blank lines are skipped. Input order is kept,
// it breaks ties between processes arriving at the same tick.
pub fn read_input_file<P: AsRef<Path>>(filename: P) -> Result<Vec<Process>> {
    let file = File::open(filename)?;
    parse_processes(BufReader::new(file))
}

pub fn parse_processes<R: BufRead>(reader: R) -> Result<Vec<Process>> {
    let re = Regex::new(LINE_PATTERN).map_err(|e| SchedError::InvalidArgument(e.to_string()))?;

    let mut processes = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parse_error = || SchedError::Parse {
            line: idx + 1,
            content: trimmed.to_string(),
        };
        let caps = re.captures(trimmed).ok_or_else(parse_error)?;
        let arrival: i64 = caps[2].parse().map_err(|_| parse_error())?;
        let burst: i64 = caps[3].parse().map_err(|_| parse_error())?;
        processes.push(Process::new(&caps[1], arrival, burst)?);
    }

    Ok(processes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_comments_and_blanks() {
        let input = "# id arrival burst\nP1 0 10\n\n  P2   4 4  \n# late one\nP3 5 2\n";
        let processes = parse_processes(input.as_bytes()).unwrap();
        let fields: Vec<(&str, u64, u64)> = processes
            .iter()
            .map(|p| (p.id(), p.arrival_time(), p.burst_time()))
            .collect();
        assert_eq!(fields, vec![("P1", 0, 10), ("P2", 4, 4), ("P3", 5, 2)]);
    }

    #[test]
    fn malformed_line_reports_position() {
        let err = parse_processes("P1 0 10\nP2 four 4\n".as_bytes()).unwrap_err();
        match err {
            SchedError::Parse { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "P2 four 4");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn non_positive_burst_is_invalid() {
        assert!(matches!(
            parse_processes("P1 0 0\n".as_bytes()),
            Err(SchedError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_processes("P1 -2 3\n".as_bytes()),
            Err(SchedError::InvalidArgument(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            read_input_file("does/not/exist"),
            Err(SchedError::Io(_))
        ));
    }
}
