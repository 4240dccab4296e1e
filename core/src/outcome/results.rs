use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;

/// Per-line tally of an evaluator results file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultsSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub malformed: usize,
}

impl ResultsSummary {
    /// Percentage of well-formed records that succeeded, rounded to 2 places.
    pub fn success_rate(&self) -> f64 {
        let records = self.succeeded + self.failed;
        if records == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / records as f64 * 10_000.0).round() / 100.0
    }

    fn observe(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        self.total += 1;
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => {
                if map.get("success") == Some(&Value::Bool(true)) {
                    self.succeeded += 1;
                } else {
                    self.failed += 1;
                }
            }
            _ => self.malformed += 1,
        }
    }
}

pub fn summarize_str(content: &str) -> ResultsSummary {
    let mut summary = ResultsSummary::default();
    for line in content.lines() {
        summary.observe(line);
    }
    summary
}

pub fn summarize_results(path: &Path) -> std::io::Result<ResultsSummary> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut summary = ResultsSummary::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(summary);
        }
        match std::str::from_utf8(&buf) {
            Ok(line) => summary.observe(line),
            Err(_) => {
                summary.total += 1;
                summary.malformed += 1;
            }
        }
    }
}

/// Records whose `success` field is the JSON literal `true`.
pub fn count_successes(path: &Path) -> std::io::Result<usize> {
    summarize_results(path).map(|s| s.succeeded)
}
