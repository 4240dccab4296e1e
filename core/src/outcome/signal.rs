//! Log heuristics that separate real API failures from model text that
//! merely mentions an error.
//!
//! Matching is line based and case-insensitive. The bare word "error" is
//! never a signal on its own: every matcher requires a status code, an
//! exception class name, or one of the evaluator's fixed message templates.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

/// HTTP statuses the endpoint returns for auth and availability failures,
/// with the reason phrase as a regex fragment.
pub const TRANSIENT_STATUSES: [(u16, &str); 6] = [
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (500, "Internal Server Error"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Time-?out"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSignal {
    NoError,
    TransientApiError {
        /// Name of the matcher that fired.
        pattern: &'static str,
        /// 1-based line number of the first hit, counted from where the
        /// scan started.
        line: usize,
    },
}

#[derive(Debug, Clone)]
pub struct SignalMatcher {
    pub name: &'static str,
    regex: Regex,
}

impl SignalMatcher {
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)?,
        })
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// Ordered matcher list; earlier entries win when several match one line.
#[derive(Debug, Clone)]
pub struct SignalSet {
    matchers: Vec<SignalMatcher>,
}

lazy_static! {
    static ref DEFAULT_SET: SignalSet =
        SignalSet::builtin().expect("default signal patterns are valid");
}

/// `http_status`: a listed code after a status-code label or an HTTP status
/// line, or the canonical `<code> <reason>` pair.
fn http_status_pattern() -> String {
    let codes = TRANSIENT_STATUSES
        .iter()
        .map(|(code, _)| code.to_string())
        .collect::<Vec<_>>()
        .join("|");
    let phrases = TRANSIENT_STATUSES
        .iter()
        .map(|(code, reason)| format!("{code} {reason}"))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?i)(?:status[ _]?code\W{{0,3}}|\bHTTP/\d(?:\.\d)?\s+)(?:{codes})\b|\b(?:{phrases})\b")
}

impl SignalSet {
    pub fn new(matchers: Vec<SignalMatcher>) -> Self {
        Self { matchers }
    }

    pub fn from_specs(specs: &[(&'static str, &str)]) -> Result<Self, regex::Error> {
        let matchers = specs
            .iter()
            .map(|&(name, pattern)| SignalMatcher::new(name, pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(matchers))
    }

    fn builtin() -> Result<Self, regex::Error> {
        let http_status = http_status_pattern();
        Self::from_specs(&[
            ("api_request_failed", r"(?i)\bAPI request failed\b"),
            ("http_status", http_status.as_str()),
            (
                "connection_error",
                r"(?i)\bConnectionError\b|\bconnection (?:error|refused|reset|aborted)\b|Failed to establish a new connection|Max retries exceeded",
            ),
            (
                "request_exception",
                r"(?i)\bRequestException\b|\bAPI (?:request|call) exception\b",
            ),
        ])
    }

    pub fn matchers(&self) -> &[SignalMatcher] {
        &self.matchers
    }

    /// First matcher that fires on `line`, in priority order.
    pub fn match_line(&self, line: &str) -> Option<&'static str> {
        self.matchers
            .iter()
            .find(|m| m.is_match(line))
            .map(|m| m.name)
    }

    pub fn scan_str(&self, content: &str) -> LogSignal {
        for (idx, line) in content.lines().enumerate() {
            if let Some(pattern) = self.match_line(line) {
                return LogSignal::TransientApiError {
                    pattern,
                    line: idx + 1,
                };
            }
        }
        LogSignal::NoError
    }

    pub fn scan_file(&self, path: &Path) -> std::io::Result<LogSignal> {
        self.scan_file_from(path, 0)
    }

    /// Streams the file line by line starting at byte `offset`, so lines
    /// written before a given child was launched are never considered.
    /// Invalid UTF-8 is decoded lossily so a stray binary chunk in the
    /// child's output cannot hide a later signal.
    pub fn scan_file_from(&self, path: &Path, offset: u64) -> std::io::Result<LogSignal> {
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(offset))?;
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut line_no = 0usize;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(LogSignal::NoError);
            }
            line_no += 1;
            let line = String::from_utf8_lossy(&buf);
            if let Some(pattern) = self.match_line(&line) {
                return Ok(LogSignal::TransientApiError {
                    pattern,
                    line: line_no,
                });
            }
        }
    }
}

impl Default for SignalSet {
    fn default() -> Self {
        DEFAULT_SET.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(line: &str) -> Option<&'static str> {
        SignalSet::default().match_line(line)
    }

    #[test]
    fn api_request_failed_template() {
        assert_eq!(
            first("ERROR vlm_agent: API request failed (status code: 502), response: bad gateway"),
            Some("api_request_failed")
        );
    }

    #[test]
    fn status_codes_in_every_spelling() {
        for line in [
            "status code 500",
            "status code: 503",
            "status_code=401",
            "(StatusCode: 403)",
            "HTTP/1.1 504 Gateway Timeout",
            "upstream said 502 Bad Gateway",
        ] {
            assert_eq!(first(line), Some("http_status"), "line: {line}");
        }
    }

    #[test]
    fn every_listed_status_is_matched() {
        for (code, _) in TRANSIENT_STATUSES {
            assert_eq!(
                first(&format!("status code: {code}")),
                Some("http_status"),
                "code {code}"
            );
        }
        assert_eq!(first("504 Gateway Time-out"), Some("http_status"));
    }

    #[test]
    fn non_transient_status_codes_are_ignored() {
        assert_eq!(first("API response status code: 200"), None);
        assert_eq!(first("status code 404"), None);
        assert_eq!(first("status code 5000"), None);
    }

    #[test]
    fn connection_and_request_exceptions() {
        assert_eq!(
            first("requests.exceptions.ConnectionError: HTTPSConnectionPool"),
            Some("connection_error")
        );
        assert_eq!(
            first("Max retries exceeded with url: /api/v1"),
            Some("connection_error")
        );
        assert_eq!(
            first("API request exception (attempt 2/3): read timed out"),
            Some("request_exception")
        );
        assert_eq!(first("raised RequestException"), Some("request_exception"));
    }

    #[test]
    fn bare_error_in_model_text_is_not_a_signal() {
        let set = SignalSet::default();
        let log = r#"2025-03-14 09:27:01 INFO processed knob_001.jpg
{"image_name": "knob_001.jpg", "success": true, "answer": "Error: the knob is at position 3"}
2025-03-14 09:27:02 INFO Stage 2 answer mentions an error margin of 5 degrees
"#;
        assert_eq!(set.scan_str(log), LogSignal::NoError);
    }

    #[test]
    fn scan_reports_first_hit_line() {
        let set = SignalSet::default();
        let log = "ok\nstill ok\nAPI request failed (status code: 503)\nConnectionError\n";
        assert_eq!(
            set.scan_str(log),
            LogSignal::TransientApiError {
                pattern: "api_request_failed",
                line: 3
            }
        );
    }

    #[test]
    fn custom_sets_are_ordered() {
        let set = SignalSet::from_specs(&[("b", "beta"), ("a", "alpha|beta")]).unwrap();
        assert_eq!(set.match_line("alpha beta"), Some("b"));
        assert_eq!(set.match_line("alpha"), Some("a"));
        assert_eq!(set.matchers().len(), 2);
    }

    #[test]
    fn scan_file_tolerates_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let mut bytes = b"binary \xff\xfe junk\n".to_vec();
        bytes.extend_from_slice(b"status code: 500\n");
        std::fs::write(&path, bytes).unwrap();

        let signal = SignalSet::default().scan_file(&path).unwrap();
        assert_eq!(
            signal,
            LogSignal::TransientApiError {
                pattern: "http_status",
                line: 2
            }
        );
    }

    #[test]
    fn scan_from_offset_skips_earlier_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let before = "WARN pip: Failed to establish a new connection\n";
        std::fs::write(&path, format!("{before}INFO evaluator done\n")).unwrap();

        let set = SignalSet::default();
        assert!(matches!(
            set.scan_file(&path).unwrap(),
            LogSignal::TransientApiError { pattern: "connection_error", .. }
        ));
        assert_eq!(
            set.scan_file_from(&path, before.len() as u64).unwrap(),
            LogSignal::NoError
        );
    }
}
