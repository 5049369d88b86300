//! Step results and their console rendering

use std::fmt::Debug;
use std::io::{self, Write};

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use super::runner::RunSummary;

const RULE_WIDTH: usize = 60;
const BANNER_WIDTH: usize = 80;

/// Outcome of one reported check
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub test_name: String,
    pub success: bool,
    pub message: String,
    pub payload: Option<Value>,
}

impl TestResult {
    pub fn pass(name: &str, message: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            test_name: name.to_string(),
            success: true,
            message: message.into(),
            payload,
        }
    }

    pub fn fail(name: &str, message: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            test_name: name.to_string(),
            success: false,
            message: message.into(),
            payload,
        }
    }
}

/// Convert any value into a loggable payload
///
/// Values that cannot be represented as JSON fall back to their `Debug`
/// text instead of failing.
pub fn payload_of<T: Serialize + Debug + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|_| Value::String(format!("{:?}", value)))
}

fn render_payload(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

/// Writes step results, banners and the summary
///
/// Write errors are ignored: reporting never interrupts a run.
pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Report one result
    pub fn log(&mut self, result: &TestResult) {
        self.log_test(
            &result.test_name,
            result.success,
            &result.message,
            result.payload.as_ref(),
        );
    }

    pub fn log_test(&mut self, name: &str, success: bool, message: &str, data: Option<&Value>) {
        let marker = if success {
            "✓ PASS".green().bold()
        } else {
            "✗ FAIL".red().bold()
        };
        let _ = writeln!(self.out, "{}: {}", marker, name);
        let _ = writeln!(self.out, "   {}", message);
        if let Some(data) = data {
            let rendered = render_payload(data).replace('\n', "\n   ");
            let _ = writeln!(self.out, "   Response: {}", rendered);
        }
        let _ = writeln!(self.out, "{}", "-".repeat(RULE_WIDTH).dimmed());
    }

    pub fn banner(&mut self, base_url: &str) {
        let rule = "=".repeat(BANNER_WIDTH);
        let _ = writeln!(self.out, "{}", rule);
        let _ = writeln!(
            self.out,
            "{}",
            "CROP CONTRACT API - ENDPOINT TESTING".blue().bold()
        );
        let _ = writeln!(self.out, "{}", rule);
        let _ = writeln!(self.out, "Target: {}", base_url.white().bold());
        let _ = writeln!(self.out, "{}", rule);
    }

    pub fn summary(&mut self, summary: &RunSummary) {
        let rule = "=".repeat(BANNER_WIDTH);
        let _ = writeln!(self.out, "{}", rule);
        let _ = writeln!(self.out, "{}", "TEST SUMMARY:".cyan().bold());
        let _ = writeln!(self.out, "{}", rule);
        let _ = writeln!(
            self.out,
            "{} Passed: {}/{}",
            "✓".green(),
            summary.passed,
            summary.total
        );
        let _ = writeln!(
            self.out,
            "{} Failed: {}/{}",
            "✗".red(),
            summary.failed,
            summary.total
        );
        if !summary.all_passed() {
            let _ = writeln!(
                self.out,
                "{}",
                "Some tests failed. Check the details above.".yellow()
            );
        }
        let _ = writeln!(self.out, "{}", rule);

        if !summary.state.is_empty() {
            let _ = writeln!(self.out, "\n{}", "Generated Test Data:".cyan());
            for (key, value) in summary.state.entries() {
                let _ = writeln!(self.out, "   {}: {}", key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::collections::HashMap;

    fn captured(f: impl FnOnce(&mut Reporter<Vec<u8>>)) -> String {
        let mut reporter = Reporter::new(Vec::new());
        f(&mut reporter);
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_pass_line_with_payload() {
        let out = captured(|r| {
            r.log(&TestResult::pass(
                "Health Check",
                "Server is running",
                Some(json!({"status": "healthy"})),
            ))
        });
        assert!(out.contains("PASS"));
        assert!(out.contains("Health Check"));
        assert!(out.contains("Server is running"));
        assert!(out.contains("\"status\": \"healthy\""));
    }

    #[test]
    fn test_fail_line_without_payload() {
        let out = captured(|r| r.log_test("Create Listing", false, "Status: 500", None));
        assert!(out.contains("FAIL"));
        assert!(out.contains("Status: 500"));
        assert!(!out.contains("Response:"));
    }

    #[test]
    fn test_dates_render_as_iso_text() {
        let date = NaiveDate::from_ymd_opt(2026, 11, 13).unwrap();
        let payload = payload_of(&json!({"delivery_date": payload_of(&date)}));
        let out = captured(|r| r.log_test("Create Listing", true, "ok", Some(&payload)));
        assert!(out.contains("2026-11-13"));
    }

    #[test]
    fn test_unrepresentable_payload_falls_back_to_text() {
        // JSON object keys must be strings, so tuple keys cannot serialize.
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");

        let payload = payload_of(&map);
        assert_eq!(payload, Value::String(format!("{:?}", map)));

        let out = captured(|r| r.log_test("Odd Payload", true, "ok", Some(&payload)));
        assert!(out.contains("(1, 2)"));
    }

    #[test]
    fn test_write_errors_are_ignored() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut reporter = Reporter::new(Broken);
        reporter.log_test("Health Check", true, "ok", Some(&json!({"a": 1})));
        reporter.banner("http://localhost:8000");
    }
}
