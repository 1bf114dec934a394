//! Log sanitization for patient-identifying text.
//!
//! Formatted log lines pass through [`SanitizingMakeWriter`] before reaching
//! the sink. The patterns cover what this application handles:
//! - Email addresses and phone numbers typed into the form
//! - Contextual `name=` / `patient=` / `email=` / `phone=` fields
//! - Report file names, which embed the patient name
//! - UUIDs
//!
//! # Important: keep identifiers out of log calls
//!
//! Sanitizing strings is a fallback. Callers should not pass patient
//! contact details to `tracing` macros in the first place.
//!
//! # Performance
//!
//! `sanitize()` caps the number of bytes scanned per call (see
//! `CARDIOLENS_SANITIZE_MAX_BYTES`).

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PII_PATTERNS: OnceLock<PiiPatterns> = OnceLock::new();

/// Default cap on bytes sanitized per call (16 KiB).
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct PiiPattern {
    regex: Regex,
    replacement: &'static str,
}

struct PiiPatterns {
    set: RegexSet,
    patterns: Vec<PiiPattern>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var("CARDIOLENS_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn get_patterns() -> &'static PiiPatterns {
    PII_PATTERNS.get_or_init(|| {
        // Order matters: contextual fields run before the bare email/phone
        // rules so the whole value is replaced in one piece.
        let rules: Vec<(&'static str, &'static str)> = vec![
            (
                r#"(?i)\b(?P<key>name|patient|email|phone)\s*[:=]\s*(?:"[^"\n]*"|[^\s,;]+)"#,
                "$key=[REDACTED]",
            ),
            (r"[^\s/\\]+_Heart_Report\.pdf", "[REDACTED]_Heart_Report.pdf"),
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
                "[REDACTED-UUID]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
            (
                r"(?:\+\d{1,3}[-.\s]?)?\(?\b[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b",
                "[REDACTED-PHONE]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let patterns = rules
            .into_iter()
            .map(|(pattern, replacement)| PiiPattern {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        PiiPatterns { set, patterns }
    })
}

/// Replace patient-identifying patterns in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let matched: Vec<usize> = patterns.set.matches(prefix).into_iter().collect();
    let mut result = prefix.to_string();
    for idx in matched {
        let pattern = &patterns.patterns[idx];
        result = pattern
            .regex
            .replace_all(&result, pattern.replacement)
            .into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// A `tracing_subscriber` writer wrapper that sanitizes each formatted log
/// line before it reaches the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let sanitized = sanitize(&String::from_utf8_lossy(&line));
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A single line with no newline must not buffer without bound.
        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }
        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_sanitize_email() {
        let sanitized = sanitize("Contact: patient.one@hospital.com");
        assert!(sanitized.contains("[REDACTED-EMAIL]"));
        assert!(!sanitized.contains("hospital.com"));
    }

    #[test]
    fn test_sanitize_phone() {
        let sanitized = sanitize("Callback 555-123-4567 requested");
        assert!(sanitized.contains("[REDACTED-PHONE]"));
        assert!(!sanitized.contains("4567"));
    }

    #[test]
    fn test_sanitize_contextual_name() {
        let sanitized = sanitize(r#"submission name="Jane Doe" age=54"#);
        assert_eq!(sanitized, "submission name=[REDACTED] age=54");

        let sanitized = sanitize("patient: Alice, risk=80");
        assert_eq!(sanitized, "patient=[REDACTED], risk=80");
    }

    #[test]
    fn test_sanitize_report_file_name() {
        let sanitized = sanitize("Report saved to reports/Jane_Doe_Heart_Report.pdf");
        assert_eq!(sanitized, "Report saved to reports/[REDACTED]_Heart_Report.pdf");
    }

    #[test]
    fn test_sanitize_uuid() {
        let sanitized = sanitize("id 550e8400-e29b-41d4-a716-446655440000 done");
        assert_eq!(sanitized, "id [REDACTED-UUID] done");
    }

    #[test]
    fn test_clinical_values_pass_through() {
        let line = "Aligned 15 features (age=54, cholesterol=239, oldpeak=1.2)";
        assert_eq!(sanitize(line), line);
    }

    #[test]
    fn test_sanitize_truncates_large_inputs() {
        let input = "prefix é suffix that keeps going";
        let sanitized = sanitize_with_limit(input, 8);
        assert!(sanitized.ends_with(" [TRUNCATED]"));
        assert!(sanitized.starts_with("prefix"));
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sanitizes_per_line() {
        let capture = Capture::default();
        let sink = capture.clone();
        let make = SanitizingMakeWriter::new(move || sink.clone());
        {
            let mut writer = make.make_writer();
            writer.write_all(b"first a@b.org\nsecond ").unwrap();
            writer.write_all(b"line\n").unwrap();
        }

        let out = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert_eq!(out, "first [REDACTED-EMAIL]\nsecond line\n");
    }
}
