//! Deterministic notice-email rendering.
//!
//! Pure string templating: given recipients, a purpose, and the quoted
//! clauses backing the notice, produce the same email text every time.
//! No dates, no randomness, no external lookups.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::{Citation, DISCLAIMER};

static EXCESS_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// A rendered notice email.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

/// Normalize line endings: CRLF becomes LF, runs of blank lines collapse
/// to a single blank line, and the result is trimmed.
fn normalize_lines(s: &str) -> String {
    let unified = s.replace("\r\n", "\n");
    EXCESS_BLANK_LINES
        .replace_all(&unified, "\n\n")
        .trim()
        .to_string()
}

/// Render the notice email.
///
/// `subject` falls back to `Notice regarding: <purpose>` when absent or
/// blank. Clauses without text are skipped; each kept clause is quoted
/// verbatim with its page number.
pub fn render_notice_email(
    to: &str,
    from: &str,
    purpose: &str,
    subject: Option<&str>,
    clauses: &[Citation],
) -> NoticeEmail {
    let to = to.trim().to_string();
    let from = from.trim().to_string();

    let subject = match subject.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => format!("Notice regarding: {}", purpose.trim()),
    };

    let quoted: Vec<String> = clauses
        .iter()
        .filter(|c| c.page >= 1 && !c.exact_text.trim().is_empty())
        .map(|c| {
            format!(
                "Page {}:\n\"\"\"\n{}\n\"\"\"",
                c.page,
                normalize_lines(&c.exact_text)
            )
        })
        .collect();
    let quoted = if quoted.is_empty() {
        "(No cited clauses provided.)".to_string()
    } else {
        quoted.join("\n\n")
    };

    let body = format!(
        "To: {to}\n\
         From: {from}\n\
         Subject: {subject}\n\n\
         Hello,\n\n\
         This email provides notice regarding: {purpose}.\n\n\
         Relevant quoted clauses:\n\n\
         {quoted}\n\n\
         Sincerely,\n\
         {from}\n\n\
         ---\n\
         {disclaimer}",
        to = to,
        from = from,
        subject = subject,
        purpose = normalize_lines(purpose),
        quoted = quoted,
        disclaimer = DISCLAIMER,
    );

    NoticeEmail {
        to,
        from,
        subject,
        body,
    }
}
