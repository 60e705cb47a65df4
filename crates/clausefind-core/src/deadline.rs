//! Explicit-inputs-only deadline computation.
//!
//! A deadline is computed only when both an explicit base date and an
//! explicit duration exist: the base date comes from a caller-supplied
//! reference date or from the first ISO date in the clause text, and the
//! duration from the first `N days` phrase. Anything less yields an
//! `insufficient_text` outcome — the module never guesses.

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static DAYS_DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,4})\s+days\b").unwrap());

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap());

static ISO_DATE_EXACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Outcome of a deadline computation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeadlineComputation {
    /// Both inputs were explicit; the deadline is `base + duration` days.
    Computed {
        base_date: String,
        /// `"reference_date"` or `"clause_text"`, naming where the base
        /// date came from.
        base_date_source: String,
        duration_days: i64,
        deadline_date: String,
    },
    /// Missing an explicit base date or duration.
    InsufficientText { reason: String },
}

/// Parse a strict `YYYY-MM-DD` date. Malformed shapes and impossible
/// dates both yield `None`.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if !ISO_DATE_EXACT.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// First explicit `N days` duration in the text, if any.
fn extract_days_duration(text: &str) -> Option<i64> {
    let caps = DAYS_DURATION.captures(text)?;
    let n: i64 = caps.get(1)?.as_str().parse().ok()?;
    if n > 0 {
        Some(n)
    } else {
        None
    }
}

/// First ISO date appearing in the text, if any.
fn extract_iso_date(text: &str) -> Option<&str> {
    ISO_DATE.find(text).map(|m| m.as_str())
}

/// Compute a deadline from clause text and an optional reference date.
pub fn compute_deadline(
    clause_text: &str,
    reference_date: Option<&str>,
) -> DeadlineComputation {
    let duration_days = extract_days_duration(clause_text);

    let mut base: Option<(NaiveDate, &str)> = None;
    if let Some(reference) = reference_date {
        let reference = reference.trim();
        if !reference.is_empty() {
            if let Some(date) = parse_iso_date(reference) {
                base = Some((date, "reference_date"));
            }
        }
    }
    if base.is_none() {
        if let Some(iso) = extract_iso_date(clause_text) {
            if let Some(date) = parse_iso_date(iso) {
                base = Some((date, "clause_text"));
            }
        }
    }

    match (base, duration_days) {
        (Some((base_date, source)), Some(days)) => {
            let deadline = base_date + Duration::days(days);
            DeadlineComputation::Computed {
                base_date: base_date.format("%Y-%m-%d").to_string(),
                base_date_source: source.to_string(),
                duration_days: days,
                deadline_date: deadline.format("%Y-%m-%d").to_string(),
            }
        }
        _ => DeadlineComputation::InsufficientText {
            reason: "Need an explicit base date (reference_date or ISO date in text) and an \
                     explicit duration like '30 days'."
                .to_string(),
        },
    }
}
