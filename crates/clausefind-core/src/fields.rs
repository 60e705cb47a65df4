//! Regex-only key-field extraction from quoted clause text.
//!
//! Deterministic pattern matching, nothing more: dates in three common
//! shapes, a street-address-looking line, and a well-formed email address.
//! A field that does not match stays an empty string — absence is a normal
//! outcome, not an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap());

static US_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").unwrap());

static MONTH_NAME_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\s+\d{1,2},\s+\d{4}\b",
    )
    .unwrap()
});

static ADDRESS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b\d{1,6}\s+[^,]{2,40}\s+(?:St|Street|Ave|Avenue|Rd|Road|Blvd|Boulevard|Ln|Lane|Dr|Drive)\b",
    )
    .unwrap()
});

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").unwrap());

// Scope date extraction to the 200 chars after the field label, when the
// label is present at all.
static EFFECTIVE_DATE_SCOPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\bEffective Date\b.{0,200}").unwrap());

static TERMINATION_DATE_SCOPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\bTermination Date\b.{0,200}").unwrap());

/// Key fields pulled out of quoted clause text. Unmatched fields are empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KeyFields {
    pub effective_date: String,
    pub termination_date: String,
    pub notice_address_line: String,
    pub email_address: String,
}

/// Extract all key fields from combined clause text.
pub fn extract_key_fields(text: &str) -> KeyFields {
    let effective_scope = EFFECTIVE_DATE_SCOPE
        .find(text)
        .map(|m| m.as_str())
        .unwrap_or(text);
    let termination_scope = TERMINATION_DATE_SCOPE
        .find(text)
        .map(|m| m.as_str())
        .unwrap_or(text);

    KeyFields {
        effective_date: extract_date_like(effective_scope).unwrap_or_default(),
        termination_date: extract_date_like(termination_scope).unwrap_or_default(),
        notice_address_line: extract_address_line(text).unwrap_or_default(),
        email_address: extract_email(text).unwrap_or_default(),
    }
}

/// First date-looking string: ISO first, then US numeric, then month-name.
pub fn extract_date_like(text: &str) -> Option<String> {
    if let Some(m) = ISO_DATE.find(text) {
        return Some(m.as_str().to_string());
    }
    if let Some(m) = US_DATE.find(text) {
        return Some(m.as_str().to_string());
    }
    MONTH_NAME_DATE.find(text).map(|m| m.as_str().to_string())
}

/// First line that looks like a street address.
pub fn extract_address_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .find(|l| ADDRESS_LINE.is_match(l))
        .map(|l| l.to_string())
}

/// First well-formed email address.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL
        .find(text)
        .map(|m| m.as_str().to_string())
        .filter(|s| is_valid_email(s))
}

/// Whole-string email shape check: one `@`, no whitespace, dotted domain.
pub fn is_valid_email(s: &str) -> bool {
    static SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
    SHAPE.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_prefers_iso() {
        let text = "Signed March 5, 2024, effective 2024-03-05, filed 3/5/2024.";
        assert_eq!(extract_date_like(text).unwrap(), "2024-03-05");
    }

    #[test]
    fn test_date_us_numeric() {
        assert_eq!(extract_date_like("due 3/15/2024 at noon").unwrap(), "3/15/2024");
    }

    #[test]
    fn test_date_month_name() {
        assert_eq!(
            extract_date_like("executed on January 2, 2025 by both parties").unwrap(),
            "January 2, 2025"
        );
        assert_eq!(extract_date_like("around Sep 9, 2023").unwrap(), "Sep 9, 2023");
    }

    #[test]
    fn test_date_absent() {
        assert!(extract_date_like("no dates here").is_none());
    }

    #[test]
    fn test_label_scoping() {
        let text = "Effective Date: 2024-01-01. Later on, the Termination Date shall be 2025-06-30.";
        let fields = extract_key_fields(text);
        assert_eq!(fields.effective_date, "2024-01-01");
        assert_eq!(fields.termination_date, "2025-06-30");
    }

    #[test]
    fn test_missing_label_falls_back_to_whole_text() {
        let fields = extract_key_fields("The agreement starts 2024-02-02.");
        // No labels: both date fields scan the whole text.
        assert_eq!(fields.effective_date, "2024-02-02");
        assert_eq!(fields.termination_date, "2024-02-02");
    }

    #[test]
    fn test_address_line() {
        let text = "Notices shall be sent to:\n500 Market Street, Suite 400\nAttn: Legal";
        assert_eq!(
            extract_address_line(text).unwrap(),
            "500 Market Street, Suite 400"
        );
        assert!(extract_address_line("no address present").is_none());
    }

    #[test]
    fn test_email() {
        assert_eq!(
            extract_email("send notice to legal@example.com promptly").unwrap(),
            "legal@example.com"
        );
        assert!(extract_email("nothing at all").is_none());
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("two@@example.com"));
    }

    #[test]
    fn test_unmatched_fields_stay_empty() {
        let fields = extract_key_fields("plain clause text without extractable fields");
        assert!(fields.effective_date.is_empty());
        assert!(fields.termination_date.is_empty());
        assert!(fields.notice_address_line.is_empty());
        assert!(fields.email_address.is_empty());
    }
}
