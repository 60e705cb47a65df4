//! Comparison-only text normalization.
//!
//! Matching decisions throughout the pipeline run on normalized text:
//! lowercased, with every run of characters outside `[a-z0-9]` collapsed
//! to a single space, and trimmed. The text returned to callers is always
//! sliced from the original string, never from the normalized form, so
//! [`NormalizedText`] additionally records, for every normalized byte, the
//! byte offset of the originating character in the original string. The
//! excerpt selector maps match positions through that table instead of
//! re-searching the original, which keeps excerpts exact even around
//! punctuation runs and multi-byte characters.

/// Normalized text plus a normalized-byte → original-byte offset map.
///
/// Every normalized character is ASCII, so normalized byte indices and
/// character indices coincide; `offsets[i]` is the byte offset in the
/// original string of the character that produced normalized byte `i`.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    text: String,
    offsets: Vec<usize>,
}

impl NormalizedText {
    pub fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut offsets = Vec::with_capacity(original.len());
        for (byte_idx, ch) in original.char_indices() {
            if ch.is_ascii_alphanumeric() {
                text.push(ch.to_ascii_lowercase());
                offsets.push(byte_idx);
            } else {
                // Whitespace, punctuation, and everything non-ASCII all
                // become a space; a run collapses to its first character.
                if text.is_empty() || text.ends_with(' ') {
                    continue;
                }
                text.push(' ');
                offsets.push(byte_idx);
            }
        }
        if text.ends_with(' ') {
            text.pop();
            offsets.pop();
        }
        Self { text, offsets }
    }

    /// The normalized string: lowercase alphanumerics and single spaces,
    /// trimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Map a byte index in the normalized string back to the byte offset
    /// of the originating character in the original string.
    pub fn original_offset(&self, normalized_idx: usize) -> Option<usize> {
        self.offsets.get(normalized_idx).copied()
    }
}

/// Normalize a string for matching. See [`NormalizedText`] for the rules.
pub fn normalize(s: &str) -> String {
    NormalizedText::new(s).text
}

/// Collapse whitespace runs to single spaces and trim.
///
/// Used when joining page fragments: unlike [`normalize`], case and
/// punctuation are preserved because the result feeds the original
/// (caller-visible) page text.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
