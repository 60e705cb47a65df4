//! Deterministic keyword/phrase relevance scoring with verbatim excerpts.
//!
//! The ranking pipeline operates on a document's reconstructed page texts
//! and a free-text query, entirely in-memory and without randomness:
//!
//! 1. Tokenize the query ([`tokenize_query`]): normalize, split, drop
//!    stop words, deduplicate preserving first-occurrence order.
//! 2. Score each page ([`rank_pages`]): a phrase bonus when the normalized
//!    full query appears in the normalized page text, plus capped
//!    per-token occurrence bonuses. Pages scoring zero are excluded.
//! 3. Select an excerpt ([`select_excerpt`]): a bounded window of the
//!    *original* page text around the best match, never the normalized
//!    form.
//! 4. Sort by score (desc), page number (asc), truncate to the result cap.
//!
//! All scoring knobs are named constants so tests can pin exact scores.

use crate::models::ScoredExcerpt;
use crate::normalize::{normalize, NormalizedText};

/// Common English function words dropped from queries before token
/// matching.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "to", "of", "in", "for", "on", "at", "by", "with", "from",
    "this", "that", "these", "those", "is", "are", "be", "as", "it",
];

/// Points awarded when the normalized full query phrase appears in the
/// normalized page text.
pub const PHRASE_BONUS: i64 = 50;

/// Points awarded per counted occurrence of a query token.
pub const TOKEN_HIT_POINTS: i64 = 5;

/// Occurrences of a single token counted toward the score, capping the
/// influence of repetition.
pub const TOKEN_OCCURRENCE_CAP: usize = 10;

/// The excerpt window starts `max_chars / EXCERPT_LEAD_DIVISOR` characters
/// before the match position.
pub const EXCERPT_LEAD_DIVISOR: usize = 3;

/// Allowed and default bounds for the caller-supplied result limits.
pub const MAX_RESULTS_MIN: usize = 1;
pub const MAX_RESULTS_MAX: usize = 10;
pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const EXCERPT_MAX_CHARS_MIN: usize = 120;
pub const EXCERPT_MAX_CHARS_MAX: usize = 2000;
pub const DEFAULT_EXCERPT_MAX_CHARS: usize = 800;

/// Clamped result limits for one ranking invocation.
#[derive(Debug, Clone, Copy)]
pub struct RankLimits {
    /// Maximum results returned, always within `[1, 10]`.
    pub max_results: usize,
    /// Excerpt window size in characters, always within `[120, 2000]`.
    pub excerpt_max_chars: usize,
}

impl Default for RankLimits {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            excerpt_max_chars: DEFAULT_EXCERPT_MAX_CHARS,
        }
    }
}

impl RankLimits {
    /// Apply caller-supplied overrides on top of these defaults, clamping
    /// everything into range. `None` keeps the (also clamped) default.
    pub fn with_overrides(self, max_results: Option<i64>, excerpt_max_chars: Option<i64>) -> Self {
        Self {
            max_results: clamp_i64(
                max_results.unwrap_or(self.max_results as i64),
                MAX_RESULTS_MIN,
                MAX_RESULTS_MAX,
            ),
            excerpt_max_chars: clamp_i64(
                excerpt_max_chars.unwrap_or(self.excerpt_max_chars as i64),
                EXCERPT_MAX_CHARS_MIN,
                EXCERPT_MAX_CHARS_MAX,
            ),
        }
    }
}

fn clamp_i64(value: i64, min: usize, max: usize) -> usize {
    value.clamp(min as i64, max as i64) as usize
}

/// Split a query into its significant tokens.
///
/// Normalizes, splits on whitespace, drops [`STOP_WORDS`], and
/// deduplicates preserving first-occurrence order (the order is observable
/// through match reasons). An empty or all-stop-word query yields an empty
/// list — valid input, scoring then relies on phrase matching alone.
pub fn tokenize_query(query: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for tok in normalize(query).split_whitespace() {
        if STOP_WORDS.contains(&tok) {
            continue;
        }
        if !tokens.iter().any(|t| t == tok) {
            tokens.push(tok.to_string());
        }
    }
    tokens
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut idx = 0;
    while let Some(pos) = haystack[idx..].find(needle) {
        count += 1;
        idx += pos + needle.len();
    }
    count
}

/// Pick a bounded window of the original page text around the query match.
///
/// When the normalized query occurs in the normalized page text, the match
/// position maps back to the original text through the offset table and
/// the window starts `max_chars / 3` characters before it. Without a match
/// the window is simply the head of the page. Character arithmetic runs on
/// `char_indices`, so the result is always a valid UTF-8 substring of the
/// original text.
pub fn select_excerpt(
    page_text: &str,
    norm: &NormalizedText,
    query_norm: &str,
    max_chars: usize,
) -> String {
    if page_text.is_empty() {
        return String::new();
    }

    let match_offset = if query_norm.is_empty() {
        None
    } else {
        norm.text()
            .find(query_norm)
            .and_then(|idx| norm.original_offset(idx))
    };

    let chars: Vec<(usize, char)> = page_text.char_indices().collect();
    let (start_char, end_char) = match match_offset {
        None => (0, max_chars.min(chars.len())),
        Some(byte_offset) => {
            let match_char = chars.partition_point(|(b, _)| *b < byte_offset);
            let start = match_char.saturating_sub(max_chars / EXCERPT_LEAD_DIVISOR);
            (start, (start + max_chars).min(chars.len()))
        }
    };

    let start_byte = chars[start_char].0;
    let end_byte = if end_char < chars.len() {
        chars[end_char].0
    } else {
        page_text.len()
    };
    page_text[start_byte..end_byte].to_string()
}

/// Rank a document's pages against a query.
///
/// Returns at most `limits.max_results` excerpts, sorted by descending
/// score with ties broken by ascending page number. Pages that score zero,
/// or whose excerpt trims to nothing, are excluded entirely. Pure and
/// deterministic for identical inputs.
pub fn rank_pages(pages: &[String], query: &str, limits: RankLimits) -> Vec<ScoredExcerpt> {
    let tokens = tokenize_query(query);
    let query_norm = normalize(query);

    let mut scored: Vec<ScoredExcerpt> = Vec::new();

    for (i, text) in pages.iter().enumerate() {
        let norm = NormalizedText::new(text);

        let mut score: i64 = 0;
        let mut reasons: Vec<String> = Vec::new();

        // Phrase match is strongest.
        if !query_norm.is_empty() && norm.text().contains(query_norm.as_str()) {
            score += PHRASE_BONUS;
            reasons.push("contains full query phrase".to_string());
        }

        for tok in &tokens {
            let count = count_occurrences(norm.text(), tok);
            if count > 0 {
                score += TOKEN_HIT_POINTS * count.min(TOKEN_OCCURRENCE_CAP) as i64;
                reasons.push(format!("contains token \"{}\" ({}x)", tok, count));
            }
        }

        if score <= 0 {
            continue;
        }

        let exact_text = select_excerpt(text, &norm, &query_norm, limits.excerpt_max_chars)
            .trim()
            .to_string();
        if exact_text.is_empty() {
            continue;
        }

        scored.push(ScoredExcerpt {
            page: i + 1,
            exact_text,
            match_reason: reasons.join("; "),
            score,
        });
    }

    scored.sort_by(|a, b| b.score.cmp(&a.score).then(a.page.cmp(&b.page)));
    scored.truncate(limits.max_results);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_dedups() {
        assert_eq!(
            tokenize_query("the Termination of the notice, and the Termination"),
            vec!["termination", "notice"]
        );
    }

    #[test]
    fn test_tokenize_stop_word_only_query_is_empty() {
        assert!(tokenize_query("the and of").is_empty());
        assert!(tokenize_query("").is_empty());
    }

    #[test]
    fn test_count_occurrences_non_overlapping() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("notice and notice", "notice"), 2);
        assert_eq!(count_occurrences("text", ""), 0);
    }

    #[test]
    fn test_single_token_scenario() {
        // Single-token query: no phrase bonus line (the phrase and the
        // token coincide, but both contributions apply independently).
        let page = "This Agreement may be terminated by either party upon 30 days written notice.";
        let results = rank_pages(
            &pages(&[page]),
            "terminated",
            RankLimits {
                max_results: 5,
                excerpt_max_chars: 120,
            },
        );
        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.page, 1);
        // Phrase (+50) and token (1 occurrence, +5).
        assert_eq!(r.score, PHRASE_BONUS + TOKEN_HIT_POINTS);
        assert_eq!(
            r.match_reason,
            "contains full query phrase; contains token \"terminated\" (1x)"
        );
        assert!(page.contains(&r.exact_text));
    }

    #[test]
    fn test_token_occurrence_cap() {
        let repeated = vec!["indemnify"; 25].join(" ");
        let results = rank_pages(&pages(&[&repeated]), "indemnify obligations", RankLimits::default());
        assert_eq!(results.len(), 1);
        // Phrase absent, "obligations" absent; "indemnify" counts 25 times
        // but only 10 score.
        assert_eq!(
            results[0].score,
            TOKEN_HIT_POINTS * TOKEN_OCCURRENCE_CAP as i64
        );
        assert_eq!(
            results[0].match_reason,
            "contains token \"indemnify\" (25x)"
        );
    }

    #[test]
    fn test_phrase_bonus_requires_contiguity() {
        let with_phrase = "Notice of termination must be in writing.";
        let tokens_only = "The termination clause requires prior notice.";
        let results = rank_pages(
            &pages(&[tokens_only, with_phrase]),
            "notice of termination",
            RankLimits::default(),
        );
        assert_eq!(results.len(), 2);
        // Page 2 has the contiguous phrase: 50 + 5 + 5; page 1 only tokens.
        assert_eq!(results[0].page, 2);
        assert_eq!(results[0].score, PHRASE_BONUS + 2 * TOKEN_HIT_POINTS);
        assert_eq!(results[1].page, 1);
        assert_eq!(results[1].score, 2 * TOKEN_HIT_POINTS);
    }

    #[test]
    fn test_reason_order_phrase_then_tokens() {
        let page = "Payment due within 30 days of the invoice date.";
        let results = rank_pages(&pages(&[page]), "payment due", RankLimits::default());
        assert_eq!(
            results[0].match_reason,
            "contains full query phrase; contains token \"payment\" (1x); contains token \"due\" (1x)"
        );
    }

    #[test]
    fn test_non_matching_pages_excluded() {
        let results = rank_pages(
            &pages(&["Completely unrelated text.", "The warranty survives termination."]),
            "termination",
            RankLimits::default(),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].page, 2);
    }

    #[test]
    fn test_empty_pages_excluded() {
        let results = rank_pages(&pages(&["", "warranty applies"]), "warranty", RankLimits::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].page, 2);
    }

    #[test]
    fn test_stop_word_only_query_returns_nothing() {
        let results = rank_pages(
            &pages(&["The term of this agreement and the rest."]),
            "the and of",
            RankLimits::default(),
        );
        // Tokens all drop; the normalized phrase "the and of" does not
        // occur contiguously, so nothing scores.
        assert!(results.is_empty());
    }

    #[test]
    fn test_ties_break_by_page_number() {
        let page = "Confidentiality obligations survive.";
        let results = rank_pages(&pages(&[page, page, page]), "confidentiality", RankLimits::default());
        let page_order: Vec<usize> = results.iter().map(|r| r.page).collect();
        assert_eq!(page_order, vec![1, 2, 3]);
    }

    #[test]
    fn test_scores_non_increasing() {
        let results = rank_pages(
            &pages(&[
                "notice",
                "notice notice notice",
                "notice notice",
            ]),
            "notice",
            RankLimits::default(),
        );
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_max_results_truncation() {
        let many: Vec<String> = (0..20).map(|_| "governing law".to_string()).collect();
        let results = rank_pages(&many, "governing", RankLimits::default());
        assert_eq!(results.len(), DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn test_limits_clamping() {
        let limits = RankLimits::default().with_overrides(Some(999), Some(99_999));
        assert_eq!(limits.max_results, MAX_RESULTS_MAX);
        assert_eq!(limits.excerpt_max_chars, EXCERPT_MAX_CHARS_MAX);

        let limits = RankLimits::default().with_overrides(Some(0), Some(-5));
        assert_eq!(limits.max_results, MAX_RESULTS_MIN);
        assert_eq!(limits.excerpt_max_chars, EXCERPT_MAX_CHARS_MIN);

        let limits = RankLimits::default().with_overrides(None, None);
        assert_eq!(limits.max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(limits.excerpt_max_chars, DEFAULT_EXCERPT_MAX_CHARS);
    }

    #[test]
    fn test_excerpt_centered_on_match() {
        let filler = "lorem ipsum dolor sit amet ".repeat(20);
        let page = format!("{}the indemnification clause lives here{}", filler, filler);
        let norm = NormalizedText::new(&page);
        let excerpt = select_excerpt(&page, &norm, "indemnification clause", 120);
        assert!(excerpt.contains("indemnification clause"));
        assert_eq!(excerpt.chars().count(), 120);
        assert!(page.contains(&excerpt));
    }

    #[test]
    fn test_excerpt_head_of_page_without_match() {
        let page = "Short page text.";
        let norm = NormalizedText::new(page);
        assert_eq!(select_excerpt(page, &norm, "absent", 120), page);

        let long = "word ".repeat(100);
        let norm = NormalizedText::new(&long);
        let excerpt = select_excerpt(&long, &norm, "absent", 120);
        assert_eq!(excerpt.chars().count(), 120);
        assert!(long.starts_with(&excerpt));
    }

    #[test]
    fn test_excerpt_window_clamps_at_page_start() {
        let page = "Termination rights begin immediately here.";
        let norm = NormalizedText::new(page);
        let excerpt = select_excerpt(page, &norm, "termination rights", 120);
        // Match at position 0: the lead clamp keeps the window at the start.
        assert_eq!(excerpt, page);
    }

    #[test]
    fn test_excerpt_aligns_through_punctuation() {
        // The phrase normalizes across a punctuation run; the excerpt must
        // still be sliced from the original, aligned to the real match.
        let filler = "x".repeat(500);
        let page = format!("{} terminated—by either party {}", filler, filler);
        let results = rank_pages(
            &pages(&[&page]),
            "terminated by either party",
            RankLimits {
                max_results: 5,
                excerpt_max_chars: 120,
            },
        );
        assert_eq!(results.len(), 1);
        assert!(results[0].exact_text.contains("terminated—by either party"));
        assert!(page.contains(&results[0].exact_text));
    }

    #[test]
    fn test_rank_deterministic() {
        let docs = pages(&[
            "This Agreement may be terminated by either party.",
            "Notice must be delivered in writing.",
            "Termination for cause is effective immediately.",
        ]);
        let a = rank_pages(&docs, "terminated notice", RankLimits::default());
        let b = rank_pages(&docs, "terminated notice", RankLimits::default());
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.page, y.page);
            assert_eq!(x.exact_text, y.exact_text);
            assert_eq!(x.match_reason, y.match_reason);
            assert_eq!(x.score, y.score);
        }
    }
}
