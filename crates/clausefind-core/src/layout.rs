//! Reading-order page reconstruction from positioned text fragments.
//!
//! A PDF content stream emits text as loosely ordered fragments, each with
//! a nominal `(x, y)` position in a coordinate system where `y` increases
//! upward. Reconstruction turns one page's fragments into a deterministic
//! human-reading-order string:
//!
//! 1. Fragments whose whitespace-collapsed text is empty are dropped.
//! 2. Fragments group into lines first-fit in encounter order: a fragment
//!    joins the first existing line whose representative `y` is within
//!    [`LINE_Y_TOLERANCE`], else it opens a new line. First-fit is
//!    order-dependent by design — it is cheap, deterministic, and must be
//!    preserved for output compatibility, even though a tolerance chain
//!    that exceeds the threshold transitively can misgroup.
//! 3. Lines sort by descending `y` (top of page first).
//! 4. Within a line, fragments sort by ascending `x`, ties broken by the
//!    original emission order.
//! 5. Fragments join with a single space, lines with a newline.
//!
//! A page with no usable fragments reconstructs to the empty string.

use std::cmp::Ordering;

use crate::normalize::collapse_whitespace;

/// Vertical distance (in PDF text-space units) within which two fragments
/// are considered part of the same line.
pub const LINE_Y_TOLERANCE: f64 = 2.0;

/// One atomic text token from a page's content stream, with its 2-D
/// placement and emission order.
///
/// `seq` is the fragment's position in the upstream parser's emission
/// order. It is carried explicitly rather than inferred from container
/// order because first-fit grouping and the in-line tie-break both depend
/// on it.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedFragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub seq: usize,
}

impl PositionedFragment {
    pub fn new(text: impl Into<String>, x: f64, y: f64, seq: usize) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            seq,
        }
    }
}

/// Reconstruct one page's reading-order text from its fragments.
pub fn reconstruct_page(fragments: &[PositionedFragment]) -> String {
    struct Line<'a> {
        y: f64,
        fragments: Vec<&'a PositionedFragment>,
    }

    let mut lines: Vec<Line> = Vec::new();
    for frag in fragments {
        if collapse_whitespace(&frag.text).is_empty() {
            continue;
        }
        match lines
            .iter_mut()
            .find(|line| (line.y - frag.y).abs() <= LINE_Y_TOLERANCE)
        {
            Some(line) => line.fragments.push(frag),
            None => lines.push(Line {
                y: frag.y,
                fragments: vec![frag],
            }),
        }
    }

    // Stable sorts keep equal keys in insertion order, which is what makes
    // the output deterministic for coincident positions.
    lines.sort_by(|a, b| b.y.partial_cmp(&a.y).unwrap_or(Ordering::Equal));
    for line in &mut lines {
        line.fragments.sort_by(|a, b| {
            a.x.partial_cmp(&b.x)
                .unwrap_or(Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
    }

    let mut parts: Vec<String> = Vec::new();
    for line in &lines {
        let line_text = line
            .fragments
            .iter()
            .map(|f| collapse_whitespace(&f.text))
            .collect::<Vec<_>>()
            .join(" ");
        let line_text = line_text.trim();
        if !line_text.is_empty() {
            parts.push(line_text.to_string());
        }
    }

    parts.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f64, y: f64, seq: usize) -> PositionedFragment {
        PositionedFragment::new(text, x, y, seq)
    }

    #[test]
    fn test_lines_top_down_fragments_left_right() {
        let fragments = vec![
            frag("B", 10.0, 0.0, 0),
            frag("A", 0.0, 0.0, 1),
            frag("C", 0.0, 10.0, 2),
        ];
        assert_eq!(reconstruct_page(&fragments), "C\nA B");
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(reconstruct_page(&[]), "");
    }

    #[test]
    fn test_whitespace_only_fragments_dropped() {
        let fragments = vec![
            frag("   ", 0.0, 0.0, 0),
            frag("\t", 5.0, 0.0, 1),
            frag("text", 10.0, 0.0, 2),
        ];
        assert_eq!(reconstruct_page(&fragments), "text");
    }

    #[test]
    fn test_y_tolerance_groups_nearby_baselines() {
        // 701.5 is within 2.0 of 700, so both land on one line.
        let fragments = vec![
            frag("left", 0.0, 700.0, 0),
            frag("right", 50.0, 701.5, 1),
        ];
        assert_eq!(reconstruct_page(&fragments), "left right");
    }

    #[test]
    fn test_first_fit_is_encounter_order_not_clustering() {
        // 703 opens its own line (|703 - 700| > 2), then 701.5 joins the
        // *first* line within tolerance — the one anchored at 700 — even
        // though 703 is closer. First-fit, not nearest-fit.
        let fragments = vec![
            frag("a", 0.0, 700.0, 0),
            frag("b", 0.0, 703.0, 1),
            frag("c", 10.0, 701.5, 2),
        ];
        assert_eq!(reconstruct_page(&fragments), "b\na c");
    }

    #[test]
    fn test_equal_x_ties_break_by_sequence() {
        let fragments = vec![
            frag("second", 20.0, 100.0, 1),
            frag("first", 20.0, 100.0, 0),
        ];
        // Same x: emission order decides.
        assert_eq!(reconstruct_page(&fragments), "first second");
    }

    #[test]
    fn test_inner_whitespace_collapsed_within_fragment() {
        let fragments = vec![frag("30  days'\tnotice", 0.0, 0.0, 0)];
        assert_eq!(reconstruct_page(&fragments), "30 days' notice");
    }

    #[test]
    fn test_defaulted_positions_group_together() {
        // Fragments without position data default to (0, 0) upstream and
        // must land on a single deterministic line.
        let fragments = vec![frag("a", 0.0, 0.0, 0), frag("b", 0.0, 0.0, 1)];
        assert_eq!(reconstruct_page(&fragments), "a b");
    }

    #[test]
    fn test_deterministic() {
        let fragments = vec![
            frag("upon", 120.0, 690.0, 0),
            frag("terminated", 40.0, 690.0, 1),
            frag("Agreement", 10.0, 710.0, 2),
            frag("This", 0.0, 710.0, 3),
        ];
        let first = reconstruct_page(&fragments);
        assert_eq!(first, "This Agreement\nterminated upon");
        assert_eq!(first, reconstruct_page(&fragments));
    }
}
