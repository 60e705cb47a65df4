//! PDF positioned-fragment extraction.
//!
//! This is the parsing collaborator the core pipeline is specified
//! against: it turns raw PDF bytes into one list of
//! [`PositionedFragment`]s per page, in ascending page-number order.
//! Page number is positional (index + 1) downstream, so the order here is
//! load-bearing.
//!
//! The walk is intentionally shallow. It tracks only the text cursor —
//! `BT`/`ET`, `Tm`, `Td`/`TD`, `TL`, `T*`, and the text-showing operators
//! `Tj`, `'`, `"`, `TJ` — and reports nominal text-space coordinates.
//! Graphics-state transforms (`cm`), font metrics, and kerning offsets are
//! ignored: the reconstructor only needs relative ordering and a small
//! line tolerance, which nominal coordinates preserve for text-based
//! PDFs. Scanned or exotic PDFs that yield no fragments at all fall back
//! to whole-document plain-text extraction as a single page.

use anyhow::{Context, Result};
use lopdf::content::Content;
use lopdf::{Document as PdfDocument, Object};

use clausefind_core::layout::PositionedFragment;

/// Extract one fragment list per page, ascending page order.
pub fn extract_fragments(bytes: &[u8]) -> Result<Vec<Vec<PositionedFragment>>> {
    let doc = PdfDocument::load_mem(bytes).context("failed to parse PDF")?;

    let mut pages = Vec::new();
    for (page_number, page_id) in doc.get_pages() {
        let content_bytes = doc
            .get_page_content(page_id)
            .with_context(|| format!("failed to read content stream for page {}", page_number))?;
        let content = Content::decode(&content_bytes)
            .with_context(|| format!("failed to decode content stream for page {}", page_number))?;
        pages.push(walk_text_operations(&content));
    }
    Ok(pages)
}

/// Whole-document plain text, used when the fragment walk finds nothing.
pub fn extract_plain_text(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).context("fallback text extraction failed")
}

/// Minimal text-cursor state for one page's content stream.
struct TextCursor {
    /// Current line origin in text space.
    line_x: f64,
    line_y: f64,
    /// Leading set by `TL` (or implied by `TD`), used by `T*`.
    leading: f64,
}

impl TextCursor {
    fn new() -> Self {
        Self {
            line_x: 0.0,
            line_y: 0.0,
            leading: 0.0,
        }
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        self.line_x += tx;
        self.line_y += ty;
    }

    fn next_line(&mut self) {
        self.line_y -= self.leading;
    }
}

fn walk_text_operations(content: &Content) -> Vec<PositionedFragment> {
    let mut fragments = Vec::new();
    let mut cursor = TextCursor::new();
    let mut seq = 0usize;

    let mut emit = |text: String, cursor: &TextCursor, seq: &mut usize| {
        if text.is_empty() {
            return;
        }
        fragments.push(PositionedFragment::new(
            text,
            cursor.line_x,
            cursor.line_y,
            *seq,
        ));
        *seq += 1;
    };

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => cursor = TextCursor::new(),
            "Tm" => {
                // Only the translation components matter here.
                if operands.len() == 6 {
                    if let (Some(e), Some(f)) =
                        (operand_number(&operands[4]), operand_number(&operands[5]))
                    {
                        cursor.line_x = e;
                        cursor.line_y = f;
                    }
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(operand_number),
                    operands.get(1).and_then(operand_number),
                ) {
                    cursor.translate(tx, ty);
                }
            }
            "TD" => {
                // Like Td, but also sets the leading to -ty.
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(operand_number),
                    operands.get(1).and_then(operand_number),
                ) {
                    cursor.leading = -ty;
                    cursor.translate(tx, ty);
                }
            }
            "TL" => {
                if let Some(l) = operands.first().and_then(operand_number) {
                    cursor.leading = l;
                }
            }
            "T*" => cursor.next_line(),
            "Tj" => {
                if let Some(text) = operands.first().and_then(string_operand) {
                    emit(text, &cursor, &mut seq);
                }
            }
            "'" => {
                cursor.next_line();
                if let Some(text) = operands.first().and_then(string_operand) {
                    emit(text, &cursor, &mut seq);
                }
            }
            "\"" => {
                // Word/char spacing operands precede the string.
                cursor.next_line();
                if let Some(text) = operands.get(2).and_then(string_operand) {
                    emit(text, &cursor, &mut seq);
                }
            }
            "TJ" => {
                // Concatenate the string elements; kerning numbers between
                // them do not move the line origin.
                if let Some(Object::Array(items)) = operands.first() {
                    let mut text = String::new();
                    for item in items {
                        if let Some(piece) = string_operand(item) {
                            text.push_str(&piece);
                        }
                    }
                    emit(text, &cursor, &mut seq);
                }
            }
            _ => {}
        }
    }

    fragments
}

fn operand_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(v) => Some(*v as f64),
        Object::Real(v) => Some(*v as f64),
        _ => None,
    }
}

fn string_operand(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_string_bytes(bytes)),
        _ => None,
    }
}

/// Decode PDF string bytes: UTF-16BE when BOM-prefixed, UTF-8 when valid,
/// otherwise Latin-1 (every byte maps to a char, so nothing is lost).
fn decode_string_bytes(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal single-page PDF with each text run positioned via `BT … Td … Tj ET`.
    /// Body first, then an xref table with computed byte offsets.
    fn pdf_with_text_runs(runs: &[(&str, f64, f64)]) -> Vec<u8> {
        let mut stream = String::new();
        for (text, x, y) in runs {
            stream.push_str(&format!("BT /F1 12 Tf {} {} Td ({}) Tj ET\n", x, y, text));
        }

        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n");
        let o1 = out.len();
        out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
        let o2 = out.len();
        out.extend_from_slice(b"2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n");
        let o3 = out.len();
        out.extend_from_slice(b"3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >> endobj\n");
        let o4 = out.len();
        out.extend_from_slice(
            format!(
                "4 0 obj << /Length {} >> stream\n{}endstream endobj\n",
                stream.len(),
                stream
            )
            .as_bytes(),
        );
        let o5 = out.len();
        out.extend_from_slice(
            b"5 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n",
        );
        let xref_start = out.len();
        out.extend_from_slice(b"xref\n0 6\n");
        out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
        for offset in [o1, o2, o3, o4, o5] {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        out.extend_from_slice(b"trailer << /Size 6 /Root 1 0 R >>\nstartxref\n");
        out.extend_from_slice(format!("{}\n", xref_start).as_bytes());
        out.extend_from_slice(b"%%EOF\n");
        out
    }

    #[test]
    fn test_fragments_carry_positions_and_sequence() {
        let bytes = pdf_with_text_runs(&[
            ("first", 100.0, 700.0),
            ("second", 200.0, 700.0),
            ("lower", 100.0, 650.0),
        ]);
        let pages = extract_fragments(&bytes).unwrap();
        assert_eq!(pages.len(), 1);
        let frags = &pages[0];
        assert_eq!(frags.len(), 3);
        assert_eq!(frags[0].text, "first");
        assert_eq!(frags[0].x, 100.0);
        assert_eq!(frags[0].y, 700.0);
        assert_eq!(frags[1].seq, 1);
        assert_eq!(frags[2].y, 650.0);
    }

    #[test]
    fn test_invalid_pdf_is_an_error() {
        assert!(extract_fragments(b"not a pdf at all").is_err());
    }

    #[test]
    fn test_decode_string_bytes_variants() {
        assert_eq!(decode_string_bytes(b"plain ascii"), "plain ascii");
        // UTF-16BE with BOM: "Hi".
        assert_eq!(decode_string_bytes(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
        // Invalid UTF-8 falls back to Latin-1.
        assert_eq!(decode_string_bytes(&[0xE9]), "é");
    }

    #[test]
    fn test_walk_handles_relative_moves_and_tj_arrays() {
        use lopdf::content::Operation;

        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), 72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal("heading")]),
                Operation::new("TD", vec![0.into(), Object::Real(-14.0)]),
                Operation::new(
                    "TJ",
                    vec![Object::Array(vec![
                        Object::string_literal("kerned"),
                        Object::Integer(-120),
                        Object::string_literal(" text"),
                    ])],
                ),
                Operation::new("T*", vec![]),
                Operation::new("Tj", vec![Object::string_literal("third line")]),
                Operation::new("ET", vec![]),
            ],
        };

        let frags = walk_text_operations(&content);
        assert_eq!(frags.len(), 3);
        assert_eq!(frags[0].text, "heading");
        assert_eq!((frags[0].x, frags[0].y), (72.0, 720.0));
        assert_eq!(frags[1].text, "kerned text");
        assert_eq!((frags[1].x, frags[1].y), (72.0, 706.0));
        // T* reuses the leading implied by TD.
        assert_eq!(frags[2].text, "third line");
        assert_eq!((frags[2].x, frags[2].y), (72.0, 692.0));
        assert_eq!(frags[2].seq, 2);
    }
}
