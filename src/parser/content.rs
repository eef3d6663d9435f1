//! Positioned text extraction from page content streams.
//!
//! Table detection needs to know where each piece of text sits on the page,
//! which plain text extraction throws away. This walks the content stream's
//! text operators and records every shown string with its position.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// Advance of a TJ adjustment (thousandths of text space) read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A run of text shown by one operator, with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new span, estimating its width from the character count.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        let text = text.into();
        let width = text.chars().count() as f32 * font_size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Extract positioned spans from one page.
pub(crate) fn page_spans(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<TextSpan>> {
    let fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;
    let content = page_content(doc, page_id)?;
    spans_from_content(doc, &content, &fonts)
}

/// Raw (decompressed) content stream of a page, concatenating arrays.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let contents = page_dict
        .get(b"Contents")
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    match contents {
        Object::Reference(r) => match doc.get_object(*r) {
            Ok(Object::Stream(s)) => s
                .decompressed_content()
                .map_err(|e| Error::PdfParse(e.to_string())),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        },
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                        if let Ok(data) = s.decompressed_content() {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
            }
            Ok(content)
        }
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

fn spans_from_content(
    doc: &LopdfDocument,
    content: &[u8],
    fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
) -> Result<Vec<TextSpan>> {
    let content =
        lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

    let mut spans = Vec::new();
    let mut font_name: Vec<u8> = Vec::new();
    let mut font_size: f32 = 12.0;
    let mut leading: f32 = 12.0;
    let mut matrix = TextMatrix::default();
    let mut in_text = false;

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                matrix = TextMatrix::default();
            }
            "ET" => in_text = false,
            "Tf" if op.operands.len() >= 2 => {
                if let Object::Name(name) = &op.operands[0] {
                    font_name = name.clone();
                }
                font_size = number(&op.operands[1]).unwrap_or(12.0);
            }
            "TL" => {
                if let Some(tl) = op.operands.first().and_then(number) {
                    leading = tl;
                }
            }
            "Td" | "TD" if op.operands.len() >= 2 => {
                let tx = number(&op.operands[0]).unwrap_or(0.0);
                let ty = number(&op.operands[1]).unwrap_or(0.0);
                if op.operator == "TD" {
                    leading = -ty;
                }
                matrix.translate(tx, ty);
            }
            "Tm" if op.operands.len() >= 6 => {
                let v: Vec<f32> = op.operands[..6]
                    .iter()
                    .map(|o| number(o).unwrap_or(0.0))
                    .collect();
                matrix.set(v[0], v[1], v[2], v[3], v[4], v[5]);
            }
            "T*" => matrix.next_line(leading),
            "Tj" | "TJ" | "'" | "\"" if in_text => {
                if op.operator == "'" || op.operator == "\"" {
                    matrix.next_line(leading);
                }
                let encoding = fonts
                    .get(&font_name)
                    .and_then(|f| f.get_font_encoding(doc).ok());
                let decode = |bytes: &[u8]| match encoding {
                    Some(ref enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
                    None => decode_text_simple(bytes),
                };

                let text = match (op.operator.as_str(), op.operands.as_slice()) {
                    ("TJ", [Object::Array(items), ..]) => {
                        let mut combined = String::new();
                        for item in items {
                            match item {
                                Object::String(bytes, _) => combined.push_str(&decode(bytes)),
                                other => {
                                    let gap = -number(other).unwrap_or(0.0);
                                    if gap > TJ_SPACE_THRESHOLD && !combined.ends_with(' ') {
                                        combined.push(' ');
                                    }
                                }
                            }
                        }
                        combined
                    }
                    ("\"", [_, _, Object::String(bytes, _), ..]) => decode(bytes),
                    (_, [Object::String(bytes, _), ..]) => decode(bytes),
                    _ => String::new(),
                };

                if !text.trim().is_empty() {
                    let (x, y) = matrix.position();
                    spans.push(TextSpan::new(text, x, y, font_size * matrix.scale()));
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Text matrix tracking for `Td`/`Tm`/`T*`.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self { a, b, c, d, e, f };
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode a string without font encoding: UTF-16BE with BOM, UTF-8, then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Notes"), "Notes");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        let bytes = [0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_text_matrix_moves() {
        let mut m = TextMatrix::default();
        m.set(2.0, 0.0, 0.0, 2.0, 100.0, 700.0);
        m.translate(10.0, -5.0);
        assert_eq!(m.position(), (120.0, 690.0));
        m.next_line(12.0);
        assert_eq!(m.position(), (120.0, 666.0));
        assert_eq!(m.scale(), 2.0);
    }

    #[test]
    fn test_span_width_estimate() {
        let span = TextSpan::new("abcd", 10.0, 500.0, 10.0);
        assert_eq!(span.width, 20.0);
        assert_eq!(span.right(), 30.0);
    }
}
