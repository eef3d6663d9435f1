//! PDF backend abstraction layer.
//!
//! The parser only needs four things from a PDF library: how many pages
//! there are, the text of a page, the tables on a page, and the document
//! metadata. [`PdfBackend`] captures exactly that so the rest of the crate
//! never touches lopdf types, and tests can substitute an in-memory document.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, ObjectId};

use crate::error::{Error, Result};
use crate::model::{Metadata, Table};

use super::content::{decode_text_simple, page_spans};
use super::tables::TableDetector;

/// Abstract interface for PDF document access.
///
/// Page numbers are 1-indexed throughout.
pub trait PdfBackend {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Raw extracted text of a page.
    fn page_text(&self, page: u32) -> Result<String>;

    /// Tables found on a page, top of page first. Each table is a list of
    /// rows of optional cell strings.
    fn page_tables(&self, page: u32) -> Result<Vec<Table>>;

    /// Document-level metadata. `page_count` is filled in by the parser.
    fn metadata(&self) -> Metadata;
}

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
    detector: TableDetector,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    /// Load from a reader.
    pub fn load_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    fn from_document(doc: LopdfDocument) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; extracted text may be incomplete");
        }
        Self {
            pages: doc.get_pages(),
            doc,
            detector: TableDetector::new(),
        }
    }

    /// Replace the table detector.
    pub fn with_detector(mut self, detector: TableDetector) -> Self {
        self.detector = detector;
        self
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }
}

impl PdfBackend for LopdfBackend {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String> {
        self.page_id(page)?;
        self.doc
            .extract_text(&[page])
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))
    }

    fn page_tables(&self, page: u32) -> Result<Vec<Table>> {
        let id = self.page_id(page)?;
        let spans = page_spans(&self.doc, id)
            .map_err(|e| Error::TableExtract(format!("Page {}: {}", page, e)))?;
        Ok(self.detector.detect(&spans))
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.doc.version.to_string());

        if let Ok(info) = self.doc.trailer.get(b"Info") {
            if let Ok(info_ref) = info.as_reference() {
                if let Ok(info_dict) = self.doc.get_dictionary(info_ref) {
                    metadata.title = get_string_from_dict(info_dict, b"Title");
                    metadata.author = get_string_from_dict(info_dict, b"Author");
                    metadata.subject = get_string_from_dict(info_dict, b"Subject");
                    metadata.creator = get_string_from_dict(info_dict, b"Creator");
                    metadata.producer = get_string_from_dict(info_dict, b"Producer");
                    metadata.created = get_string_from_dict(info_dict, b"CreationDate")
                        .and_then(|s| parse_pdf_date(&s));
                    metadata.modified = get_string_from_dict(info_dict, b"ModDate")
                        .and_then(|s| parse_pdf_date(&s));
                }
            }
        }

        metadata.encrypted = self.doc.is_encrypted();
        metadata
    }
}

fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        lopdf::Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        lopdf::Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:")?;

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
