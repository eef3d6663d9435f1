//! # prospectus
//!
//! Text extraction and packaging for PDF offering documents.
//!
//! Offering documents for debt issuances run to hundreds of pages of prose
//! and tables. This library pulls the text and tables out of each page,
//! cleans them up, and packages the result for downstream review: a single
//! text file, page-batched parts in a zip bundle, or one JSON file per
//! section listed in the document's index.
//!
//! ## Quick Start
//!
//! ```no_run
//! use prospectus::{parse_file, render};
//!
//! fn main() -> prospectus::Result<()> {
//!     let doc = parse_file("offering.pdf")?;
//!
//!     let text = render::to_text(&doc, &render::RenderOptions::default())?;
//!     println!("{}", text);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Page text and tables**: tables are detected from text positions and
//!   rendered as markdown below the page text
//! - **Section splitting**: page ranges derived from the index page
//! - **Page batching**: fixed-size parts for very long documents, resumable
//!   across runs
//! - **Bundles**: zip archives with a rendered cover image

pub mod batch;
pub mod bundle;
pub mod detect;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod render;
pub mod sections;

// Re-export commonly used types
pub use batch::{combine_batches, document_batches, page_batches, BatchSession, DEFAULT_BATCH_SIZE};
pub use detect::{is_pdf_bytes, sniff_bytes, sniff_path, PdfHeader};
pub use error::{Error, Result};
pub use export::{Artifact, ExportFormat, ExportOptions, ExportResult, Exporter};
pub use model::{Document, IndexEntry, Metadata, Page, Section, Table, TableRow};
pub use parser::{ErrorMode, ParseOptions, PdfBackend, PdfParser};
pub use render::{JsonFormat, PageMarker, PageSelection, RenderOptions};
pub use sections::{split_sections, SplitterOptions};

use std::io::Read;
use std::num::NonZeroU32;
use std::path::Path;

use crate::parser::DEFAULT_DPI;

/// Parse a PDF file and return a structured document.
///
/// # Example
///
/// ```no_run
/// use prospectus::parse_file;
///
/// let doc = parse_file("offering.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let parser = PdfParser::open(path)?;
    parser.parse()
}

/// Parse a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use prospectus::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient().text_only();
/// let doc = parse_file_with_options("offering.pdf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let parser = PdfParser::open_with_options(path, options)?;
    parser.parse()
}

/// Parse a PDF from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let parser = PdfParser::from_bytes(data)?;
    parser.parse()
}

/// Parse a PDF from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    let parser = PdfParser::from_bytes_with_options(data, options)?;
    parser.parse()
}

/// Parse a PDF from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    let parser = PdfParser::from_reader(reader)?;
    parser.parse()
}

/// Parse a PDF from a reader with custom options.
pub fn parse_reader_with_options<R: Read>(reader: R, options: ParseOptions) -> Result<Document> {
    let parser = PdfParser::from_reader_with_options(reader, options)?;
    parser.parse()
}

/// Extract page-headed text (`# Page N` blocks with tables as markdown).
///
/// # Example
///
/// ```no_run
/// let text = prospectus::extract_text("offering.pdf").unwrap();
/// std::fs::write("offering.txt", text).unwrap();
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_text(&doc, &RenderOptions::default())
}

/// Convert a PDF to JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for parsing and packaging offering documents.
///
/// # Example
///
/// ```no_run
/// use prospectus::Prospectus;
///
/// let result = Prospectus::new()
///     .lenient()
///     .with_index_page(3)
///     .parse("offering.pdf")?;
///
/// for section in result.sections() {
///     println!("{} ({}-{})", section.title, section.start_page, section.end_page);
/// }
/// # Ok::<(), prospectus::Error>(())
/// ```
pub struct Prospectus {
    parse_options: ParseOptions,
    render_options: RenderOptions,
    splitter_options: SplitterOptions,
    batch_size: NonZeroU32,
    dpi: u32,
}

impl Prospectus {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
            splitter_options: SplitterOptions::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            dpi: DEFAULT_DPI,
        }
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Extract text only (no table detection).
    pub fn text_only(mut self) -> Self {
        self.parse_options = self.parse_options.text_only();
        self
    }

    /// Set the number of pages per batch.
    pub fn with_batch_size(mut self, size: NonZeroU32) -> Self {
        self.batch_size = size;
        self
    }

    /// Read the index from a fixed page.
    pub fn with_index_page(mut self, page: u32) -> Self {
        self.splitter_options = self.splitter_options.with_index_page(page);
        self
    }

    /// Set the keyword index lines must contain.
    pub fn with_section_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.splitter_options = self.splitter_options.with_keyword(keyword);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.parse_options = self.parse_options.with_pages(pages.clone());
        self.render_options = self.render_options.with_pages(pages);
        self
    }

    /// Set the page marker style for text output.
    pub fn with_page_marker(mut self, marker: PageMarker) -> Self {
        self.render_options = self.render_options.with_page_marker(marker);
        self
    }

    /// Set the cover image resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Export options matching this builder.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::new()
            .with_parse_options(self.parse_options.clone())
            .with_render_options(self.render_options.clone())
            .with_splitter(self.splitter_options.clone())
            .with_batch_size(self.batch_size)
            .with_dpi(self.dpi)
    }

    /// Export a PDF file in one step.
    pub fn export<P: AsRef<Path>>(&self, path: P, format: ExportFormat) -> Result<ExportResult> {
        Exporter::new(self.export_options()).export_file(path, format)
    }

    /// Parse a PDF file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<ProspectusResult> {
        let parser = PdfParser::open_with_options(path, self.parse_options.clone())?;
        let document = parser.parse()?;
        Ok(self.into_result(document))
    }

    /// Parse a PDF from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<ProspectusResult> {
        let parser = PdfParser::from_bytes_with_options(data, self.parse_options.clone())?;
        let document = parser.parse()?;
        Ok(self.into_result(document))
    }

    /// Wrap an already-parsed document.
    pub fn into_result(self, document: Document) -> ProspectusResult {
        ProspectusResult {
            document,
            render_options: self.render_options,
            splitter_options: self.splitter_options,
            batch_size: self.batch_size,
        }
    }
}

impl Default for Prospectus {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing an offering document.
pub struct ProspectusResult {
    /// The parsed document
    pub document: Document,
    render_options: RenderOptions,
    splitter_options: SplitterOptions,
    batch_size: NonZeroU32,
}

impl ProspectusResult {
    /// Convert to page-headed text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Sections from the document's index page.
    pub fn sections(&self) -> Vec<Section> {
        split_sections(&self.document, &self.splitter_options)
    }

    /// Text output split into page batches, in order.
    ///
    /// Batches holding no parsed pages are left out. Joining the batches gives
    /// the same text as [`to_text`](Self::to_text).
    pub fn batches(&self) -> Vec<String> {
        batch::document_batches(&self.document, self.batch_size)
            .iter()
            .map(|(_, range)| {
                render::render_pages(batch::pages_in(&self.document, range), &self.render_options)
            })
            .collect()
    }

    /// Get plain text without cleanup.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
