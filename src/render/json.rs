//! JSON rendering for documents, page records and sections.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Document, Page, Section};

use super::{render_page_body, RenderOptions};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// One page as written to JSON outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Cleaned page text followed by its tables as markdown
    pub content: String,
}

impl PageRecord {
    /// Build the record for a page.
    pub fn from_page(page: &Page, options: &RenderOptions) -> Self {
        Self {
            page_number: page.number,
            content: render_page_body(page, options),
        }
    }
}

/// A section as written to its own JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Section title
    pub title: String,
    /// First page (inclusive)
    pub start_page: u32,
    /// Last page (inclusive)
    pub end_page: u32,
    /// Page records in page order
    pub pages: Vec<PageRecord>,
}

impl SectionRecord {
    /// Build the record for a section.
    pub fn from_section(section: &Section, options: &RenderOptions) -> Self {
        Self {
            title: section.title.clone(),
            start_page: section.start_page,
            end_page: section.end_page,
            pages: section
                .pages
                .iter()
                .map(|p| PageRecord::from_page(p, options))
                .collect(),
        }
    }
}

/// Convert a whole document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    serialize(doc, format)
}

/// Serialize page records for a sequence of pages.
pub fn pages_to_json<'a>(
    pages: impl IntoIterator<Item = &'a Page>,
    options: &RenderOptions,
    format: JsonFormat,
) -> Result<String> {
    let records: Vec<PageRecord> = pages
        .into_iter()
        .filter(|p| options.page_selection.includes(p.number))
        .map(|p| PageRecord::from_page(p, options))
        .collect();
    serialize(&records, format)
}

/// Serialize a single page as one record (used for the cover page).
pub fn page_to_json(page: &Page, options: &RenderOptions, format: JsonFormat) -> Result<String> {
    serialize(&PageRecord::from_page(page, options), format)
}

/// Serialize one section.
pub fn section_to_json(
    section: &Section,
    options: &RenderOptions,
    format: JsonFormat,
) -> Result<String> {
    serialize(&SectionRecord::from_section(section, options), format)
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
