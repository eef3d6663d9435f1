//! Page-level types.

use super::Table;
use serde::{Deserialize, Serialize};

/// A single page in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Raw extracted text, possibly empty
    pub text: String,

    /// Tables found on the page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<Table>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            text: String::new(),
            tables: Vec::new(),
        }
    }

    /// Create a page with text content.
    pub fn with_text(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            tables: Vec::new(),
        }
    }

    /// Add a table to the page.
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Whether the extracted text is blank.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether the page has neither text nor tables.
    pub fn is_empty(&self) -> bool {
        self.is_blank() && self.tables.is_empty()
    }

    /// Zero-based position of this page, as used by batch ranges.
    pub fn index(&self) -> u32 {
        self.number.saturating_sub(1)
    }
}
