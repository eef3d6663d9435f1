//! Document-level types.

use super::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An extracted PDF document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, author, page count, etc.)
    pub metadata: Metadata,

    /// Extracted pages, in page order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total page count of the source document.
    ///
    /// This can exceed `pages.len()` when only a page range was extracted.
    pub fn page_count(&self) -> u32 {
        self.metadata.page_count
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == number)
    }

    /// Add a page, growing the recorded page count if needed.
    pub fn add_page(&mut self, page: Page) {
        self.metadata.page_count = self.metadata.page_count.max(page.number);
        self.pages.push(page);
    }

    /// Pages whose number lies in `first..=last`.
    pub fn pages_between(&self, first: u32, last: u32) -> impl Iterator<Item = &Page> {
        self.pages
            .iter()
            .filter(move |p| p.number >= first && p.number <= last)
    }

    /// The first page, which offering documents use as their cover.
    pub fn cover(&self) -> Option<&Page> {
        self.get_page(1)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Whether any extracted page carries non-blank text.
    pub fn has_text(&self) -> bool {
        self.pages.iter().any(|p| !p.is_blank())
    }

    /// Raw text of all pages joined by blank lines.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Number of extracted tables across all pages.
    pub fn table_count(&self) -> usize {
        self.pages.iter().map(|p| p.tables.len()).sum()
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Total number of pages in the source document
    pub page_count: u32,

    /// Whether the document is encrypted
    pub encrypted: bool,
}

impl Metadata {
    /// Create new metadata with PDF version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            pdf_version: version.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert!(doc.cover().is_none());
    }

    #[test]
    fn test_add_page_tracks_count() {
        let mut doc = Document::new();
        doc.add_page(Page::with_text(1, "Cover"));
        doc.add_page(Page::with_text(4, "Later"));
        assert_eq!(doc.page_count(), 4);
        assert_eq!(doc.get_page(4).map(|p| p.text.as_str()), Some("Later"));
        assert!(doc.get_page(2).is_none());
    }

    #[test]
    fn test_pages_between_is_inclusive() {
        let mut doc = Document::new();
        for n in 1..=5 {
            doc.add_page(Page::new(n));
        }
        let numbers: Vec<u32> = doc.pages_between(2, 4).map(|p| p.number).collect();
        assert_eq!(numbers, vec![2, 3, 4]);
        assert_eq!(doc.pages_between(4, 2).count(), 0);
    }

    #[test]
    fn test_has_text() {
        let mut doc = Document::new();
        doc.add_page(Page::with_text(1, "   "));
        assert!(!doc.has_text());
        doc.add_page(Page::with_text(2, "Terms"));
        assert!(doc.has_text());
    }
}
