//! Index entries and the sections derived from them.

use super::Page;
use serde::{Deserialize, Serialize};

/// One accepted line of the index page: a title and its starting page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Cleaned title text
    pub title: String,

    /// Starting page (1-indexed)
    pub page_number: u32,
}

impl IndexEntry {
    /// Create a new index entry.
    pub fn new(title: impl Into<String>, page_number: u32) -> Self {
        Self {
            title: title.into(),
            page_number,
        }
    }
}

/// A logical section bound to an inclusive page range.
///
/// `end_page < start_page` is possible when the index lists entries out of
/// order; such a section simply has no pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section title
    pub title: String,

    /// First page (inclusive)
    pub start_page: u32,

    /// Last page (inclusive)
    pub end_page: u32,

    /// Pages whose number lies in `start_page..=end_page`
    pub pages: Vec<Page>,
}

impl Section {
    /// Whether `page_number` falls inside this section's range.
    pub fn contains(&self, page_number: u32) -> bool {
        (self.start_page..=self.end_page).contains(&page_number)
    }

    /// Whether the section has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of pages in the section.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_contains() {
        let section = Section {
            title: "Section One".into(),
            start_page: 3,
            end_page: 6,
            pages: Vec::new(),
        };
        assert!(!section.contains(2));
        assert!(section.contains(3));
        assert!(section.contains(6));
        assert!(!section.contains(7));
    }

    #[test]
    fn test_inverted_range_contains_nothing() {
        let section = Section {
            title: "Backwards".into(),
            start_page: 9,
            end_page: 4,
            pages: Vec::new(),
        };
        assert!(!section.contains(4));
        assert!(!section.contains(9));
        assert!(section.is_empty());
    }
}
