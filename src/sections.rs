//! Index-driven section splitting.
//!
//! Offering documents carry an index page listing section titles with their
//! starting page, one per line (`Section 2 Risk Factors ....... 14`). The
//! splitter reads those lines and turns them into page ranges: each entry
//! starts at its own page and ends one page before the next entry, the last
//! entry running to the end of the document.
//!
//! Entries are used in the order they appear. Page numbers are not checked
//! for ordering or bounds: an entry listed after a later-starting one gets an
//! empty range, and an entry past the last page gets no pages.

use regex::Regex;

use crate::model::{Document, IndexEntry, Page, Section};

/// Keyword an index line must contain to count as a section boundary.
pub const DEFAULT_SECTION_KEYWORD: &str = "section";

/// How many leading pages are searched for the index page.
pub const DEFAULT_INDEX_SCAN_PAGES: u32 = 10;

/// `<text><digits>` anchored at line end.
const INDEX_LINE_PATTERN: &str = r"^(.*?)(\d+)$";

/// Options for section splitting.
#[derive(Debug, Clone)]
pub struct SplitterOptions {
    /// Case-insensitive keyword a title must contain
    pub keyword: String,

    /// Page holding the index; searched for when `None`
    pub index_page: Option<u32>,

    /// Number of leading pages searched for the index
    pub scan_pages: u32,
}

impl SplitterOptions {
    /// Create new splitter options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the section keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Use a fixed index page instead of searching for one.
    pub fn with_index_page(mut self, page: u32) -> Self {
        self.index_page = Some(page);
        self
    }

    /// Set how many leading pages are searched for the index.
    pub fn with_scan_pages(mut self, pages: u32) -> Self {
        self.scan_pages = pages;
        self
    }
}

impl Default for SplitterOptions {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_SECTION_KEYWORD.to_string(),
            index_page: None,
            scan_pages: DEFAULT_INDEX_SCAN_PAGES,
        }
    }
}

/// Splits documents into sections using their index page.
pub struct SectionSplitter {
    options: SplitterOptions,
    keyword: String,
    line_pattern: Regex,
}

impl SectionSplitter {
    /// Create a new splitter.
    pub fn new(options: SplitterOptions) -> Self {
        Self {
            keyword: options.keyword.to_lowercase(),
            options,
            line_pattern: Regex::new(INDEX_LINE_PATTERN).unwrap(),
        }
    }

    /// Parse index page text into accepted entries, in line order.
    pub fn parse_index(&self, text: &str) -> Vec<IndexEntry> {
        text.lines()
            .filter_map(|line| self.parse_line(line))
            .collect()
    }

    fn parse_line(&self, line: &str) -> Option<IndexEntry> {
        let caps = self.line_pattern.captures(line.trim_end())?;
        let (lead, digits) = (&caps[1], &caps[2]);

        if !lead.to_lowercase().contains(&self.keyword) {
            return None;
        }

        let page_number = match digits.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                log::debug!("Index line {:?}: page number out of range", line);
                return None;
            }
        };

        Some(IndexEntry::new(clean_title(lead), page_number))
    }

    /// Find the index page: the configured one, or the leading page with the
    /// most accepted entries (the first such page on ties).
    pub fn locate_index<'a>(&self, doc: &'a Document) -> Option<&'a Page> {
        if let Some(number) = self.options.index_page {
            return doc.get_page(number);
        }

        let mut best: Option<(&Page, usize)> = None;
        for page in doc
            .pages
            .iter()
            .filter(|p| p.number <= self.options.scan_pages)
        {
            let count = self.parse_index(&page.text).len();
            if count > 0 && best.map_or(true, |(_, n)| count > n) {
                best = Some((page, count));
            }
        }

        if let Some((page, count)) = best {
            log::debug!("Index page located at page {} ({} entries)", page.number, count);
        }
        best.map(|(page, _)| page)
    }

    /// Split a document into sections. Returns an empty list when no index
    /// page or no accepted entries are found.
    pub fn split(&self, doc: &Document) -> Vec<Section> {
        let Some(index) = self.locate_index(doc) else {
            log::info!("No index page found; no sections available");
            return Vec::new();
        };

        let entries = self.parse_index(&index.text);
        if entries.is_empty() {
            log::info!("Index page {} has no section entries", index.number);
        }
        sections_from_entries(&entries, &doc.pages, doc.page_count())
    }
}

impl Default for SectionSplitter {
    fn default() -> Self {
        Self::new(SplitterOptions::default())
    }
}

/// Parse index text with the default keyword.
pub fn parse_index(text: &str) -> Vec<IndexEntry> {
    SectionSplitter::default().parse_index(text)
}

/// Split a document into sections.
pub fn split_sections(doc: &Document, options: &SplitterOptions) -> Vec<Section> {
    SectionSplitter::new(options.clone()).split(doc)
}

/// Bind entries to page ranges over `pages`, with `total_pages` ending the last
/// range.
pub fn sections_from_entries(
    entries: &[IndexEntry],
    pages: &[Page],
    total_pages: u32,
) -> Vec<Section> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let start_page = entry.page_number;
            let end_page = match entries.get(i + 1) {
                Some(next) => next.page_number.saturating_sub(1),
                None => total_pages,
            };

            Section {
                title: entry.title.clone(),
                start_page,
                end_page,
                pages: pages
                    .iter()
                    .filter(|p| p.number >= start_page && p.number <= end_page)
                    .cloned()
                    .collect(),
            }
        })
        .collect()
}

/// Keep letters, digits, spaces and colons, then trim.
fn clean_title(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == ':')
        .collect::<String>()
        .trim()
        .to_string()
}
