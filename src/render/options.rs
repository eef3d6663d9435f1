//! Rendering options and configuration.

use super::{CleanupOptions, WhitespaceMode};
use crate::error::{Error, Result};
use std::ops::RangeInclusive;

/// Options for rendering document content.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// How each page is labelled in text output
    pub page_marker: PageMarker,

    /// Cleanup applied to page text
    pub cleanup: CleanupOptions,

    /// Render extracted tables after the page text
    pub include_tables: bool,

    /// Put a caption line naming the page above each table
    pub table_captions: bool,

    /// Page selection
    pub page_selection: PageSelection,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page marker style.
    ///
    /// The footer style collapses whitespace to newlines, as the page-numbered
    /// export always has.
    pub fn with_page_marker(mut self, marker: PageMarker) -> Self {
        self.page_marker = marker;
        self.cleanup.whitespace = match marker {
            PageMarker::Heading => WhitespaceMode::Space,
            PageMarker::Footer => WhitespaceMode::Newline,
        };
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Enable or disable table rendering.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Enable or disable table captions.
    pub fn with_table_captions(mut self, captions: bool) -> Self {
        self.table_captions = captions;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_marker: PageMarker::Heading,
            cleanup: CleanupOptions::default(),
            include_tables: true,
            table_captions: true,
            page_selection: PageSelection::All,
        }
    }
}

/// How pages are labelled in text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageMarker {
    /// `# Page N` above the page content
    #[default]
    Heading,
    /// `Page No N` below the page content; blank pages are skipped
    Footer,
}

/// Page selection for parsing and rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Build a selection from optional start/end pages.
    ///
    /// Both bounds must be positive and `end` must be greater than `start`
    /// when both are given. A missing end runs to `u32::MAX`.
    pub fn from_bounds(start: Option<u32>, end: Option<u32>) -> Result<Self> {
        match (start, end) {
            (None, None) => Ok(PageSelection::All),
            (Some(0), _) | (_, Some(0)) => Err(Error::InvalidPageRange(
                "page numbers start at 1".to_string(),
            )),
            (Some(s), Some(e)) if e <= s => Err(Error::InvalidPageRange(format!(
                "end page {} must be greater than start page {}",
                e, s
            ))),
            (s, e) => Ok(PageSelection::Range(s.unwrap_or(1)..=e.unwrap_or(u32::MAX))),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                return Self::from_bounds(
                    Some(parse_page_number(start)?),
                    Some(parse_page_number(end)?),
                );
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start = parse_page_number(start)?;
                let end = parse_page_number(end)?;
                if end < start {
                    return Err(Error::InvalidPageRange(part.to_string()));
                }
                pages.extend(start..=end);
            } else {
                pages.push(parse_page_number(part)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page_number(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(format!(
            "invalid page number: {:?}",
            s.trim()
        ))),
        Ok(n) => Ok(n),
    }
}
