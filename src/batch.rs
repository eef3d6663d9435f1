//! Page batching for large documents.
//!
//! Long offering documents are exported in fixed-size page batches so a
//! single run never holds more than one batch of rendered output. Ranges
//! here are zero-based and half-open (`0..200` covers pages 1 to 200).
//!
//! Resuming across runs goes through [`BatchSession`], a small record the
//! caller stores between invocations.

use std::num::NonZeroU32;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::model::{Document, Page};

/// Default number of pages per batch.
pub const DEFAULT_BATCH_SIZE: NonZeroU32 = match NonZeroU32::new(200) {
    Some(n) => n,
    None => unreachable!(),
};

/// Partition `0..total` into consecutive ranges of at most `size` pages.
pub fn page_batches(total: u32, size: NonZeroU32) -> Vec<Range<u32>> {
    let size = size.get();
    (0..total)
        .step_by(size as usize)
        .map(|start| start..start.saturating_add(size).min(total))
        .collect()
}

/// Pages of `doc` whose zero-based index falls in `range`.
pub fn pages_in<'a>(doc: &'a Document, range: &'a Range<u32>) -> impl Iterator<Item = &'a Page> {
    doc.pages.iter().filter(move |p| range.contains(&p.index()))
}

/// Batches of `doc` that hold at least one parsed page, numbered from 1 by
/// their position over the whole document.
///
/// A document parsed with a page selection keeps its source page count, so
/// batches outside the selection are skipped rather than emitted empty.
pub fn document_batches(doc: &Document, size: NonZeroU32) -> Vec<(usize, Range<u32>)> {
    page_batches(doc.page_count(), size)
        .into_iter()
        .enumerate()
        .filter(|(_, range)| doc.pages.iter().any(|p| range.contains(&p.index())))
        .map(|(i, range)| (i + 1, range))
        .collect()
}

/// Join batch outputs back into single-pass output.
pub fn combine_batches<I, S>(outputs: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    outputs.into_iter().fold(String::new(), |mut acc, s| {
        acc.push_str(s.as_ref());
        acc
    })
}

/// Progress through a document processed one batch per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSession {
    /// Identifies the document this progress belongs to
    pub document_id: String,

    /// Zero-based index of the first page not yet processed
    pub next_start_page: u32,
}

impl BatchSession {
    /// Start a session at the first page.
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            next_start_page: 0,
        }
    }

    /// Whether this session belongs to `document_id`.
    pub fn is_for(&self, document_id: &str) -> bool {
        self.document_id == document_id
    }

    /// The next range to process, or `None` once `total` pages are done.
    pub fn next_batch(&self, total: u32, size: NonZeroU32) -> Option<Range<u32>> {
        if self.is_complete(total) {
            return None;
        }
        let start = self.next_start_page;
        Some(start..start.saturating_add(size.get()).min(total))
    }

    /// Record `range` as processed.
    pub fn advance(&mut self, range: &Range<u32>) {
        self.next_start_page = self.next_start_page.max(range.end);
    }

    /// Whether every page of a `total`-page document has been processed.
    pub fn is_complete(&self, total: u32) -> bool {
        self.next_start_page >= total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_page_batches_450_by_200() {
        assert_eq!(
            page_batches(450, DEFAULT_BATCH_SIZE),
            vec![0..200, 200..400, 400..450]
        );
    }

    #[test]
    fn test_page_batches_exact_multiple() {
        assert_eq!(page_batches(400, size(200)), vec![0..200, 200..400]);
    }

    #[test]
    fn test_page_batches_edges() {
        assert!(page_batches(0, size(200)).is_empty());
        assert_eq!(page_batches(1, size(200)), vec![0..1]);
        assert_eq!(page_batches(3, size(1)), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_pages_in_uses_zero_based_range() {
        let mut doc = Document::new();
        for n in 1..=5 {
            doc.add_page(Page::new(n));
        }
        let numbers: Vec<u32> = pages_in(&doc, &(2..4)).map(|p| p.number).collect();
        assert_eq!(numbers, vec![3, 4]);
    }

    #[test]
    fn test_document_batches_skip_unselected_ranges() {
        let mut doc = Document::new();
        doc.metadata.page_count = 10;
        for n in 5..=6 {
            doc.add_page(Page::new(n));
        }
        assert_eq!(document_batches(&doc, size(3)), vec![(2, 3..6)]);
    }

    #[test]
    fn test_document_batches_full_document() {
        let mut doc = Document::new();
        for n in 1..=5 {
            doc.add_page(Page::new(n));
        }
        assert_eq!(
            document_batches(&doc, size(2)),
            vec![(1, 0..2), (2, 2..4), (3, 4..5)]
        );
    }

    #[test]
    fn test_combine_batches() {
        assert_eq!(combine_batches(["a", "b", "", "c"]), "abc");
        assert_eq!(combine_batches(Vec::<String>::new()), "");
    }

    #[test]
    fn test_session_walks_document() {
        let mut session = BatchSession::new("offering.pdf");
        let mut seen = Vec::new();
        while let Some(range) = session.next_batch(450, DEFAULT_BATCH_SIZE) {
            session.advance(&range);
            seen.push(range);
        }
        assert_eq!(seen, page_batches(450, DEFAULT_BATCH_SIZE));
        assert!(session.is_complete(450));
        assert_eq!(session.next_start_page, 450);
    }

    #[test]
    fn test_session_resumes_from_offset() {
        let session = BatchSession {
            document_id: "doc".into(),
            next_start_page: 150,
        };
        assert_eq!(session.next_batch(300, size(100)), Some(150..250));
        assert!(session.is_for("doc"));
        assert!(!session.is_for("other"));
    }

    #[test]
    fn test_session_serde_shape() {
        let session = BatchSession::new("doc-1");
        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(json, r#"{"document_id":"doc-1","next_start_page":0}"#);
    }
}
