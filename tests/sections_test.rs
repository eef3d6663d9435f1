//! Integration tests for index-driven section splitting.

use prospectus::error::{Error, Result};
use prospectus::model::{Metadata, Table};
use prospectus::render::{section_to_json, JsonFormat, RenderOptions};
use prospectus::{
    split_sections, IndexEntry, ParseOptions, PdfBackend, PdfParser, Prospectus, SplitterOptions,
};

/// In-memory document: one string per page.
struct MemoryBackend {
    pages: Vec<String>,
}

impl MemoryBackend {
    fn offering(total: u32, index_page: u32, index: &str) -> Self {
        let pages = (1..=total)
            .map(|n| {
                if n == index_page {
                    index.to_string()
                } else {
                    format!("Content of page {}", n)
                }
            })
            .collect();
        Self { pages }
    }
}

impl PdfBackend for MemoryBackend {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String> {
        self.pages
            .get(page as usize - 1)
            .cloned()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }

    fn page_tables(&self, _page: u32) -> Result<Vec<Table>> {
        Ok(Vec::new())
    }

    fn metadata(&self) -> Metadata {
        Metadata::with_version("1.7")
    }
}

const INDEX: &str = "Section One Overview 3\nAppendix 10\nSection Two Details 7\n";

#[test]
fn test_split_parsed_document() {
    let backend = MemoryBackend::offering(20, 2, INDEX);
    let doc = PdfParser::with_backend(backend, ParseOptions::new())
        .parse()
        .unwrap();

    let sections = split_sections(&doc, &SplitterOptions::new().with_index_page(2));
    let ranges: Vec<(&str, u32, u32)> = sections
        .iter()
        .map(|s| (s.title.as_str(), s.start_page, s.end_page))
        .collect();

    assert_eq!(
        ranges,
        vec![("Section One Overview", 3, 6), ("Section Two Details", 7, 20)]
    );
    assert_eq!(sections[0].pages.first().unwrap().text, "Content of page 3");
    assert_eq!(sections[1].pages.last().unwrap().number, 20);
}

#[test]
fn test_index_page_found_without_hint() {
    let backend = MemoryBackend::offering(20, 4, INDEX);
    let doc = PdfParser::with_backend(backend, ParseOptions::new())
        .parse()
        .unwrap();

    let result = Prospectus::new().into_result(doc);
    assert_eq!(result.sections().len(), 2);
}

#[test]
fn test_no_index_gives_no_sections() {
    let backend = MemoryBackend::offering(5, 2, "Contents\nAppendix 4");
    let doc = PdfParser::with_backend(backend, ParseOptions::new())
        .parse()
        .unwrap();

    assert!(split_sections(&doc, &SplitterOptions::default()).is_empty());
}

#[test]
fn test_section_json_shape() {
    let backend = MemoryBackend::offering(8, 1, "Section A Intro 2\nSection B Terms 5");
    let doc = PdfParser::with_backend(backend, ParseOptions::new())
        .parse()
        .unwrap();

    let sections = split_sections(&doc, &SplitterOptions::default());
    let json = section_to_json(&sections[1], &RenderOptions::default(), JsonFormat::Pretty).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["title"], "Section B Terms");
    assert_eq!(value["start_page"], 5);
    assert_eq!(value["end_page"], 8);

    let pages = value["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 4);
    assert_eq!(pages[0]["page_number"], 5);
    assert_eq!(pages[0]["content"], "Content of page 5");
}

#[test]
fn test_parse_index_keeps_line_order() {
    let entries = prospectus::sections::parse_index(
        "Section 3 Taxation 40\nSection 1 Summary 5\nSection 2 Risks 12",
    );
    assert_eq!(
        entries,
        vec![
            IndexEntry::new("Section 3 Taxation", 40),
            IndexEntry::new("Section 1 Summary", 5),
            IndexEntry::new("Section 2 Risks", 12),
        ]
    );
}
