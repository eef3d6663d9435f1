//! PDF document parser.

use std::io::Read;
use std::path::Path;

use crate::detect::{sniff_bytes, sniff_path};
use crate::error::Result;
use crate::model::{Document, Page};

use super::backend::{LopdfBackend, PdfBackend};
use super::options::{ErrorMode, ExtractMode, ParseOptions};

/// PDF document parser.
///
/// Generic over the [`PdfBackend`] so documents can come from lopdf or from
/// any other source of page text and tables.
pub struct PdfParser<B: PdfBackend = LopdfBackend> {
    backend: B,
    options: ParseOptions,
}

impl PdfParser<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let header = sniff_path(path)?;
        log::debug!("Opening {} ({})", path.display(), header);

        Ok(Self::with_backend(LopdfBackend::load_file(path)?, options))
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        sniff_bytes(data)?;
        Ok(Self::with_backend(LopdfBackend::load_bytes(data)?, options))
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }
}

impl<B: PdfBackend> PdfParser<B> {
    /// Parse through an already-loaded backend.
    pub fn with_backend(backend: B, options: ParseOptions) -> Self {
        Self { backend, options }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of pages in the source document.
    pub fn page_count(&self) -> u32 {
        self.backend.page_count()
    }

    /// Parse the selected pages into a [`Document`].
    pub fn parse(&self) -> Result<Document> {
        let mut document = Document::new();
        document.metadata = self.backend.metadata();

        let total_pages = self.backend.page_count();
        document.metadata.page_count = total_pages;

        for page_num in (1..=total_pages).filter(|n| self.options.pages.includes(*n)) {
            document.add_page(self.parse_page(page_num)?);
        }

        log::debug!(
            "Parsed {} of {} pages ({} tables)",
            document.pages.len(),
            total_pages,
            document.table_count()
        );
        Ok(document)
    }

    /// Parse a single page.
    ///
    /// Text failures follow the error mode; table failures are logged and the
    /// page keeps its text.
    pub fn parse_page(&self, page_num: u32) -> Result<Page> {
        let text = match self.backend.page_text(page_num) {
            Ok(text) => text,
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Failed to extract text from page {}: {}", page_num, e);
                String::new()
            }
            Err(e) => return Err(e),
        };

        let mut page = Page::with_text(page_num, text);

        if self.options.extract_mode == ExtractMode::Full {
            match self.backend.page_tables(page_num) {
                Ok(tables) => tables
                    .into_iter()
                    .filter(|t| !t.is_empty())
                    .for_each(|t| page.add_table(t)),
                Err(e) => log::warn!("Skipping tables on page {}: {}", page_num, e),
            }
        }

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{Metadata, Table, TableRow};
    use crate::render::PageSelection;

    struct FakeBackend {
        pages: Vec<std::result::Result<&'static str, &'static str>>,
        broken_tables: Vec<u32>,
    }

    impl PdfBackend for FakeBackend {
        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn page_text(&self, page: u32) -> Result<String> {
            match self.pages[page as usize - 1] {
                Ok(text) => Ok(text.to_string()),
                Err(msg) => Err(Error::TextExtract(msg.to_string())),
            }
        }

        fn page_tables(&self, page: u32) -> Result<Vec<Table>> {
            if self.broken_tables.contains(&page) {
                return Err(Error::TableExtract("bad content stream".into()));
            }
            let mut table = Table::new();
            table.add_row(TableRow::from_strings(["p", &page.to_string()]));
            Ok(vec![table, Table::new()])
        }

        fn metadata(&self) -> Metadata {
            Metadata::with_version("1.7")
        }
    }

    fn fake(pages: Vec<std::result::Result<&'static str, &'static str>>) -> FakeBackend {
        FakeBackend {
            pages,
            broken_tables: Vec::new(),
        }
    }

    #[test]
    fn test_parse_all_pages() {
        let parser = PdfParser::with_backend(fake(vec![Ok("one"), Ok("two")]), ParseOptions::new());
        let doc = parser.parse().unwrap();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.metadata.pdf_version, "1.7");
        assert_eq!(doc.pages[1].text, "two");
        assert_eq!(doc.pages[1].tables.len(), 1);
    }

    #[test]
    fn test_page_selection_keeps_total() {
        let options = ParseOptions::new().with_pages(PageSelection::Pages(vec![2]));
        let parser = PdfParser::with_backend(fake(vec![Ok("a"), Ok("b"), Ok("c")]), options);
        let doc = parser.parse().unwrap();

        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].number, 2);
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_strict_text_failure_aborts() {
        let parser = PdfParser::with_backend(fake(vec![Ok("a"), Err("boom")]), ParseOptions::new());
        assert!(matches!(parser.parse(), Err(Error::TextExtract(_))));
    }

    #[test]
    fn test_lenient_text_failure_gives_empty_page() {
        let parser = PdfParser::with_backend(
            fake(vec![Ok("a"), Err("boom")]),
            ParseOptions::new().lenient(),
        );
        let doc = parser.parse().unwrap();
        assert_eq!(doc.pages.len(), 2);
        assert!(doc.pages[1].text.is_empty());
    }

    #[test]
    fn test_table_failure_is_skipped() {
        let mut backend = fake(vec![Ok("a"), Ok("b")]);
        backend.broken_tables.push(1);

        let doc = PdfParser::with_backend(backend, ParseOptions::new())
            .parse()
            .unwrap();
        assert!(doc.pages[0].tables.is_empty());
        assert_eq!(doc.pages[0].text, "a");
        assert_eq!(doc.pages[1].tables.len(), 1);
    }

    #[test]
    fn test_text_only_skips_tables() {
        let parser =
            PdfParser::with_backend(fake(vec![Ok("a")]), ParseOptions::new().text_only());
        let doc = parser.parse().unwrap();
        assert!(doc.pages[0].tables.is_empty());
    }

    #[test]
    fn test_from_bytes_rejects_non_pdf() {
        assert!(matches!(
            PdfParser::from_bytes(b"PK\x03\x04 not a pdf"),
            Err(Error::UnknownFormat)
        ));
    }
}
