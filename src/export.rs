//! End-to-end export: parse, render and package a document.
//!
//! An [`Exporter`] turns PDF bytes into named [`Artifact`]s for one
//! [`ExportFormat`]. Whole-document failures (not a PDF, unreadable, no text
//! on any page) are returned as errors and produce nothing; the cover image
//! is best effort and is left out of bundles when rendering it fails.
//!
//! # Example
//!
//! ```no_run
//! use prospectus::export::{ExportFormat, ExportOptions, Exporter};
//!
//! fn main() -> prospectus::Result<()> {
//!     let exporter = Exporter::new(ExportOptions::new().lenient());
//!     let result = exporter.export_file("offering.pdf", ExportFormat::Bundle)?;
//!     result.write_all("out")?;
//!     Ok(())
//! }
//! ```

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use crate::batch::{document_batches, pages_in, DEFAULT_BATCH_SIZE};
use crate::bundle::{bundle_name, file_stem, section_name, Bundle};
use crate::error::{Error, Result};
use crate::model::Document;
use crate::parser::{PageRasterizer, ParseOptions, PdfParser, Pdftoppm, DEFAULT_DPI};
use crate::render::{
    page_to_json, pages_to_json, render_pages, section_to_json, to_json, to_text, JsonFormat,
    RenderOptions,
};
use crate::sections::{split_sections, SplitterOptions};

const MIME_TEXT: &str = "text/plain";
const MIME_JSON: &str = "application/json";
const MIME_ZIP: &str = "application/zip";

/// What an export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// One text file with every page
    Text,
    /// Zip of the cover image and per-batch text parts
    #[default]
    Bundle,
    /// Zip of the cover image, a cover record and per-batch JSON parts
    JsonBundle,
    /// One JSON file per indexed section
    Sections,
    /// The whole document as JSON
    Json,
}

/// Options for exporting documents.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Parsing options
    pub parse: ParseOptions,

    /// Rendering options
    pub render: RenderOptions,

    /// Section splitting options
    pub splitter: SplitterOptions,

    /// Pages per bundle part
    pub batch_size: NonZeroU32,

    /// Cover image resolution
    pub dpi: u32,

    /// JSON layout for JSON outputs
    pub json_format: JsonFormat,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Skip pages whose text cannot be extracted instead of failing.
    pub fn lenient(mut self) -> Self {
        self.parse = self.parse.lenient();
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set section splitting options.
    pub fn with_splitter(mut self, options: SplitterOptions) -> Self {
        self.splitter = options;
        self
    }

    /// Set the number of pages per bundle part.
    pub fn with_batch_size(mut self, size: NonZeroU32) -> Self {
        self.batch_size = size;
        self
    }

    /// Set the cover image resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            render: RenderOptions::default(),
            splitter: SplitterOptions::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            dpi: DEFAULT_DPI,
            json_format: JsonFormat::Pretty,
        }
    }
}

/// A named output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name
    pub name: String,
    /// MIME type of `data`
    pub mime_type: &'static str,
    /// File content
    pub data: Vec<u8>,
}

impl Artifact {
    fn text(name: String, content: String) -> Self {
        Self {
            name,
            mime_type: MIME_TEXT,
            data: content.into_bytes(),
        }
    }

    fn json(name: String, content: String) -> Self {
        Self {
            name,
            mime_type: MIME_JSON,
            data: content.into_bytes(),
        }
    }

    fn zip(name: String, data: Vec<u8>) -> Self {
        Self {
            name,
            mime_type: MIME_ZIP,
            data,
        }
    }

    /// Content as UTF-8, for text and JSON artifacts.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }

    /// Write into `dir` under the artifact's name.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.name);
        std::fs::write(&path, &self.data)?;
        Ok(path)
    }
}

/// Artifacts produced by one export.
#[derive(Debug, Clone, Default)]
pub struct ExportResult {
    /// Produced files, in output order
    pub artifacts: Vec<Artifact>,
}

impl ExportResult {
    /// Number of artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether nothing was produced.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Find an artifact by name.
    pub fn get(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }

    /// Write every artifact into `dir`, creating it if needed.
    pub fn write_all(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        self.artifacts.iter().map(|a| a.write_to_dir(dir)).collect()
    }
}

/// Runs exports with a fixed set of options.
pub struct Exporter<R: PageRasterizer = Pdftoppm> {
    options: ExportOptions,
    rasterizer: R,
}

impl Exporter<Pdftoppm> {
    /// Create an exporter that renders covers with `pdftoppm`.
    pub fn new(options: ExportOptions) -> Self {
        Self::with_rasterizer(options, Pdftoppm::new())
    }
}

impl<R: PageRasterizer> Exporter<R> {
    /// Create an exporter with a custom cover rasterizer.
    pub fn with_rasterizer(options: ExportOptions, rasterizer: R) -> Self {
        Self {
            options,
            rasterizer,
        }
    }

    /// The export options.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export the PDF at `path`, naming outputs after its file stem.
    pub fn export_file(&self, path: impl AsRef<Path>, format: ExportFormat) -> Result<ExportResult> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        self.export_bytes(&data, &file_stem(path), format)
    }

    /// Export PDF bytes, naming outputs after `stem`.
    pub fn export_bytes(&self, data: &[u8], stem: &str, format: ExportFormat) -> Result<ExportResult> {
        let parser = PdfParser::from_bytes_with_options(data, self.options.parse.clone())?;
        let document = parser.parse()?;
        self.export_document(&document, Some(data), stem, format)
    }

    /// Export an already-parsed document.
    ///
    /// `pdf` is the source the cover image is rendered from; without it
    /// bundles carry no image.
    pub fn export_document(
        &self,
        doc: &Document,
        pdf: Option<&[u8]>,
        stem: &str,
        format: ExportFormat,
    ) -> Result<ExportResult> {
        if !doc.has_text() {
            return Err(Error::NoExtractableText);
        }

        let artifacts = match format {
            ExportFormat::Text => vec![Artifact::text(
                format!("{}.txt", stem),
                to_text(doc, &self.options.render)?,
            )],
            ExportFormat::Json => vec![Artifact::json(
                format!("{}.json", stem),
                to_json(doc, self.options.json_format)?,
            )],
            ExportFormat::Bundle => {
                let bundle = self.text_bundle(doc, pdf, stem);
                vec![Artifact::zip(bundle_name(stem), bundle.to_zip_bytes()?)]
            }
            ExportFormat::JsonBundle => {
                let bundle = self.json_bundle(doc, pdf, stem)?;
                vec![Artifact::zip(bundle_name(stem), bundle.to_zip_bytes()?)]
            }
            ExportFormat::Sections => self.section_files(doc, stem)?,
        };

        log::debug!("Exported {} artifacts as {:?}", artifacts.len(), format);
        Ok(ExportResult { artifacts })
    }

    /// Bundle of the cover image and one text part per page batch.
    pub fn text_bundle(&self, doc: &Document, pdf: Option<&[u8]>, stem: &str) -> Bundle {
        let mut bundle = Bundle::new(stem);
        if let Some(png) = pdf.and_then(|data| self.cover_image(data)) {
            bundle.add_cover_image(png);
        }

        for (number, range) in document_batches(doc, self.options.batch_size) {
            let text = render_pages(pages_in(doc, &range), &self.options.render);
            bundle.add_part(number, "txt", text);
        }
        bundle
    }

    /// Bundle of the cover image, the cover record and one JSON part per page
    /// batch.
    pub fn json_bundle(&self, doc: &Document, pdf: Option<&[u8]>, stem: &str) -> Result<Bundle> {
        let mut bundle = Bundle::new(stem);
        if let Some(png) = pdf.and_then(|data| self.cover_image(data)) {
            bundle.add_cover_image(png);
        }
        if let Some(cover) = doc.cover() {
            bundle.add_cover_json(page_to_json(
                cover,
                &self.options.render,
                self.options.json_format,
            )?);
        }

        for (number, range) in document_batches(doc, self.options.batch_size) {
            let json = pages_to_json(
                pages_in(doc, &range),
                &self.options.render,
                self.options.json_format,
            )?;
            bundle.add_part(number, "json", json);
        }
        Ok(bundle)
    }

    /// One JSON artifact per indexed section; empty when no index is found.
    pub fn section_files(&self, doc: &Document, stem: &str) -> Result<Vec<Artifact>> {
        split_sections(doc, &self.options.splitter)
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let json =
                    section_to_json(section, &self.options.render, self.options.json_format)?;
                Ok(Artifact::json(section_name(stem, i + 1), json))
            })
            .collect()
    }

    /// Render the first page, or `None` with a warning if that fails.
    pub fn cover_image(&self, pdf: &[u8]) -> Option<Vec<u8>> {
        match self.rasterizer.render_png(pdf, 1, self.options.dpi) {
            Ok(png) => Some(png),
            Err(e) => {
                log::warn!("Could not render cover image: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Page;

    struct FixedPng;

    impl PageRasterizer for FixedPng {
        fn render_png(&self, _pdf: &[u8], page: u32, dpi: u32) -> Result<Vec<u8>> {
            Ok(format!("png:{}:{}", page, dpi).into_bytes())
        }
    }

    struct NoPng;

    impl PageRasterizer for NoPng {
        fn render_png(&self, _pdf: &[u8], _page: u32, _dpi: u32) -> Result<Vec<u8>> {
            Err(Error::Rasterize("no renderer".into()))
        }
    }

    fn document(pages: u32) -> Document {
        let mut doc = Document::new();
        for n in 1..=pages {
            doc.add_page(Page::with_text(n, format!("Page {} body", n)));
        }
        doc
    }

    #[test]
    fn test_blank_document_is_error() {
        let mut doc = Document::new();
        doc.add_page(Page::with_text(1, "  \n "));

        let exporter = Exporter::with_rasterizer(ExportOptions::new(), FixedPng);
        let err = exporter
            .export_document(&doc, None, "blank", ExportFormat::Text)
            .unwrap_err();
        assert!(matches!(err, Error::NoExtractableText));
    }

    #[test]
    fn test_text_artifact() {
        let exporter = Exporter::with_rasterizer(ExportOptions::new(), FixedPng);
        let result = exporter
            .export_document(&document(2), None, "deal", ExportFormat::Text)
            .unwrap();

        let artifact = result.get("deal.txt").unwrap();
        assert_eq!(artifact.mime_type, "text/plain");
        assert!(artifact.as_str().unwrap().starts_with("# Page 1\n\nPage 1 body"));
    }

    #[test]
    fn test_text_bundle_parts() {
        let options = ExportOptions::new().with_batch_size(NonZeroU32::new(2).unwrap());
        let exporter = Exporter::with_rasterizer(options, FixedPng);
        let bundle = exporter.text_bundle(&document(5), Some(b"%PDF-1.7"), "deal");

        let names: Vec<&str> = bundle.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "deal_first_page.png",
                "deal_part_1.txt",
                "deal_part_2.txt",
                "deal_part_3.txt"
            ]
        );
        assert_eq!(bundle.entries()[0].data, b"png:1:300");
    }

    #[test]
    fn test_bundle_skips_batches_outside_selection() {
        let mut doc = Document::new();
        doc.metadata.page_count = 6;
        for n in 3..=4 {
            doc.add_page(Page::with_text(n, format!("Page {} body", n)));
        }

        let options = ExportOptions::new().with_batch_size(NonZeroU32::new(2).unwrap());
        let exporter = Exporter::with_rasterizer(options, NoPng);

        let text = exporter.text_bundle(&doc, None, "deal");
        let names: Vec<&str> = text.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["deal_part_2.txt"]);

        let json = exporter.json_bundle(&doc, None, "deal").unwrap();
        let names: Vec<&str> = json.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["deal_part_2.json"]);
    }

    #[test]
    fn test_cover_failure_leaves_image_out() {
        let exporter = Exporter::with_rasterizer(ExportOptions::new(), NoPng);
        let bundle = exporter.text_bundle(&document(1), Some(b"%PDF-1.7"), "deal");
        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.entries()[0].name, "deal_part_1.txt");
    }

    #[test]
    fn test_json_bundle_has_cover_record() {
        let exporter = Exporter::with_rasterizer(ExportOptions::new(), NoPng);
        let bundle = exporter.json_bundle(&document(3), None, "deal").unwrap();

        let names: Vec<&str> = bundle.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["deal_cover.json", "deal_part_1.json"]);

        let cover: serde_json::Value = serde_json::from_slice(&bundle.entries()[0].data).unwrap();
        assert_eq!(cover["page_number"], 1);
        assert_eq!(cover["content"], "Page 1 body");
    }

    #[test]
    fn test_sections_without_index_is_empty() {
        let exporter = Exporter::with_rasterizer(ExportOptions::new(), NoPng);
        let result = exporter
            .export_document(&document(3), None, "deal", ExportFormat::Sections)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_write_all() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::with_rasterizer(ExportOptions::new(), NoPng);
        let result = exporter
            .export_document(&document(1), None, "deal", ExportFormat::Json)
            .unwrap();

        let paths = result.write_all(dir.path().join("out")).unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("deal.json"));
        assert!(paths[0].exists());
    }
}
