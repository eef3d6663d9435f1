//! Zip packaging of export artifacts.
//!
//! A bundle holds the cover image followed by numbered parts, one per page
//! batch. Entry names are derived from the source file stem so several
//! bundles can be unpacked side by side.

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// Stem used when a file name has none.
pub const DEFAULT_STEM: &str = "document";

/// File stem of `path`, for naming outputs.
pub fn file_stem(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_STEM.to_string())
}

/// `<stem>_first_page.png`
pub fn cover_image_name(stem: &str) -> String {
    format!("{}_first_page.png", stem)
}

/// `<stem>_cover.json`
pub fn cover_json_name(stem: &str) -> String {
    format!("{}_cover.json", stem)
}

/// `<stem>_part_<index>.<ext>`, 1-based.
pub fn part_name(stem: &str, index: usize, ext: &str) -> String {
    format!("{}_part_{}.{}", stem, index, ext)
}

/// `<stem>_section_<index>.json`, 1-based.
pub fn section_name(stem: &str, index: usize) -> String {
    format!("{}_section_{}.json", stem, index)
}

/// `<stem>_output.zip`
pub fn bundle_name(stem: &str) -> String {
    format!("{}_output.zip", stem)
}

/// A named file inside a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    /// Entry name inside the archive
    pub name: String,
    /// Entry content
    pub data: Vec<u8>,
}

/// Collects entries and writes them out as a zip archive.
#[derive(Debug, Clone)]
pub struct Bundle {
    stem: String,
    entries: Vec<BundleEntry>,
}

impl Bundle {
    /// Create an empty bundle for files named after `stem`.
    pub fn new(stem: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            entries: Vec::new(),
        }
    }

    /// The stem entries are named after.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Add the first-page image.
    pub fn add_cover_image(&mut self, png: Vec<u8>) {
        let name = cover_image_name(&self.stem);
        self.push(name, png);
    }

    /// Add the first-page record.
    pub fn add_cover_json(&mut self, json: String) {
        let name = cover_json_name(&self.stem);
        self.push(name, json.into_bytes());
    }

    /// Add a numbered part (1-based) with the given extension.
    pub fn add_part(&mut self, index: usize, ext: &str, content: String) {
        let name = part_name(&self.stem, index, ext);
        self.push(name, content.into_bytes());
    }

    /// Add an arbitrary entry.
    pub fn push(&mut self, name: String, data: Vec<u8>) {
        self.entries.push(BundleEntry { name, data });
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bundle has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the archive to `writer`.
    pub fn write_to<W: Write + std::io::Seek>(&self, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.data)?;
        }

        Ok(zip.finish()?)
    }

    /// Write the archive into memory.
    pub fn to_zip_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }
}
