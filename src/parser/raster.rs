//! Page rasterization for cover images.

use std::path::PathBuf;
use std::process::Command;

use crate::error::{Error, Result};

/// Default rendering resolution.
pub const DEFAULT_DPI: u32 = 300;

/// Renders a single PDF page to PNG bytes.
pub trait PageRasterizer {
    /// Render 1-indexed `page` of the PDF in `pdf` at `dpi`.
    fn render_png(&self, pdf: &[u8], page: u32, dpi: u32) -> Result<Vec<u8>>;
}

/// [`PageRasterizer`] that shells out to poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct Pdftoppm {
    program: PathBuf,
}

impl Pdftoppm {
    /// Use `pdftoppm` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `pdftoppm` binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Whether the binary can be run.
    pub fn is_available(&self) -> bool {
        let ok = Command::new(&self.program).arg("-v").output().is_ok();
        if !ok {
            log::debug!("pdftoppm not found - install poppler-utils for cover images");
        }
        ok
    }
}

impl Default for Pdftoppm {
    fn default() -> Self {
        Self::with_program("pdftoppm")
    }
}

impl PageRasterizer for Pdftoppm {
    fn render_png(&self, pdf: &[u8], page: u32, dpi: u32) -> Result<Vec<u8>> {
        let temp_dir = tempfile::tempdir()?;
        let input = temp_dir.path().join("input.pdf");
        let output_prefix = temp_dir.path().join("page");
        std::fs::write(&input, pdf)?;

        let output = Command::new(&self.program)
            .arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg("-singlefile")
            .arg(&input)
            .arg(&output_prefix)
            .output()
            .map_err(|e| Error::Rasterize(format!("Failed to run pdftoppm: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Rasterize(format!(
                "pdftoppm failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        std::fs::read(output_prefix.with_extension("png"))
            .map_err(|e| Error::Rasterize(format!("pdftoppm produced no image: {}", e)))
    }
}
