//! PDF parsing module.

mod backend;
mod content;
mod options;
mod pdf_parser;
mod raster;
mod tables;

pub use backend::{LopdfBackend, PdfBackend};
pub use content::{decode_text_simple, TextSpan};
pub use options::{ErrorMode, ExtractMode, ParseOptions};
pub use pdf_parser::PdfParser;
pub use raster::{PageRasterizer, Pdftoppm, DEFAULT_DPI};
pub use tables::{TableDetector, TableDetectorConfig};
