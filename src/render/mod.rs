//! Rendering module for turning extracted pages into text, markdown and JSON.

mod cleanup;
mod json;
mod markdown;
mod options;
mod text;

pub use cleanup::{clean_text, clean_text_with, CleanupOptions, CleanupPipeline, WhitespaceMode};
pub use json::{
    page_to_json, pages_to_json, section_to_json, to_json, JsonFormat, PageRecord, SectionRecord,
};
pub use markdown::{table_to_markdown, table_to_markdown_with_caption};
pub use options::{PageMarker, PageSelection, RenderOptions};
pub use text::{render_page, render_page_body, render_pages, to_text};
