//! Plain text rendering with page markers and inline markdown tables.
//!
//! Each page renders to a self-contained block, so rendering page ranges one
//! at a time and concatenating the results gives the same text as rendering
//! the whole document at once.

use crate::error::Result;
use crate::model::{Document, Page};

use super::{
    table_to_markdown, table_to_markdown_with_caption, CleanupPipeline, PageMarker, RenderOptions,
};

/// Convert a document to page-marked plain text.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    Ok(render_pages(doc.pages.iter(), options))
}

/// Render a sequence of pages, honouring the page selection.
pub fn render_pages<'a>(pages: impl IntoIterator<Item = &'a Page>, options: &RenderOptions) -> String {
    let pipeline = CleanupPipeline::new(options.cleanup.clone());
    pages
        .into_iter()
        .filter(|p| options.page_selection.includes(p.number))
        .map(|p| render_page_with(&pipeline, p, options))
        .collect()
}

/// Render one page including its marker.
pub fn render_page(page: &Page, options: &RenderOptions) -> String {
    let pipeline = CleanupPipeline::new(options.cleanup.clone());
    render_page_with(&pipeline, page, options)
}

/// Render a page's cleaned text followed by its tables, without a marker.
pub fn render_page_body(page: &Page, options: &RenderOptions) -> String {
    let pipeline = CleanupPipeline::new(options.cleanup.clone());
    page_body(&pipeline, page, options)
}

fn render_page_with(pipeline: &CleanupPipeline, page: &Page, options: &RenderOptions) -> String {
    let body = page_body(pipeline, page, options);

    match options.page_marker {
        PageMarker::Heading => {
            let mut out = format!("# Page {}\n\n", page.number);
            if !body.is_empty() {
                out.push_str(&body);
                out.push_str("\n\n");
            }
            out
        }
        PageMarker::Footer => {
            if body.is_empty() {
                return String::new();
            }
            format!("{}\nPage No {}\n", body, page.number)
        }
    }
}

fn page_body(pipeline: &CleanupPipeline, page: &Page, options: &RenderOptions) -> String {
    let mut parts = Vec::new();

    let text = pipeline.process(&page.text);
    if !text.is_empty() {
        parts.push(text);
    }

    if options.include_tables {
        for table in &page.tables {
            let md = if options.table_captions {
                table_to_markdown_with_caption(table, page.number)
            } else {
                table_to_markdown(table)
            };
            if !md.is_empty() {
                parts.push(md.trim_end().to_string());
            }
        }
    }

    parts.join("\n\n")
}
