//! Markdown rendering for extracted tables.

use crate::model::{Table, TableRow};

use super::clean_text;

/// Render a table as a GitHub-flavoured markdown table.
///
/// The first row is the header and is followed by a `---` separator sized to
/// the widest row. Short rows and absent cells render as empty cells. Every
/// cell is whitespace-collapsed. An empty table renders as `""`.
pub fn table_to_markdown(table: &Table) -> String {
    let col_count = table.column_count();
    if table.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    let empty = TableRow::default();

    push_row(&mut output, table.header().unwrap_or(&empty), col_count);

    output.push('|');
    for _ in 0..col_count {
        output.push_str(" --- |");
    }
    output.push('\n');

    for row in table.body() {
        push_row(&mut output, row, col_count);
    }

    output
}

/// Render a table with a caption line naming the page it came from.
pub fn table_to_markdown_with_caption(table: &Table, page_number: u32) -> String {
    let body = table_to_markdown(table);
    if body.is_empty() {
        return body;
    }
    format!("Table from page {}:\n{}", page_number, body)
}

fn push_row(output: &mut String, row: &TableRow, col_count: usize) {
    output.push('|');
    for col in 0..col_count {
        let cell = clean_text(row.cell(col));
        output.push(' ');
        output.push_str(&cell);
        output.push_str(" |");
    }
    output.push('\n');
}
