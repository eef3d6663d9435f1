//! Table detection from text positions.
//!
//! Works without ruling lines: spans are grouped into rows by baseline, left
//! edges that recur across rows become column boundaries, and runs of rows
//! that line up with those boundaries are read as tables. A column with no
//! text in a given row yields an absent cell.

use std::collections::{HashMap, HashSet};

use crate::model::{Table, TableRow};

use super::content::TextSpan;

/// Width of the buckets left edges are snapped to, in points.
const EDGE_BUCKET: f32 = 5.0;

/// How far a span may sit from a column edge and still count as aligned.
const ALIGN_TOLERANCE: f32 = 5.0;

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 8,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.5,
            min_column_gap: 15.0,
        }
    }
}

/// Spans sharing a baseline.
#[derive(Debug, Clone)]
struct SpanRow {
    spans: Vec<TextSpan>,
}

/// Detects tables in a page's text spans.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables, top of page first.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<Table> {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            return Vec::new();
        }

        let rows = self.group_into_rows(spans);
        let columns = self.detect_columns(&rows);
        if columns.len() < self.config.min_columns {
            return Vec::new();
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_table_regions(&rows, &columns) {
            let region = &rows[start..=end];
            let region_columns = self.detect_columns(region);

            if region_columns.len() < self.config.min_columns
                || region_columns.len() > self.config.max_columns
            {
                log::debug!(
                    "TableDetector: skipping region with {} columns",
                    region_columns.len()
                );
                continue;
            }
            if is_list_pattern(region) {
                log::debug!("TableDetector: skipping region that reads as a list");
                continue;
            }

            tables.push(build_table(region, &region_columns));
        }

        log::debug!("TableDetector: {} tables from {} spans", tables.len(), spans.len());
        tables
    }

    /// Group spans into rows by Y position, top to bottom.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<SpanRow> {
        let mut sorted = spans.to_vec();
        sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

        let mut rows: Vec<SpanRow> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in sorted {
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            let same_row = current_y.is_some_and(|y| (span.y - y).abs() <= tolerance);
            match rows.last_mut() {
                Some(row) if same_row => row.spans.push(span),
                _ => {
                    current_y = Some(span.y);
                    rows.push(SpanRow { spans: vec![span] });
                }
            }
        }

        for row in &mut rows {
            row.spans.sort_by(|a, b| a.x.total_cmp(&b.x));
        }
        rows
    }

    /// Left edges that recur across multi-span rows.
    fn detect_columns(&self, rows: &[SpanRow]) -> Vec<f32> {
        let multi: Vec<&SpanRow> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        if multi.len() < self.config.min_rows {
            return Vec::new();
        }

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &multi {
            let buckets: HashSet<i32> = row
                .spans
                .iter()
                .map(|s| (s.x / EDGE_BUCKET).round() as i32)
                .collect();
            for bucket in buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((multi.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|(_, count)| *count >= min_occurrences)
            .map(|(bucket, _)| bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(f32::total_cmp);

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Contiguous runs of multi-span rows aligned with `columns`.
    fn find_table_regions(&self, rows: &[SpanRow], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = row.spans.len() >= 2
                && alignment_score(row, columns) >= self.config.min_alignment_ratio;

            match (aligned, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    if i - s >= self.config.min_rows {
                        regions.push((s, i - 1));
                    }
                    start = None;
                }
                _ => {}
            }
        }

        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }
        regions
    }
}

/// Fraction of a row's spans sitting on a column edge.
fn alignment_score(row: &SpanRow, columns: &[f32]) -> f32 {
    if row.spans.is_empty() {
        return 0.0;
    }
    let aligned = row
        .spans
        .iter()
        .filter(|s| columns.iter().any(|c| (s.x - c).abs() <= ALIGN_TOLERANCE))
        .count();
    aligned as f32 / row.spans.len() as f32
}

fn build_table(rows: &[SpanRow], columns: &[f32]) -> Table {
    let mut table = Table::new();

    for row in rows {
        let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
        for span in &row.spans {
            cells[column_for(span.x, columns)].push(span.text.trim());
        }

        table.add_row(TableRow::new(
            cells
                .into_iter()
                .map(|parts| {
                    let text = parts.join(" ");
                    (!text.is_empty()).then_some(text)
                })
                .collect(),
        ));
    }

    table
}

/// Last column whose edge the span starts at or after, allowing some slack.
fn column_for(x: f32, columns: &[f32]) -> usize {
    columns
        .iter()
        .rposition(|&edge| x >= edge - ALIGN_TOLERANCE * 2.0)
        .unwrap_or(0)
}

/// Rows led by bullets or numbers are lists, not tables.
fn is_list_pattern(rows: &[SpanRow]) -> bool {
    let markers = rows
        .iter()
        .filter_map(|r| r.spans.first())
        .filter(|s| is_list_marker(s.text.trim()))
        .count();
    markers * 2 >= rows.len()
}

fn is_list_marker(text: &str) -> bool {
    if matches!(text, "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "■" | "●") {
        return true;
    }
    let body = text
        .strip_suffix('.')
        .or_else(|| text.strip_suffix(')'))
        .unwrap_or("");
    !body.is_empty() && body.len() <= 3 && body.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, x, y, 10.0)
    }

    #[test]
    fn test_detects_simple_grid() {
        let spans = vec![
            span("Class", 72.0, 700.0),
            span("Amount", 200.0, 700.0),
            span("A", 72.0, 686.0),
            span("100", 200.0, 686.0),
            span("B", 72.0, 672.0),
            span("250", 200.0, 672.0),
        ];

        let tables = TableDetector::new().detect(&spans);
        assert_eq!(tables.len(), 1);

        let table = &tables[0];
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[0].cell(0), "Class");
        assert_eq!(table.rows[0].cell(1), "Amount");
        assert_eq!(table.rows[2].cell(1), "250");
    }

    #[test]
    fn test_missing_cell_is_absent() {
        let spans = vec![
            span("Name", 72.0, 700.0),
            span("Rate", 200.0, 700.0),
            span("Term", 320.0, 700.0),
            span("Notes", 72.0, 686.0),
            span("5%", 200.0, 686.0),
            span("Bonds", 72.0, 672.0),
            span("3%", 200.0, 672.0),
            span("10y", 320.0, 672.0),
        ];

        let tables = TableDetector::new().detect(&spans);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows[1].cells[2], None);
        assert_eq!(tables[0].rows[2].cells[2].as_deref(), Some("10y"));
    }

    #[test]
    fn test_paragraph_text_is_not_a_table() {
        let spans = vec![
            span("The issuer may redeem the notes at any time.", 72.0, 700.0),
            span("Holders will be notified in advance.", 72.0, 686.0),
            span("See the terms and conditions.", 72.0, 672.0),
        ];
        assert!(TableDetector::new().detect(&spans).is_empty());
    }

    #[test]
    fn test_bulleted_list_is_not_a_table() {
        let spans = vec![
            span("•", 72.0, 700.0),
            span("Credit risk", 90.0, 700.0),
            span("•", 72.0, 686.0),
            span("Market risk", 90.0, 686.0),
            span("•", 72.0, 672.0),
            span("Liquidity risk", 90.0, 672.0),
        ];
        assert!(TableDetector::new().detect(&spans).is_empty());
    }

    #[test]
    fn test_list_marker() {
        assert!(is_list_marker("1."));
        assert!(is_list_marker("12)"));
        assert!(is_list_marker("•"));
        assert!(!is_list_marker("2024"));
        assert!(!is_list_marker("Class"));
    }

    #[test]
    fn test_column_for() {
        let columns = [72.0, 200.0, 320.0];
        assert_eq!(column_for(72.0, &columns), 0);
        assert_eq!(column_for(150.0, &columns), 0);
        assert_eq!(column_for(195.0, &columns), 1);
        assert_eq!(column_for(500.0, &columns), 2);
        assert_eq!(column_for(10.0, &columns), 0);
    }
}
