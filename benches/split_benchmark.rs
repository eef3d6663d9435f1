//! Benchmarks for section splitting and text rendering.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use prospectus::render::{table_to_markdown, to_text, RenderOptions};
use prospectus::{split_sections, Document, Page, SplitterOptions, Table, TableRow};

/// Builds an offering-sized document: an index on page 2 listing `sections`
/// evenly spaced sections, body text on every page and a table every 25 pages.
fn create_document(page_count: u32, sections: u32) -> Document {
    let step = (page_count / sections).max(1);
    let index: String = (0..sections)
        .map(|i| format!("Section {} Heading number {} ........ {}\n", i + 1, i + 1, 3 + i * step))
        .collect();

    let mut doc = Document::new();
    doc.add_page(Page::with_text(1, "Base Prospectus\nEUR 10,000,000,000 Programme"));
    doc.add_page(Page::with_text(2, index));

    for n in 3..=page_count {
        let mut page = Page::with_text(
            n,
            format!("The Notes  will be issued\tin series.\n Page body {} ", n).repeat(20),
        );
        if n % 25 == 0 {
            page.add_table(sample_table(6));
        }
        doc.add_page(page);
    }
    doc
}

fn sample_table(rows: usize) -> Table {
    let mut table = Table::new();
    table.add_row(TableRow::from_strings(["Series", "Currency", "Amount", "Maturity"]));
    for i in 0..rows {
        table.add_row(TableRow::new(vec![
            Some(format!("{}", i + 1)),
            Some("EUR".to_string()),
            (i % 3 != 0).then(|| format!("{} 000 000", i * 50)),
            Some("2031".to_string()),
        ]));
    }
    table
}

/// Benchmark index parsing and section splitting.
fn bench_split_sections(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_sections");

    for page_count in [100u32, 500].iter() {
        let doc = create_document(*page_count, 20);
        let options = SplitterOptions::new();

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| split_sections(black_box(&doc), &options));
        });
    }

    group.finish();
}

/// Benchmark page-marked text rendering.
fn bench_render_text(c: &mut Criterion) {
    let doc = create_document(500, 20);
    let options = RenderOptions::default();

    c.bench_function("render_text_500_pages", |b| {
        b.iter(|| to_text(black_box(&doc), &options).unwrap());
    });
}

/// Benchmark table rendering.
fn bench_table_markdown(c: &mut Criterion) {
    let table = sample_table(50);

    c.bench_function("table_to_markdown_50_rows", |b| {
        b.iter(|| table_to_markdown(black_box(&table)));
    });
}

criterion_group!(
    benches,
    bench_split_sections,
    bench_render_text,
    bench_table_markdown,
);
criterion_main!(benches);
