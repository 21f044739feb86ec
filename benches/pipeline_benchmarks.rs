//! Pipeline benchmarks
//!
//! Measures the full structure pipeline and the XY-cut segmenter on
//! synthetic multi-column pages.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pdf_strata::document::{DecodedElement, DecodedPage};
use pdf_strata::elements::Font;
use pdf_strata::layout::XYCutSegmenter;
use pdf_strata::{Document, Pipeline, PipelineConfig, Rect};
use std::sync::Arc;

/// A page with `columns` columns of 50 lines of text.
fn synthetic_page(number: u32, columns: usize) -> DecodedPage {
    let font = Arc::new(Font::from_name("Times-Roman"));
    let column_width = 468.0 / columns as f32;
    let mut page = DecodedPage::new(number, [0.0, 0.0, 612.0, 792.0]);

    for column in 0..columns {
        let left = 72.0 + column as f32 * column_width;
        let chars_per_line = ((column_width - 18.0) / 5.0) as usize;
        for row in 0..50 {
            let y = 720.0 - row as f32 * 12.0;
            for i in 0..chars_per_line {
                let c = if i % 6 == 5 { ' ' } else { char::from(b'a' + ((row + i) % 26) as u8) };
                let x = left + i as f32 * 5.0;
                page = page.with_element(DecodedElement::glyph(c, [x, y, x + 5.0, y + 10.0], &font, 10.0));
            }
        }
    }
    page
}

fn synthetic_document(pages: u32, columns: usize) -> Document {
    let pages = (1..=pages).map(|n| synthetic_page(n, columns)).collect();
    Document::from_decoded(pages).expect("valid synthetic pages")
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    group.sample_size(20);

    for columns in [1, 2, 3] {
        let doc = synthetic_document(4, columns);
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{columns}_columns")),
            &doc,
            |b, doc| b.iter(|| pipeline.run(black_box(doc.clone())).unwrap()),
        );
    }
    group.finish();
}

fn bench_parallel_pages(c: &mut Criterion) {
    let doc = synthetic_document(16, 2);
    let pipeline = Pipeline::new(PipelineConfig::default().with_parallel_pages(true)).unwrap();
    c.bench_function("parallel_pages_16", |b| {
        b.iter(|| pipeline.run(black_box(doc.clone())).unwrap())
    });
}

fn bench_xycut(c: &mut Criterion) {
    let lines: Vec<Rect> = (0..3)
        .flat_map(|column| {
            (0..60).map(move |row| {
                let left = 72.0 + column as f32 * 160.0;
                let y = 720.0 - row as f32 * 12.0 - (row / 10) as f32 * 12.0;
                Rect::new(left, y, left + 140.0, y + 10.0).unwrap()
            })
        })
        .collect();
    let segmenter = XYCutSegmenter::new(10.0, 7.0);

    c.bench_function("xycut_180_lines", |b| {
        b.iter(|| segmenter.segment(1, 306.0, black_box(&lines), &[]).unwrap())
    });
}

criterion_group!(benches, bench_full_pipeline, bench_parallel_pages, bench_xycut);
criterion_main!(benches);
