//! Document editing and query benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use neotext::{
    CursorMove, DisplayList, DocumentOptions, MonospaceMetrics, Point, Rgba, Style, TextDocument,
};
use std::hint::black_box;

fn sample_document(paragraphs: usize) -> TextDocument {
    let mut doc = TextDocument::with_options(
        MonospaceMetrics::new(),
        DocumentOptions::default().with_wrap_width(480.0),
    );
    let text = (0..paragraphs)
        .map(|i| format!("Paragraph {i}: the quick brown fox jumps over the lazy dog."))
        .collect::<Vec<_>>()
        .join("\n");
    let _ = doc.set_text(&text);
    let _ = doc.line_count();
    doc
}

fn editing(c: &mut Criterion) {
    c.bench_function("document_type_char_1k_paragraphs", |b| {
        b.iter_batched(
            || {
                let mut doc = sample_document(1_000);
                let _ = doc.set_cursor_position(20);
                doc
            },
            |mut doc| {
                doc.text_input(black_box("x"));
                doc.line_count()
            },
            BatchSize::LargeInput,
        );
    });

    c.bench_function("document_restyle_range", |b| {
        let style = Style::text(Rgba::RED);
        b.iter_batched(
            || sample_document(100),
            |mut doc| {
                let _ = doc.apply_style(black_box(10..400), Some(&style));
                doc.line_count()
            },
            BatchSize::LargeInput,
        );
    });
}

fn queries(c: &mut Criterion) {
    let doc = sample_document(100);
    let last = doc.len_chars();

    c.bench_function("document_position", |b| {
        b.iter(|| doc.position(black_box(last / 2)));
    });

    c.bench_function("document_hit_test", |b| {
        b.iter(|| doc.hit_test(black_box(Point::new(200.0, 900.0))));
    });

    c.bench_function("document_paint_100_paragraphs", |b| {
        let mut list = DisplayList::new();
        b.iter(|| {
            list.clear();
            doc.paint(&mut list);
            list.len()
        });
    });
}

fn navigation(c: &mut Criterion) {
    let mut doc = sample_document(100);
    c.bench_function("document_line_down_up", |b| {
        b.iter(|| {
            doc.move_cursor(CursorMove::DocumentStart);
            for _ in 0..50 {
                doc.move_cursor(black_box(CursorMove::LineDown));
            }
            doc.move_cursor(CursorMove::LineUp)
        });
    });
}

criterion_group!(benches, editing, queries, navigation);
criterion_main!(benches);
