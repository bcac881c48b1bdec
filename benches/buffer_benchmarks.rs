//! Benchmarks for buffer edits and full-text search.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scribe_buffer::search::{self, SearchQuery};
use scribe_buffer::TextBuffer;

/// Generates a large text string for benchmarking.
fn generate_large_text(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("Line {}: This is a sample line of text for benchmarking purposes.\n", i))
        .collect()
}

/// Benchmarks buffer creation.
fn bench_buffer_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_creation");

    for size in [100, 1000, 10000, 100000].iter() {
        let text = generate_large_text(*size);

        group.bench_with_input(BenchmarkId::new("from_string", size), &text, |b, text| {
            b.iter(|| {
                let buffer = TextBuffer::from(black_box(text.as_str()));
                black_box(buffer)
            })
        });
    }

    group.finish();
}

/// Benchmarks insertion at various positions.
fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");

    let base_text = generate_large_text(10000);

    group.bench_function("insert_at_start", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base_text.as_str()),
            |mut buffer| {
                buffer.insert(0, black_box("inserted text")).unwrap();
                black_box(buffer)
            },
        )
    });

    group.bench_function("insert_at_middle", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base_text.as_str()),
            |mut buffer| {
                let mid = buffer.len_chars() / 2;
                buffer.insert(mid, black_box("inserted text")).unwrap();
                black_box(buffer)
            },
        )
    });

    group.bench_function("insert_at_end", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base_text.as_str()),
            |mut buffer| {
                let end = buffer.len_chars();
                buffer.insert(end, black_box("inserted text")).unwrap();
                black_box(buffer)
            },
        )
    });

    group.finish();
}

/// Benchmarks the full-document rescan the find bar performs on every
/// query change. The editor recomputes the match set instead of keeping
/// an index; this tracks what that choice costs as documents grow.
fn bench_search_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_scan");

    for size in [100, 1000, 10000].iter() {
        let text = generate_large_text(*size);
        let query = SearchQuery::new("sample");

        group.bench_with_input(
            BenchmarkId::new("find_all", size),
            &(text, query),
            |b, (text, query)| {
                b.iter(|| black_box(search::find_all(black_box(text), query).len()))
            },
        );
    }

    let text = generate_large_text(1000);
    let whole_word = SearchQuery {
        pattern: "sample".to_string(),
        case_sensitive: false,
        whole_word: true,
    };

    group.bench_function("find_all_whole_word_1000", |b| {
        b.iter(|| black_box(search::find_all(black_box(&text), &whole_word).len()))
    });

    group.bench_function("find_next_wrapping_1000", |b| {
        let from = text.chars().count();
        b.iter(|| black_box(search::find_next_from(black_box(&text), &SearchQuery::new("sample"), from)))
    });

    group.finish();
}

/// Benchmarks undo of grouped edits.
fn bench_undo(c: &mut Criterion) {
    let mut group = c.benchmark_group("undo");

    let base_text = generate_large_text(1000);

    group.bench_function("grouped_replace_undo", |b| {
        b.iter_with_setup(
            || {
                let mut buffer = TextBuffer::from(base_text.as_str());
                buffer.begin_edit_group();
                for i in (0..10).rev() {
                    let at = i * 100;
                    buffer.replace(at..at + 4, "SWAP").unwrap();
                }
                buffer.end_edit_group();
                buffer
            },
            |mut buffer| {
                buffer.undo().unwrap();
                black_box(buffer)
            },
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_buffer_creation,
    bench_insertion,
    bench_search_scan,
    bench_undo
);
criterion_main!(benches);
