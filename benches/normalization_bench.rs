//! Normalizer throughput benchmarks.
//!
//! Measures how fast raw rows are coerced into `NormalizedRecord`s. The
//! normalizer runs once per cell, so it dominates conversion time on large
//! exports.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `field` | Single-cell coercion per category |
//! | `row` | A full `titles` row, including the literal-list cast column |
//! | `file` | Reading and normalising a 1 000-row TSV held in memory |
//!
//! # Viewing results
//!
//! ```sh
//! cargo bench --bench normalization_bench
//! open target/criterion/report/index.html
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flatconv_core::normalizer::{normalize, normalize_field};
use flatconv_core::{Config, Delimiter, RawRecord};
use flatconv_formats::delimited::{records_from_str, ConvertOptions};
use std::hint::black_box;

const CAST: &str = "[('nm0851582', 'Audrey Tautou'), ('nm0473455', 'Mathieu Kassovitz'), ('nm0000376', 'Rufus')]";

// ---------------------------------------------------------------------------
// Single fields
// ---------------------------------------------------------------------------

fn field_bench(c: &mut Criterion) {
    let spec = Config::defaults().field_spec("titles").unwrap();
    let mut group = c.benchmark_group("field");
    group.throughput(Throughput::Elements(1));

    let cases: &[(&str, &str)] = &[
        ("numVotes", "800000"),
        ("averageRating", "8.3"),
        ("genres", "Comedy,Romance,Drama"),
        ("top_3_cast", CAST),
        ("top_3_cast", "not a literal"),
        ("primaryTitle", "  Amélie  "),
    ];

    for (field, token) in cases {
        group.bench_with_input(BenchmarkId::new(*field, token.len()), token, |b, token| {
            b.iter(|| normalize_field(black_box(field), Some(black_box(*token)), &spec))
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Full row
// ---------------------------------------------------------------------------

fn row_bench(c: &mut Criterion) {
    let spec = Config::defaults().field_spec("titles").unwrap();
    let raw = RawRecord::new()
        .field("tconst", "tt0211915")
        .field("titleType", "movie")
        .field("primaryTitle", "Amélie")
        .field("startYear", "2001")
        .field("endYear", "\\N")
        .field("runtimeMinutes", "122")
        .field("genres", "Comedy,Romance")
        .field("averageRating", "8.3")
        .field("numVotes", "800000")
        .field("top_3_cast", CAST);

    let mut group = c.benchmark_group("row");
    group.throughput(Throughput::Elements(raw.len() as u64));
    group.bench_function("titles", |b| b.iter(|| normalize(black_box(&raw), &spec)));
    group.finish();
}

// ---------------------------------------------------------------------------
// Whole file
// ---------------------------------------------------------------------------

fn file_bench(c: &mut Criterion) {
    let spec = Config::defaults().field_spec("titles").unwrap();
    let options = ConvertOptions::new(Delimiter::Tab, spec);

    let mut text = String::from("tconst\tprimaryTitle\tstartYear\tgenres\taverageRating\tnumVotes\ttop_3_cast\n");
    for i in 0..1_000usize {
        text.push_str(&format!(
            "tt{i:07}\tTitle {i}\t{}\tDrama,Short\t{}.{}\t{}\t{CAST}\n",
            1900 + i % 120,
            i % 10,
            i % 7,
            i * 13,
        ));
    }

    let mut group = c.benchmark_group("file");
    group.throughput(Throughput::Elements(1_000));
    group.bench_function("titles_1000_rows", |b| {
        b.iter(|| records_from_str(black_box(&text), &options).unwrap())
    });
    group.finish();
}

criterion_group!(benches, field_bench, row_bench, file_bench);
criterion_main!(benches);
