//! Classification and summarization performance benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use eda::input::Parser;
use eda::{classify, summarize, CsvExplorer, OverrideMap};
use std::io::Write;
use tempfile::NamedTempFile;

/// Generate a mixed-type CSV.
fn generate_data(rows: usize) -> String {
    let mut data = String::new();
    data.push_str("order_id,customer,country,quantity,price,order_date,description\n");

    let countries = ["Germany", "France", "Spain", "Italy", "Portugal"];
    let words = ["red", "large", "wooden", "chair", "table", "lamp"];

    for row in 0..rows {
        data.push_str(&format!(
            "ORD{:06},customer_{},{},{},{:.2},2023-{:02}-{:02},{} {}\n",
            row,
            row % 97,
            countries[row % countries.len()],
            1 + row % 9,
            4.99 + (row % 50) as f64 * 0.75,
            (row % 12) + 1,
            (row % 28) + 1,
            words[row % words.len()],
            words[(row / 3) % words.len()],
        ));
    }

    data
}

/// Benchmark the full predict workflow on temporary files.
fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_data(*rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut csv = NamedTempFile::with_suffix(".csv").unwrap();
                    csv.write_all(data.as_bytes()).unwrap();
                    let types = NamedTempFile::with_suffix(".yaml").unwrap();
                    let types_path = types.path().to_path_buf();
                    drop(types);
                    (csv, types_path)
                },
                |(csv, types_path)| {
                    let prediction = CsvExplorer::new().predict(csv.path(), &types_path).unwrap();
                    let _ = std::fs::remove_file(&types_path);
                    black_box(prediction)
                },
            )
        });
    }

    group.finish();
}

/// Benchmark classification and summarization on an already parsed table.
fn bench_components(c: &mut Criterion) {
    let mut group = c.benchmark_group("components");

    let data = generate_data(10_000);
    let table = Parser::new().parse_bytes(data.as_bytes(), b',', b'"').unwrap();
    let overrides = OverrideMap::new();

    group.bench_function("classify_10k_rows", |b| {
        b.iter(|| black_box(classify(&table, &overrides)))
    });

    group.bench_function("summarize_10k_rows", |b| {
        b.iter(|| black_box(summarize(&table, &overrides)))
    });

    group.bench_function("parse_10k_rows", |b| {
        b.iter(|| black_box(Parser::new().parse_bytes(data.as_bytes(), b',', b'"').unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_predict, bench_components);
criterion_main!(benches);
