//! Benchmarks for the table search filter
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use wastetrack::headless::HeadlessDocument;
use wastetrack::search::{apply_filter, row_matches};

fn create_inventory(rows: usize) -> HeadlessDocument {
    let doc = HeadlessDocument::new();
    let tbody = doc.body_element().child("table").child("tbody");
    let months = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

    for i in 0..rows {
        let row = tbody.child("tr");
        row.child("td").with_text(&format!("Item {}", i));
        row.child("td").with_text(months[i % months.len()]);
        row.child("td").with_text("Pantry");
    }
    doc
}

fn bench_row_matches(c: &mut Criterion) {
    c.bench_function("row_matches", |b| {
        b.iter(|| row_matches(black_box("Item 4821 Jun Pantry"), black_box("jun")))
    });
}

fn bench_apply_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_filter");

    for size in [100, 1000, 5000] {
        let doc = create_inventory(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("query_{}", size), |b| {
            b.iter(|| apply_filter(&doc, "tbody tr", black_box("jan")))
        });

        group.bench_function(format!("clear_{}", size), |b| {
            b.iter(|| apply_filter(&doc, "tbody tr", black_box("")))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_row_matches, bench_apply_filter);
criterion_main!(benches);
