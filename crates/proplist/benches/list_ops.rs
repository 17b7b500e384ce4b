//! Benchmarks for list notification paths.
//!
//! Compares one bulk `add_range` against the same elements added one by
//! one, and measures descriptor enumeration for inspector refreshes.
//!
//! Run with: cargo bench -p proplist --bench list_ops

use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use proplist::{Describable, ObservableList};

// =============================================================================
// Bulk vs. single adds
// =============================================================================

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("list/add");

    for n in [16u64, 256, 4096] {
        group.throughput(Throughput::Elements(n));
        group.bench_with_input(BenchmarkId::new("add_range", n), &n, |b, &n| {
            b.iter(|| {
                let list: ObservableList<u64> = ObservableList::new();
                let hits = Rc::new(Cell::new(0u64));
                let h = Rc::clone(&hits);
                let _sub = list.subscribe_collection(move |_| h.set(h.get() + 1));
                list.add_range(0..n);
                black_box(hits.get())
            })
        });
        group.bench_with_input(BenchmarkId::new("add_each", n), &n, |b, &n| {
            b.iter(|| {
                let list: ObservableList<u64> = ObservableList::new();
                let hits = Rc::new(Cell::new(0u64));
                let h = Rc::clone(&hits);
                let _sub = list.subscribe_collection(move |_| h.set(h.get() + 1));
                for v in 0..n {
                    list.add(v);
                }
                black_box(hits.get())
            })
        });
    }

    group.finish();
}

// =============================================================================
// Descriptor enumeration
// =============================================================================

fn bench_properties(c: &mut Criterion) {
    let mut group = c.benchmark_group("list/properties");

    for n in [16u64, 256, 4096] {
        let list: ObservableList<u64> = (0..n).collect();
        group.throughput(Throughput::Elements(n));
        group.bench_with_input(BenchmarkId::new("enumerate", n), &list, |b, list| {
            b.iter(|| black_box(list.properties().len()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_add, bench_properties);
criterion_main!(benches);
