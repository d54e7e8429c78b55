//! Benchmarks for notification dispatch.
//!
//! Run with: cargo bench -p mvvm-core --bench dispatch

use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mvvm_core::{EventStream, Observation, ObservableValue};

const OBSERVER_COUNTS: [usize; 4] = [1, 8, 64, 512];

fn bench_value_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("value/set");

    for n in OBSERVER_COUNTS {
        group.throughput(Throughput::Elements(n as u64));
        let value = ObservableValue::new(0u64);
        let sink = Rc::new(Cell::new(0u64));
        let _observations: Vec<Observation> = (0..n)
            .map(|_| {
                let sink = Rc::clone(&sink);
                value.observe(move |_, new| sink.set(sink.get().wrapping_add(*new)))
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &value, |b, value| {
            let mut i = 0u64;
            b.iter(|| {
                i += 1;
                value.set(black_box(i));
            })
        });
    }

    group.finish();
}

fn bench_value_set_filtered(c: &mut Criterion) {
    let mut group = c.benchmark_group("value/set_unchanged_filtered");

    for n in OBSERVER_COUNTS {
        group.throughput(Throughput::Elements(n as u64));
        let value = ObservableValue::new(7u64);
        let _observations: Vec<Observation> = (0..n)
            .map(|_| value.observe_new_value(|v| {
                black_box(v);
            }))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &value, |b, value| {
            b.iter(|| value.set(black_box(7)))
        });
    }

    group.finish();
}

fn bench_stream_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream/emit");

    for n in OBSERVER_COUNTS {
        group.throughput(Throughput::Elements(n as u64));
        let stream = EventStream::new();
        let _observations: Vec<Observation> = (0..n)
            .map(|_| stream.observe(|v: &u64| {
                black_box(v);
            }))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &stream, |b, stream| {
            b.iter(|| stream.emit(black_box(1)))
        });
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let value = ObservableValue::new(0u32);
    c.bench_function("value/observe_drop_notify", |b| {
        b.iter(|| {
            let observation = value.observe_value(|v| {
                black_box(v);
            });
            drop(observation);
            value.set(black_box(1));
        })
    });
}

criterion_group!(
    benches,
    bench_value_set,
    bench_value_set_filtered,
    bench_stream_emit,
    bench_churn
);
criterion_main!(benches);
