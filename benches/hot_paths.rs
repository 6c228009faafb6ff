//! Hot path benchmarks for the EMF aggregator.
//!
//! Run with: `cargo bench --bench hot_paths`
//! Compare baselines: `cargo bench --bench hot_paths -- --baseline main`
//!
//! These benchmarks measure record (key normalization + directive upsert)
//! and render (JSON serialization of every group).

use aws_emf::emf::{Aggregator, Dimensions, DimensionKeyEncoder, MetricDefinition, Options};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn dimensions(count: usize) -> Dimensions {
    (0..count)
        .map(|i| (format!("dim{}", i), format!("value{}", i)))
        .collect()
}

/// Benchmark DimensionKeyEncoder::encode with various dimension counts
fn bench_key_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_encode");
    group.throughput(Throughput::Elements(1));

    for dim_count in [0, 1, 4, 16] {
        let dims = dimensions(dim_count);
        group.bench_function(format!("dims_{}", dim_count), |b| {
            b.iter(|| DimensionKeyEncoder::encode(black_box("ns"), black_box(&dims)))
        });
    }

    group.finish();
}

/// Benchmark Aggregator::record overwriting an existing metric
fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");
    group.throughput(Throughput::Elements(1));

    for dim_count in [0, 4] {
        let dims = dimensions(dim_count);
        let metric = MetricDefinition::new("latency").with_unit("Milliseconds");

        group.bench_function(format!("dims_{}", dim_count), |b| {
            let agg = Aggregator::new(Options::fixed(0));
            let mut value = 0i64;
            b.iter(|| {
                value += 1;
                agg.record(black_box("ns"), metric.clone(), black_box(&dims), value)
            })
        });
    }

    // Many metrics in one group: upsert scans the directive's metric list
    let dims = dimensions(2);
    let metrics: Vec<MetricDefinition> = (0..50)
        .map(|i| MetricDefinition::new(format!("metric{}", i)))
        .collect();
    group.bench_function("metrics_50", |b| {
        let agg = Aggregator::new(Options::fixed(0));
        b.iter(|| {
            for (i, metric) in metrics.iter().enumerate() {
                agg.record("ns", metric.clone(), &dims, i as i64);
            }
        })
    });

    group.finish();
}

/// Benchmark Aggregator::render across group counts
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for group_count in [1, 10, 100] {
        let agg = Aggregator::new(Options::fixed(0));
        for g in 0..group_count {
            let mut dims = dimensions(2);
            dims.insert("host".to_string(), format!("web{:03}", g));
            for m in 0..5 {
                agg.record("ns", MetricDefinition::new(format!("m{}", m)), &dims, m);
            }
        }

        group.throughput(Throughput::Elements(group_count as u64));
        group.bench_function(format!("groups_{}", group_count), |b| {
            b.iter(|| black_box(agg.render()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_key_encode, bench_record, bench_render);
criterion_main!(benches);
