//! Benchmarks for line burning.
//!
//! Run with: cargo bench --package line-burner --bench burn_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hydro_common::{ElevationLine, GeoTransform, Point3, RasterGrid};
use line_burner::{burn_lines, trace_segment};

/// A fan of lines radiating from the raster center, with rising Z.
fn generate_lines(size: usize, count: usize) -> Vec<ElevationLine> {
    let center = size as f64 * 0.5;
    let radius = size as f64 * 0.45;
    (0..count)
        .map(|i| {
            let angle = i as f64 / count as f64 * std::f64::consts::TAU;
            ElevationLine::segment(
                Point3::new(center, -center, 10.0),
                Point3::new(
                    center + radius * angle.cos(),
                    -center + radius * angle.sin(),
                    20.0,
                ),
            )
        })
        .collect()
}

fn raster(size: usize) -> RasterGrid {
    RasterGrid::filled(size, size, 0.0, GeoTransform::north_up(0.0, 0.0, 1.0, -1.0), None)
}

// =============================================================================
// BURN BENCHMARKS
// =============================================================================

fn bench_burn_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("burn_lines");

    for size in [256, 1024, 4096] {
        let lines = generate_lines(size, 500);
        group.throughput(Throughput::Elements(lines.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut grid = raster(size);
            b.iter(|| burn_lines(black_box(&mut grid), black_box(&lines)))
        });
    }

    group.finish();
}

// =============================================================================
// TRACE BENCHMARKS
// =============================================================================

fn bench_trace_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_segment");

    group.bench_function("diagonal_1000px", |b| {
        b.iter(|| trace_segment(black_box((0.3, 0.7)), black_box((999.2, 998.9)), 1000, 1000))
    });

    group.bench_function("clipped_long_segment", |b| {
        b.iter(|| trace_segment(black_box((-1e7, 3.5)), black_box((1e7, 700.5)), 1000, 1000))
    });

    group.finish();
}

criterion_group!(benches, bench_burn_lines, bench_trace_segment);
criterion_main!(benches);
