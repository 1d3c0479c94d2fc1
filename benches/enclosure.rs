//! Benchmarks for the capture pipeline on synthetic walks.
//!
//! Run with: `cargo bench --bench enclosure --features synthetic`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use turfwalk::synthetic::{WalkScenario, WalkShape};
use turfwalk::{
    CaptureSession, GpsPoint, Polygon, TerritoryConfig, enclosed_cells,
    enclosed_cells_by_containment, simplify,
};

const ORIGIN: GpsPoint = GpsPoint {
    latitude: 51.5074,
    longitude: -0.1278,
    accuracy: None,
    timestamp: 0,
};

fn circle(radius_m: f64) -> WalkScenario {
    WalkScenario {
        shape: WalkShape::Circle { radius_m },
        ..WalkScenario::at(ORIGIN)
    }
}

// ============================================================================
// Enclosure: scanline vs per-cell containment
// ============================================================================

fn bench_enclosure(c: &mut Criterion) {
    let config = TerritoryConfig::default();
    let mut group = c.benchmark_group("enclosure");

    for radius in [25.0, 100.0, 400.0] {
        let polygon = Polygon::clean(&circle(radius).loop_outline(), config.dedup_epsilon)
            .expect("circle outline is a valid ring");

        group.bench_with_input(BenchmarkId::new("scanline", radius), &polygon, |b, p| {
            b.iter(|| enclosed_cells(black_box(p), &config));
        });
        group.bench_with_input(BenchmarkId::new("containment", radius), &polygon, |b, p| {
            b.iter(|| enclosed_cells_by_containment(black_box(p), &config));
        });
    }

    group.finish();
}

// ============================================================================
// Simplification of noisy walks
// ============================================================================

fn bench_simplify(c: &mut Criterion) {
    let config = TerritoryConfig::default();
    let mut group = c.benchmark_group("simplify");

    for radius in [50.0, 500.0] {
        let walk = WalkScenario {
            noise_sigma_m: 3.0,
            spacing_m: 2.0,
            ..circle(radius)
        }
        .generate();

        group.bench_with_input(BenchmarkId::new("rdp", walk.len()), &walk, |b, w| {
            b.iter(|| simplify(black_box(w), config.rdp_tolerance));
        });
    }

    group.finish();
}

// ============================================================================
// Full session: filter, append and detect per fix
// ============================================================================

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    let walk = WalkScenario {
        noise_sigma_m: 2.0,
        approach_m: 40.0,
        outlier_every: Some(25),
        ..circle(60.0)
    }
    .generate();

    group.bench_function(BenchmarkId::new("push_fix", walk.len()), |b| {
        b.iter(|| {
            let mut session = CaptureSession::new();
            for fix in &walk {
                black_box(session.push_fix(*fix));
            }
            session.capture_count()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_enclosure, bench_simplify, bench_session);
criterion_main!(benches);
