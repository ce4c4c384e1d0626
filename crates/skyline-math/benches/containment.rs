use std::f64::consts::TAU;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use skyline_math::*;

fn measured_horizon(count: usize) -> SphericalPolygon {
    let vertices = (0..count)
        .map(|i| {
            let az = i as f64 * TAU / count as f64;
            let alt = 4.0 + 3.0 * (5.0 * az).sin() + 1.5 * (17.0 * az).cos();
            direction_from_azalt(az, alt.to_radians())
        })
        .collect();
    SphericalPolygon::new(vertices, NADIR).expect("horizon has enough vertices")
}

fn bench_contains_360(c: &mut Criterion) {
    let poly = measured_horizon(360);
    let query = black_box(direction_from_azalt(1.1, 0.05));
    c.bench_function("polygon_contains_360", |bencher| {
        bencher.iter(|| black_box(poly.contains(query)))
    });
}

fn bench_contains_zenith_detour(c: &mut Criterion) {
    let poly = measured_horizon(360);
    c.bench_function("polygon_contains_zenith", |bencher| {
        bencher.iter(|| black_box(poly.contains(black_box(ZENITH))))
    });
}

fn bench_azalt_roundtrip(c: &mut Criterion) {
    let dir = black_box(direction_from_azalt(2.3, 0.4));
    c.bench_function("azalt_from_direction", |bencher| {
        bencher.iter(|| black_box(azalt_from_direction(dir)))
    });
}

criterion_group!(
    benches,
    bench_contains_360,
    bench_contains_zenith_detour,
    bench_azalt_roundtrip
);
criterion_main!(benches);
