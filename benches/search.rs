use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polysphere::mesh::parse_sph;
use polysphere::{search, Point};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn bench_same_polygon(c: &mut Criterion) {
    let mesh = parse_sph(fixture("two_triangles.sph")).unwrap();
    let start = Point::from_degrees(60.0, 10.0);
    let end = Point::from_degrees(30.0, 20.0);
    c.bench_function("search_same_polygon", |bencher| {
        bencher.iter(|| search(black_box(&mesh), black_box(start), black_box(end)).unwrap())
    });
}

fn bench_adjacent_polygons(c: &mut Criterion) {
    let mesh = parse_sph(fixture("two_triangles.sph")).unwrap();
    let start = Point::from_degrees(60.0, 10.0);
    let end = Point::from_degrees(60.0, 170.0);
    c.bench_function("search_adjacent_polygons", |bencher| {
        bencher.iter(|| search(black_box(&mesh), black_box(start), black_box(end)).unwrap())
    });
}

criterion_group!(benches, bench_same_polygon, bench_adjacent_polygons);
criterion_main!(benches);
