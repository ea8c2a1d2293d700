use std::hint::black_box;

use bsp_region::{BspTree, BuildConfig, random_aabb, random_elements};
use criterion::{Bencher, BenchmarkId, Criterion, criterion_group, criterion_main};
use glam::Vec2;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

const COUNT: usize = 10_000;

/// Lower-corner spread of the generated boxes; smaller is denser.
const WIDTHS: [f32; 3] = [10_000.0, 100.0, 1.0];

fn build(bencher: &mut Bencher<'_>, width: &f32) {
    fastrand::seed(7);
    let elements = random_elements(COUNT, *width);
    let config = BuildConfig::default();

    bencher.iter(|| BspTree::build(black_box(elements.clone()), &config));
}

fn region_queries(bencher: &mut Bencher<'_>, width: &f32) {
    fastrand::seed(7);
    let tree = BspTree::build(random_elements(COUNT, *width), &BuildConfig::default())
        .expect("default config is valid");
    let targets = random_elements(COUNT, *width);

    bencher.iter(|| {
        (0..COUNT).into_par_iter().for_each(|i| {
            for hit in tree.candidates(&targets[i]) {
                black_box(hit);
            }
        });
    });
}

fn point_queries(bencher: &mut Bencher<'_>, width: &f32) {
    fastrand::seed(7);
    let tree = BspTree::build(random_elements(COUNT, *width), &BuildConfig::default())
        .expect("default config is valid");
    let points: Vec<Vec2> = (0..COUNT).map(|_| random_aabb(*width).mid()).collect();

    bencher.iter(|| {
        for point in &points {
            black_box(tree.query_point_ids(*point));
        }
    });
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("bsp");

    for width in WIDTHS {
        group.bench_with_input(BenchmarkId::new("build", width), &width, build);
        group.bench_with_input(BenchmarkId::new("region", width), &width, region_queries);
        group.bench_with_input(BenchmarkId::new("point", width), &width, point_queries);
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
