use criterion::{criterion_group, criterion_main, Criterion};
use weaving_mazes::{
    builder::Builder,
    generators::Generator,
    units::{ColumnsCount, RowsCount},
    utils::maze_rng,
};

fn bench_builder_64(c: &mut Criterion) {
    let mut rng = maze_rng(Some(64));
    c.bench_function("builder_64", move |b| {
        b.iter(|| {
            let generator = Generator::random(&mut rng);
            Builder::new(RowsCount(64), ColumnsCount(64), generator)
                .build_with_rng(&mut rng)
                .expect("build failed")
        })
    });
}

criterion_group!(benches, bench_builder_64);
criterion_main!(benches);
