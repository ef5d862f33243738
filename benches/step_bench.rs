use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use galaxy_sim::{Config, World};

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");
    group.sample_size(20);

    for stars in [1_000, 10_000] {
        let config = Config {
            stars,
            ..Config::default()
        };
        let mut world = World::new(config).expect("world init");
        // Warmup so the first tree build and pool wakeup are not measured.
        world.step(1.0 / 60.0);

        group.throughput(Throughput::Elements(stars as u64));
        group.bench_function(format!("{stars}_stars"), |b| {
            b.iter(|| world.step(1.0 / 60.0));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
