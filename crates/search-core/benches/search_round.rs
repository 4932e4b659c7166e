use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use search_core::{
    AreaGeometry, AreaId, Cell, SearchExecutor, SearchSession, SessionConfig, TargetLocation,
    UniformEffectiveness,
};

fn bench_full_round(seed: u64) {
    let mut session = SearchSession::with_target(
        SessionConfig::floorplan(),
        TargetLocation::new(AreaId::new(4), Cell::new(10, 10)),
        UniformEffectiveness::default(),
        SmallRng::seed_from_u64(seed),
    )
    .expect("session");
    let _ = black_box(session.submit_area_pair(AreaId::new(1), AreaId::new(2)));
}

fn search_round_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_round");
    for seed in [7u64, 42, 1337] {
        group.bench_function(format!("floorplan_round_{seed}"), |b| {
            b.iter(|| bench_full_round(seed))
        });
    }

    let geometry = AreaGeometry::floorplan();
    let largest = geometry.get(AreaId::new(2)).expect("area 2");
    let target = TargetLocation::new(AreaId::new(2), Cell::new(0, 0));
    let mut rng = SmallRng::seed_from_u64(9);
    group.bench_function("executor_area2_e0.9", |b| {
        b.iter(|| black_box(SearchExecutor::search(largest, 0.9, &target, &mut rng)))
    });
    group.finish();
}

criterion_group!(benches, search_round_bench);
criterion_main!(benches);
