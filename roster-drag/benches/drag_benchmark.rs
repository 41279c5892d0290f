use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use roster_core::ActorId;
use roster_drag::{Aabb, ContainerId, DragSession, DropTargets, Point};
use std::hint::black_box;

/// Two columns of `rows` rows each, 32 px tall.
fn make_targets(rows: usize) -> DropTargets {
    let mut t = DropTargets::new();
    let height = rows as f32 * 32.0;
    t.insert_container(ContainerId::Members, Aabb::from_rect(0.0, 0.0, 240.0, height));
    t.insert_container(ContainerId::Available, Aabb::from_rect(320.0, 0.0, 240.0, height));
    for i in 0..rows {
        let y = i as f32 * 32.0;
        t.insert_item(ActorId::new(), ContainerId::Members, Aabb::from_rect(0.0, y, 240.0, 32.0));
        t.insert_item(ActorId::new(), ContainerId::Available, Aabb::from_rect(320.0, y, 240.0, 32.0));
    }
    t
}

/// Benchmark: nearest-center lookup on a populated board
fn bench_closest_center(c: &mut Criterion) {
    let mut group = c.benchmark_group("closest_center");

    for rows in [50, 500] {
        let targets = make_targets(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            b.iter(|| targets.closest_center(black_box(Point::new(400.0, 123.0))).map(|t| t.container));
        });
    }

    group.finish();
}

/// Benchmark: full pointer gesture, press → drag → drop
fn bench_gesture(c: &mut Criterion) {
    let targets = make_targets(100);
    let actor = ActorId::new();

    c.bench_function("pointer_gesture", |b| {
        b.iter(|| {
            let mut s = DragSession::default();
            s.pointer_down(actor, Point::new(400.0, 16.0));
            for step in 0..10 {
                s.pointer_move(Point::new(400.0 - step as f32 * 30.0, 16.0));
            }
            s.pointer_up(Point::new(120.0, 16.0), &targets, |_| false)
        })
    });
}

criterion_group!(benches, bench_closest_center, bench_gesture);
criterion_main!(benches);
