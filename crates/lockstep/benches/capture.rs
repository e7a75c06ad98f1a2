use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lockstep::drivers::{Batch, Next};
use lockstep::followers::{Before, ClosestBefore};
use lockstep::{Discard, DriverCaptor, FollowerCaptor, Synchronizer};

const FRAMES: u64 = 100_000;

fn bench_single_captor(c: &mut Criterion) {
    let mut group = c.benchmark_group("captor");
    group.throughput(Throughput::Elements(FRAMES));

    group.bench_function("next_inject_capture", |b| {
        b.iter(|| {
            let mut captor = DriverCaptor::new(Next::new());
            let mut sink = Discard;
            for i in 0..FRAMES as i64 {
                captor.inject(black_box(i));
                let result = captor.capture(&mut sink);
                black_box(result);
            }
        });
    });

    group.finish();
}

fn bench_group_capture(c: &mut Criterion) {
    let mut group_bench = c.benchmark_group("group");
    group_bench.throughput(Throughput::Elements(FRAMES));

    group_bench.bench_function("batch_before_poll_loop", |b| {
        b.iter(|| {
            let mut group = (
                DriverCaptor::new(Batch::new(4).unwrap()),
                FollowerCaptor::new(Before::<i64>::new(0)),
            );
            let mut sinks = (Discard, Discard);

            for i in 0..FRAMES as i64 {
                group.0.inject(i);
                group.1.inject(i);
                let result = Synchronizer::capture(&mut group, &mut sinks);
                black_box(result);
            }
        });
    });

    group_bench.bench_function("next_closest_before_poll_loop", |b| {
        b.iter(|| {
            let mut group = (
                DriverCaptor::new(Next::new()),
                FollowerCaptor::new(ClosestBefore::<i64>::new(0, 8).unwrap()),
            );
            let mut sinks = (Discard, Discard);

            for i in 0..FRAMES as i64 {
                group.0.inject(i * 2);
                group.1.inject(i * 2 + 1);
                let result = Synchronizer::capture(&mut group, &mut sinks);
                black_box(result);
            }
        });
    });

    group_bench.finish();
}

criterion_group!(benches, bench_single_captor, bench_group_capture);
criterion_main!(benches);
