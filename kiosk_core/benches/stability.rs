use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kiosk_core::{StabilityDetector, decode_weight};

fn bench_observe(c: &mut Criterion) {
    c.bench_function("stability_observe_noisy", |b| {
        let mut det = StabilityDetector::<u32>::new(4000);
        let mut now = 0u64;
        b.iter(|| {
            now += 10;
            let sample = 140 + (now / 10 % 3) as u32;
            black_box(det.observe(black_box(sample), now))
        });
    });

    c.bench_function("stability_observe_steady", |b| {
        let mut det = StabilityDetector::<f32>::new(u64::MAX);
        let mut now = 0u64;
        b.iter(|| {
            now += 10;
            black_box(det.observe(black_box(62.34), now))
        });
    });
}

fn bench_decode(c: &mut Criterion) {
    let data = [0xff, 0xff, 0x18, 0x5a];
    c.bench_function("decode_weight", |b| {
        b.iter(|| decode_weight(black_box(&data)))
    });
}

criterion_group!(benches, bench_observe, bench_decode);
criterion_main!(benches);
