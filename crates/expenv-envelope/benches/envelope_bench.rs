//! Criterion benchmarks for expenv-envelope
//!
//! Run with: cargo bench -p expenv-envelope

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use expenv_envelope::{AdEnvelope, AdsrEnvelope, DecayCurve, Envelope, Timebase};

const RATES: &[(u32, u32)] = &[(64, 16384), (128, 32768), (1000, 48000)];

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sample");

    for &(control, audio) in RATES {
        let tb = Timebase::new(control, audio);
        let mut env = AdsrEnvelope::new(tb);
        env.set_levels(255, 0, 0);
        env.set_times(5, 60_000, 100);

        group.bench_with_input(
            BenchmarkId::new("adsr_tick", format!("{control}/{audio}")),
            &tb.lerps_per_control(),
            |b, &lerps| {
                env.note_on(true);
                b.iter(|| {
                    let mut sum = 0u32;
                    for _ in 0..lerps {
                        sum += u32::from(env.sample());
                    }
                    env.advance();
                    black_box(sum)
                })
            },
        );
    }

    group.finish();
}

fn bench_curves(c: &mut Criterion) {
    let mut group = c.benchmark_group("DecayCurve");

    for (name, curve) in [("soft", DecayCurve::SOFT), ("power", DecayCurve::POWER_LAW)] {
        let mut env = AdEnvelope::with_curve(Timebase::default(), curve);
        env.set_ad_levels(255, 0);
        env.set_all_update_steps(0, u32::MAX / 512);
        env.note_on(true);
        env.advance();

        group.bench_function(name, |b| {
            b.iter(|| {
                let mut sum = 0u32;
                for _ in 0..256 {
                    sum += u32::from(env.sample());
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}

fn bench_dyn_render(c: &mut Criterion) {
    let mut env: Box<dyn Envelope> = {
        let mut env = AdsrEnvelope::new(Timebase::default());
        env.set_levels(255, 128, 0);
        env.set_times(10, 60_000, 10);
        Box::new(env)
    };
    let mut block = vec![0u8; 256];
    env.note_on(true);

    c.bench_function("dyn_render_tick", |b| {
        b.iter(|| black_box(env.render_tick(&mut block)))
    });
}

criterion_group!(benches, bench_sample, bench_curves, bench_dyn_render);
criterion_main!(benches);
