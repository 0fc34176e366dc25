use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use gridiron_core::observation::encode_observation;
use gridiron_core::policy::{ActionSource, FormationChaser};
use gridiron_core::{Action, SimConfig, SimulationContext};

fn bench_step(c: &mut Criterion) {
    let cfg = SimConfig::default();

    c.bench_function("step_idle", |b| {
        let mut ctx = SimulationContext::new(cfg.clone(), 42).unwrap();
        let action = Action::idle(ctx.num_players());
        b.iter(|| {
            if ctx.is_truncated() {
                ctx.reset(42);
            }
            black_box(ctx.step(&action).unwrap());
            ctx.drain_events();
        })
    });

    c.bench_function("step_chaser_with_snapshot", |b| {
        let mut ctx = SimulationContext::new(cfg.clone(), 7).unwrap();
        let mut policy = FormationChaser::new().with_ability("overdrive");
        b.iter(|| {
            if ctx.is_truncated() {
                ctx.reset(7);
            }
            let action = policy.act(ctx.state(), ctx.config());
            ctx.step(&action).unwrap();
            black_box(ctx.snapshot().to_json().unwrap());
            ctx.drain_events();
        })
    });

    c.bench_function("match_200_ticks", |b| {
        b.iter_batched(
            || SimulationContext::new(cfg.clone(), 3).unwrap(),
            |mut ctx| {
                let mut policy = FormationChaser::new();
                for _ in 0..200 {
                    let action = policy.act(ctx.state(), ctx.config());
                    ctx.step(&action).unwrap();
                    ctx.drain_events();
                }
                black_box(encode_observation(ctx.state(), ctx.config()))
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
