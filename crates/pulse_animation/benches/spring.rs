use criterion::{criterion_group, criterion_main, Criterion};
use pulse_animation::Spring;

fn bench_spring_step(c: &mut Criterion) {
    let names: Vec<String> = (0..16).map(|i| format!("field{i}")).collect();

    c.bench_function("spring_step_16_fields", |b| {
        let mut spring = Spring::new(names.iter().map(|name| (name.clone(), 0.0)));
        for name in &names {
            spring.set(name, 100.0);
        }

        b.iter(|| {
            // Keep every field in flight so each step does full integration.
            if !spring.has_active_transitions() {
                for name in &names {
                    spring.set_immediate(name, 0.0);
                    spring.set(name, 100.0);
                }
            }
            spring.step()
        });
    });
}

criterion_group!(benches, bench_spring_step);
criterion_main!(benches);
