use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::OnceCell;
use spiralsim_simulation::config::GalaxyConfig;
use spiralsim_simulation::{generator, Galaxy, Schedule};

static CONFIG_15K: OnceCell<GalaxyConfig> = OnceCell::new();
static CONFIG_30K: OnceCell<GalaxyConfig> = OnceCell::new();

fn config_15k() -> &'static GalaxyConfig {
    CONFIG_15K.get_or_init(GalaxyConfig::default)
}

fn config_30k() -> &'static GalaxyConfig {
    CONFIG_30K.get_or_init(|| GalaxyConfig {
        count: 30000,
        ..Default::default()
    })
}

const SCHEDULES: [(&str, Schedule); 2] = [
    ("sequential", Schedule::Sequential),
    ("parallel", Schedule::Parallel),
];

fn generate(c: &mut Criterion) {
    for (name, schedule) in SCHEDULES {
        c.bench_function(&format!("generate 15k {}", name), |b| {
            b.iter(|| generator::generate(config_15k(), 1, schedule))
        });
    }
}

fn update(c: &mut Criterion) {
    for (name, schedule) in SCHEDULES {
        let mut galaxy = Galaxy::new(*config_15k(), schedule, 1);
        c.bench_function(&format!("step 15k {}", name), |b| b.iter(|| galaxy.update(1.0 / 60.0)));

        let mut galaxy = Galaxy::new(*config_30k(), schedule, 1);
        c.bench_function(&format!("step 30k {}", name), |b| b.iter(|| galaxy.update(1.0 / 60.0)));
    }
}

criterion_group!(galaxy, generate, update);
criterion_main!(galaxy);
