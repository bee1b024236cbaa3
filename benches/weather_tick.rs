use criterion::{criterion_group, criterion_main, Criterion, black_box};

use glam::Vec3;

use squall::math::Aabb;
use squall::weather::{Collaborators, FogParams};
use squall::zone::BoundsOverlap;
use squall::{WeatherConfig, WeatherKind, WeatherSystem, ZoneRegistry, ZoneVolume};

fn band(min_x: f32, max_x: f32) -> Aabb {
    Aabb::new(Vec3::new(min_x, -100.0, -100.0), Vec3::new(max_x, 100.0, 100.0))
}

fn system_with_zones(count: usize) -> WeatherSystem {
    let zones = ZoneRegistry::from_volumes((0..count).map(|i| {
        let kind = if i % 2 == 0 { WeatherKind::Rain } else { WeatherKind::Snow };
        let x = i as f32 * 20.0;
        ZoneVolume::new(kind, 0.8, band(x, x + 15.0)).unwrap()
    }));
    let collaborators = Collaborators {
        fog: Some(Box::new(FogParams::default())),
        overlap: Some(Box::new(BoundsOverlap)),
        ..Default::default()
    };
    WeatherSystem::new(WeatherConfig::default(), zones, collaborators).unwrap()
}

fn bench_tick_walk(c: &mut Criterion) {
    let mut system = system_with_zones(64);

    c.bench_function("weather_tick_walk_64_zones", |b| {
        let mut frame = 0u32;
        b.iter(|| {
            frame += 1;
            let x = (frame % 80_000) as f32 * 0.016;
            system.tick(black_box(1.0 / 60.0), black_box(Vec3::new(x, 0.0, 0.0)));
        });
    });
}

fn bench_tick_idle(c: &mut Criterion) {
    let mut system = system_with_zones(8);

    c.bench_function("weather_tick_idle", |b| {
        b.iter(|| {
            system.tick(black_box(1.0 / 60.0), black_box(Vec3::new(-50.0, 0.0, 0.0)));
        });
    });
}

criterion_group!(benches, bench_tick_walk, bench_tick_idle);
criterion_main!(benches);
