//! Analytic bounds against brute-force sampling

use glam::Vec3;
use particle_emitter::bounds::{extent_1d, max_age};
use particle_emitter::{
    BoundsEstimator, EmissionScheduler, EmitterConfig, ModelSurface, ParameterRangeTable,
    RadialType, ScalarRange, SourceMode, SurfaceMode, Vec3Range,
};
use proptest::prelude::*;

const SAMPLES: usize = 64;

fn brute_force_1d(offset: f32, velocity: f32, acceleration: f32, age: f32) -> (f32, f32) {
    (0..=SAMPLES)
        .map(|i| {
            let t = age * i as f32 / SAMPLES as f32;
            offset + velocity * t + 0.5 * acceleration * t * t
        })
        .fold((f32::MAX, f32::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

#[test]
fn test_projectile_apex() {
    let (lo, hi) = extent_1d(0.0, 5.0, -10.0, 1.0);
    assert_eq!(hi, 1.25);
    assert_eq!(lo, 0.0);
    let (_, sampled_hi) = brute_force_1d(0.0, 5.0, -10.0, 1.0);
    assert!(sampled_hi <= hi);
}

#[test]
fn test_drag_shortens_age() {
    let config = EmitterConfig {
        lifetime: ScalarRange::scalar(1.0, 2.0),
        drag: 0.5,
        ranges: ParameterRangeTable {
            velocity: Vec3Range::fixed([1.0, 0.0, 0.0]),
            ..Default::default()
        },
        ..Default::default()
    };
    let bounds = BoundsEstimator::for_config(&config).estimate();
    assert_eq!(max_age(2.0, 0.5), 1.5);
    assert_eq!(bounds.max.x, 1.5);
}

#[test]
fn test_scheduler_exposes_bounds() {
    let mut config = EmitterConfig::default();
    config.ranges.velocity = Vec3Range::new([-1.0, 0.0, 0.0], [1.0, 2.0, 0.0]);
    let scheduler = EmissionScheduler::new(config);
    let bounds = scheduler.bounds();
    assert_eq!(bounds.min, Vec3::new(-1.0, 0.0, 0.0));
    assert_eq!(bounds.max, Vec3::new(1.0, 2.0, 0.0));
}

#[test]
fn test_model_surface_widens_bounds() {
    let mut scheduler = EmissionScheduler::new(EmitterConfig {
        source: SourceMode::Model(SurfaceMode::Vertex),
        seed: 4,
        ..Default::default()
    });
    scheduler.set_model_surface(ModelSurface::new(vec![Vec3::new(10.0, 0.0, 0.0); 3]));
    assert_eq!(scheduler.bounds().max, Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(scheduler.bounds().radius, 10.0);

    scheduler.tick(0.1);
    assert!(scheduler.alive_count() > 0);
    let bounds = scheduler.bounds();
    let positions = scheduler.stream().positions();
    for index in (0..positions.len()).filter(|i| scheduler.is_slot_alive(*i)) {
        assert!(bounds.contains(positions[index]), "{:?} outside {:?}", positions[index], bounds);
    }
}

#[test]
fn test_triangle_surface_with_motion_stays_inside() {
    let mut config = EmitterConfig {
        spawn_rate: 60.0,
        source: SourceMode::Model(SurfaceMode::Triangle),
        seed: 12,
        ..Default::default()
    };
    config.ranges.velocity = Vec3Range::new([-1.0, 0.0, -1.0], [1.0, 2.0, 1.0]);
    let mut scheduler = EmissionScheduler::new(config);
    scheduler.set_model_surface(ModelSurface::new(vec![
        Vec3::new(-4.0, 1.0, 0.0),
        Vec3::new(6.0, 1.0, 0.0),
        Vec3::new(0.0, 5.0, 3.0),
    ]));
    let bounds = scheduler.bounds();
    assert_eq!(bounds.min, Vec3::new(-5.0, 1.0, -1.0));
    assert_eq!(bounds.max, Vec3::new(7.0, 7.0, 4.0));

    for _ in 0..10 {
        scheduler.tick(0.1);
    }
    let stream = scheduler.stream();
    let slack = Vec3::splat(1e-4);
    for index in (0..stream.len()).filter(|i| scheduler.is_slot_alive(*i)) {
        let p = stream.positions()[index];
        assert!((p + slack).cmpge(bounds.min).all() && (p - slack).cmple(bounds.max).all());
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    (a.min(b), a.max(b))
}

proptest! {
    #[test]
    fn prop_extent_never_underestimates(
        offset in -10.0f32..10.0,
        velocity in -10.0f32..10.0,
        acceleration in -20.0f32..20.0,
        age in 0.01f32..5.0,
    ) {
        let (lo, hi) = extent_1d(offset, velocity, acceleration, age);
        let (sampled_lo, sampled_hi) = brute_force_1d(offset, velocity, acceleration, age);
        let tolerance = 1e-3 * (1.0 + hi.abs().max(lo.abs()));
        prop_assert!(sampled_lo >= lo - tolerance, "{} < {}", sampled_lo, lo);
        prop_assert!(sampled_hi <= hi + tolerance, "{} > {}", sampled_hi, hi);
    }

    #[test]
    fn prop_box_contains_sampled_particles(
        p in (-5.0f32..5.0, -5.0f32..5.0),
        v in (-5.0f32..5.0, -5.0f32..5.0),
        a in (-10.0f32..10.0, -10.0f32..10.0),
        radial in (0.0f32..2.0, -1.0f32..1.0),
        lifetime in 0.1f32..3.0,
        mix in (0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0),
        angle in 0.0f32..std::f32::consts::TAU,
    ) {
        let (p_lo, p_hi) = ordered(p.0, p.1);
        let (v_lo, v_hi) = ordered(v.0, v.1);
        let (a_lo, a_hi) = ordered(a.0, a.1);
        let ranges = ParameterRangeTable {
            position: Vec3Range::new([p_lo; 3], [p_hi; 3]),
            velocity: Vec3Range::new([v_lo; 3], [v_hi; 3]),
            acceleration: Vec3Range::new([a_lo; 3], [a_hi; 3]),
            radial_position: ScalarRange::scalar(radial.0, radial.0),
            radial_velocity: ScalarRange::scalar(radial.1, radial.1),
            radial_type: RadialType::Circle,
            ..Default::default()
        };
        let bounds = BoundsEstimator::new(&ranges, lifetime).estimate();

        let lerp = |lo: f32, hi: f32, t: f32| lo + (hi - lo) * t;
        let offset = lerp(p_lo, p_hi, mix.0);
        let velocity = lerp(v_lo, v_hi, mix.1);
        let acceleration = lerp(a_lo, a_hi, mix.2);
        let direction = Vec3::new(angle.cos(), angle.sin(), 0.0);

        for i in 0..=SAMPLES {
            let t = lifetime * i as f32 / SAMPLES as f32;
            let linear = offset + velocity * t + 0.5 * acceleration * t * t;
            let distance = radial.0 + radial.1 * t;
            let point = Vec3::splat(linear) + direction * distance;
            let tolerance = Vec3::splat(1e-3 * (1.0 + point.abs().max_element()));
            prop_assert!(
                (point + tolerance).cmpge(bounds.min).all() && (point - tolerance).cmple(bounds.max).all(),
                "{:?} outside {:?}", point, bounds
            );
            prop_assert!(point.length() <= bounds.radius + tolerance.x * 2.0);
        }
    }
}
