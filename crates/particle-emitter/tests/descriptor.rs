//! Descriptor parsing and over-time curves

use particle_emitter::{
    EmitterDescriptor, OverTimeTables, ParticleOrder, ScalarRange, SeededRandom, TrailType,
    Vec3Range, virtual_seed,
};
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test]
fn test_empty_curves_are_neutral() {
    let tables = OverTimeTables::default();
    for ratio in [0.0, 0.3, 1.0] {
        let appearance = tables.evaluate(ratio, virtual_seed(5, 3));
        assert_eq!(appearance.color, [1.0, 1.0, 1.0]);
        assert_eq!(appearance.opacity, 1.0);
        assert_eq!(appearance.rotation, 0.0);
        assert_eq!(appearance.scale, 1.0);
    }
}

#[test]
fn test_single_entry_ignores_ratio() {
    let tables = OverTimeTables::default()
        .with_scale(vec![ScalarRange::scalar(0.5, 2.0)])
        .with_color(vec![Vec3Range::new([0.0, 0.0, 0.0], [1.0, 0.5, 0.25])]);
    let seed = virtual_seed(9, 17);
    let start = tables.evaluate(0.0, seed);
    let end = tables.evaluate(1.0, seed);
    assert_eq!(start, end);
    assert!((0.5..=2.0).contains(&start.scale));
}

#[test]
fn test_segment_endpoints_share_draws() {
    let curve = OverTimeTables::default()
        .with_opacity(vec![ScalarRange::scalar(0.0, 1.0), ScalarRange::scalar(0.0, 1.0)]);
    // Identical ranges at both ends give a flat line
    let seed = virtual_seed(1, 2);
    let a = curve.evaluate(0.1, seed).opacity;
    let b = curve.evaluate(0.9, seed).opacity;
    assert_eq!(a, b);

    let mut rng = SeededRandom::new();
    let direct = ScalarRange::scalar(0.0, 1.0).sample_scalar(&mut rng, seed);
    assert_eq!(a, direct);
}

#[test_case("newest", ParticleOrder::NewestLast ; "newest")]
#[test_case("oldest", ParticleOrder::OldestLast ; "oldest")]
#[test_case("original", ParticleOrder::Cyclic ; "original")]
#[test_case("sideways", ParticleOrder::Cyclic ; "unknown")]
fn test_particle_order_names(name: &str, expected: ParticleOrder) {
    let descriptor = EmitterDescriptor {
        particle_order: name.to_string(),
        ..Default::default()
    };
    assert_eq!(descriptor.into_config().unwrap().particle_order, expected);
}

#[test]
fn test_over_time_slots_truncate_and_pad() {
    let descriptor = EmitterDescriptor {
        over_time_slots: 3,
        color: "red, lime, blue, white".to_string(),
        opacity: "1".to_string(),
        ..Default::default()
    };
    let config = descriptor.into_config().unwrap();
    assert_eq!(config.curves.lengths(), [3, 1, 0, 0]);

    let packed = config.curves.pack_color_opacity();
    assert_eq!(packed.len(), 6);
    assert_eq!(packed[0], [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(packed[4], [0.0, 0.0, 1.0, 1.0]);
    assert_eq!(config.curves.pack_rotation_scale().len(), 3);
}

#[test]
fn test_trail_lifetime_defaults_to_lifetime() {
    let descriptor = EmitterDescriptor {
        lifetime: "2..4".to_string(),
        trail_interval: 0.5,
        trail_type: "ribbon".to_string(),
        ..Default::default()
    };
    let config = descriptor.into_config().unwrap();
    assert_eq!(config.trail_lifetime, ScalarRange::scalar(2.0, 4.0));
    assert_eq!(config.trail_type, TrailType::Ribbon);
}

#[cfg(feature = "serde-support")]
mod serde_support {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_descriptor_from_partial_json() {
        let json = r##"{ "spawn_rate": 40, "lifetime": "0.5..1", "color": "#ff0000, black" }"##;
        let descriptor: EmitterDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.spawn_rate, 40.0);
        assert_eq!(descriptor.seed, -1);

        let config = descriptor.into_config().unwrap();
        assert_eq!(config.curves.lengths()[0], 2);
    }

    #[test]
    fn test_descriptor_json_roundtrip() {
        let descriptor = EmitterDescriptor {
            spawn_type: "burst".to_string(),
            velocity: "0 1 0..0 2 0".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&descriptor).unwrap();
        let back: EmitterDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }
}
