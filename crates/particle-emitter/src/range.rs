//! Per-attribute `[min, max]` ranges and their textual syntax
//!
//! A range is written `"a b c..d e f"`: the part before `..` is the minimum,
//! the part after is the maximum. A missing maximum copies the minimum, and a
//! missing or unparseable component takes the caller's default.

use glam::Vec3;

use crate::random::SeededRandom;

/// An N-component `[min, max]` range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpec<const N: usize> {
    /// Lower corner
    pub min: [f32; N],
    /// Upper corner
    pub max: [f32; N],
}

/// Scalar range
pub type ScalarRange = RangeSpec<1>;
/// Three-component range
pub type Vec3Range = RangeSpec<3>;

impl<const N: usize> RangeSpec<N> {
    /// Range with identical min and max
    pub const fn fixed(value: [f32; N]) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Range from explicit corners
    pub const fn new(min: [f32; N], max: [f32; N]) -> Self {
        Self { min, max }
    }

    /// Parse `"min..max"`, filling gaps from `default`
    pub fn parse(text: &str, default: [f32; N]) -> Self {
        let mut parts = text.splitn(2, "..");
        let min = parts
            .next()
            .map_or(default, |part| parse_components(part, default));
        let max = match parts.next() {
            Some(part) if !part.trim().is_empty() => parse_components(part, default),
            _ => min,
        };
        Self { min, max }
    }

    /// Parse a comma separated list of ranges
    pub fn parse_list(text: &str, default: [f32; N]) -> Vec<Self> {
        text.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| Self::parse(entry, default))
            .collect()
    }

    /// True when min equals max on every component
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    /// Largest absolute value any sample can take, per component
    pub fn max_abs(&self) -> [f32; N] {
        std::array::from_fn(|i| self.min[i].abs().max(self.max[i].abs()))
    }

    /// True when every component of both corners is zero
    pub fn is_zero(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|v| *v == 0.0)
    }

    /// Sample one value: one random draw per component
    pub fn sample(&self, rng: &mut SeededRandom, seed: f64) -> [f32; N] {
        std::array::from_fn(|i| rng.next_range(seed, self.min[i], self.max[i]))
    }
}

impl ScalarRange {
    /// Scalar range from two values
    pub const fn scalar(min: f32, max: f32) -> Self {
        Self {
            min: [min],
            max: [max],
        }
    }

    /// Lower bound
    pub fn lo(&self) -> f32 {
        self.min[0]
    }

    /// Upper bound
    pub fn hi(&self) -> f32 {
        self.max[0]
    }

    /// Sample a single value
    pub fn sample_scalar(&self, rng: &mut SeededRandom, seed: f64) -> f32 {
        self.sample(rng, seed)[0]
    }
}

impl Vec3Range {
    /// Sample as a vector
    pub fn sample_vec3(&self, rng: &mut SeededRandom, seed: f64) -> Vec3 {
        Vec3::from_array(self.sample(rng, seed))
    }
}

impl<const N: usize> Default for RangeSpec<N> {
    fn default() -> Self {
        Self::fixed([0.0; N])
    }
}

fn parse_components<const N: usize>(text: &str, default: [f32; N]) -> [f32; N] {
    let mut out = default;
    for (slot, token) in out.iter_mut().zip(text.split_whitespace()) {
        match token.parse::<f32>() {
            Ok(value) if value.is_finite() => *slot = value,
            _ => log::debug!("Ignoring unparseable range component '{}'", token),
        }
    }
    out
}

/// Shape used for radial motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum RadialType {
    /// Radial terms act in the XY plane
    #[default]
    Circle,
    /// Radial terms act in all three axes
    Sphere,
}

impl RadialType {
    /// Parse from descriptor text, defaulting to circle
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "sphere" => Self::Sphere,
            _ => Self::Circle,
        }
    }
}

/// Per-particle ranges sampled once at spawn
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRangeTable {
    /// Spawn offset
    pub position: Vec3Range,
    /// Linear velocity
    pub velocity: Vec3Range,
    /// Linear acceleration
    pub acceleration: Vec3Range,
    /// Radial offset from the emitter origin
    pub radial_position: ScalarRange,
    /// Radial velocity
    pub radial_velocity: ScalarRange,
    /// Radial acceleration
    pub radial_acceleration: ScalarRange,
    /// Plane or sphere for the radial terms
    pub radial_type: RadialType,
    /// Angular velocity around the emitter (degrees per second)
    pub angular_velocity: Vec3Range,
    /// Angular acceleration around the emitter (degrees per second squared)
    pub angular_acceleration: Vec3Range,
    /// Orbital velocity (degrees per second)
    pub orbital_velocity: ScalarRange,
    /// Orbital acceleration (degrees per second squared)
    pub orbital_acceleration: ScalarRange,
}

impl Default for ParameterRangeTable {
    fn default() -> Self {
        Self {
            position: Vec3Range::default(),
            velocity: Vec3Range::default(),
            acceleration: Vec3Range::default(),
            radial_position: ScalarRange::default(),
            radial_velocity: ScalarRange::default(),
            radial_acceleration: ScalarRange::default(),
            radial_type: RadialType::Circle,
            angular_velocity: Vec3Range::default(),
            angular_acceleration: Vec3Range::default(),
            orbital_velocity: ScalarRange::default(),
            orbital_acceleration: ScalarRange::default(),
        }
    }
}

impl ParameterRangeTable {
    /// True when any rotational term can move a particle around the origin
    pub fn has_rotation(&self) -> bool {
        !(self.angular_velocity.is_zero()
            && self.angular_acceleration.is_zero()
            && self.orbital_velocity.is_zero()
            && self.orbital_acceleration.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::virtual_seed;

    #[test]
    fn test_parse_fixed_value() {
        let r = Vec3Range::parse("1 2 3", [0.0; 3]);
        assert_eq!(r.min, [1.0, 2.0, 3.0]);
        assert_eq!(r.max, [1.0, 2.0, 3.0]);
        assert!(r.is_fixed());
    }

    #[test]
    fn test_parse_min_max() {
        let r = Vec3Range::parse("1 2 3..4 5 6", [0.0; 3]);
        assert_eq!(r.min, [1.0, 2.0, 3.0]);
        assert_eq!(r.max, [4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_parse_missing_components_use_default() {
        let r = Vec3Range::parse("1..2", [7.0, 8.0, 9.0]);
        assert_eq!(r.min, [1.0, 8.0, 9.0]);
        assert_eq!(r.max, [2.0, 8.0, 9.0]);
    }

    #[test]
    fn test_parse_garbage_falls_back() {
        let r = Vec3Range::parse("x 2 nan..4 y", [-1.0, -2.0, -3.0]);
        assert_eq!(r.min, [-1.0, 2.0, -3.0]);
        assert_eq!(r.max, [4.0, -2.0, -3.0]);

        let empty = ScalarRange::parse("", [5.0]);
        assert_eq!(empty, ScalarRange::scalar(5.0, 5.0));
    }

    #[test]
    fn test_parse_trailing_dots_copies_min() {
        let r = ScalarRange::parse("3..", [0.0]);
        assert_eq!(r, ScalarRange::scalar(3.0, 3.0));
    }

    #[test]
    fn test_parse_list() {
        let list = ScalarRange::parse_list("0..1, 2 ,, 3..4", [0.0]);
        assert_eq!(
            list,
            vec![
                ScalarRange::scalar(0.0, 1.0),
                ScalarRange::scalar(2.0, 2.0),
                ScalarRange::scalar(3.0, 4.0),
            ]
        );
    }

    #[test]
    fn test_sample_within_range() {
        let r = Vec3Range::parse("-1 0 10..1 0 20", [0.0; 3]);
        let mut rng = SeededRandom::new();
        for id in 0..100 {
            rng.reset();
            let v = r.sample_vec3(&mut rng, virtual_seed(1, id));
            assert!((-1.0..=1.0).contains(&v.x));
            assert_eq!(v.y, 0.0);
            assert!((10.0..=20.0).contains(&v.z));
        }
    }

    #[test]
    fn test_sample_uses_one_draw_per_component() {
        let r = Vec3Range::parse("0..1", [0.0; 3]);
        let mut rng = SeededRandom::new();
        let _ = r.sample(&mut rng, 0.25);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_has_rotation() {
        let mut table = ParameterRangeTable::default();
        assert!(!table.has_rotation());
        table.orbital_velocity = ScalarRange::scalar(0.0, 90.0);
        assert!(table.has_rotation());
    }

    #[test]
    fn test_radial_type_from_name() {
        assert_eq!(RadialType::from_name("Sphere"), RadialType::Sphere);
        assert_eq!(RadialType::from_name("circle"), RadialType::Circle);
        assert_eq!(RadialType::from_name("cube"), RadialType::Circle);
    }
}
