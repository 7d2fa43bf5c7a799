//! Host-facing emitter description in the textual attribute syntax
//!
//! Ranges are written `"a b c..d e f"`, curves as comma separated lists of
//! ranges, and colors as hex strings or CSS names. Anything unparseable falls
//! back to the field default; only [`EmitterConfig::validate`] can fail.

use super::{
    Direction, EmitterConfig, ParticleOrder, SourceMode, SpawnType, SurfaceMode, TrailType,
};
use crate::color::parse_color_list;
use crate::curve::{DEFAULT_OVER_TIME_SLOTS, OverTimeTables};
use crate::error::Result;
use crate::range::{ParameterRangeTable, RadialType, ScalarRange, Vec3Range};

/// Emitter attributes as a host would write them
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EmitterDescriptor {
    /// `continuous` or `burst`
    pub spawn_type: String,
    /// Particles per second
    pub spawn_rate: f64,
    /// Lifetime range, e.g. `"1..2"`
    pub lifetime: String,
    /// Seconds between trail points, 0 disables trails
    pub trail_interval: f64,
    /// Trail lifetime range, empty copies `lifetime`
    pub trail_lifetime: String,
    /// `particle` or `ribbon`
    pub trail_type: String,
    /// Seconds of emission, negative for infinite
    pub duration: f64,
    /// Seconds before the first spawn
    pub delay: f64,
    /// `forward` or `backward`
    pub direction: String,
    /// `newest`, `oldest` or `original`
    pub particle_order: String,
    /// Base seed, negative for a random one
    pub seed: i64,
    /// Drag in `0..=1`
    pub drag: f32,
    /// Initial enablement
    pub enabled: bool,
    /// `local`, `entity` or `model`
    pub source: String,
    /// `vertex`, `edge` or `triangle` when `source` is `model`
    pub model_fill: String,
    /// Entries per over-time channel
    pub over_time_slots: usize,

    /// Spawn offset range
    pub position: String,
    /// Velocity range
    pub velocity: String,
    /// Acceleration range
    pub acceleration: String,
    /// Radial offset range
    pub radial_position: String,
    /// Radial velocity range
    pub radial_velocity: String,
    /// Radial acceleration range
    pub radial_acceleration: String,
    /// `circle` or `sphere`
    pub radial_type: String,
    /// Angular velocity range (degrees per second)
    pub angular_velocity: String,
    /// Angular acceleration range
    pub angular_acceleration: String,
    /// Orbital velocity range (degrees per second)
    pub orbital_velocity: String,
    /// Orbital acceleration range
    pub orbital_acceleration: String,

    /// Color over time, e.g. `"red, orange..yellow, black"`
    pub color: String,
    /// Opacity over time
    pub opacity: String,
    /// Rotation over time (degrees)
    pub rotation: String,
    /// Scale over time
    pub scale: String,
}

impl Default for EmitterDescriptor {
    fn default() -> Self {
        Self {
            spawn_type: "continuous".to_string(),
            spawn_rate: 10.0,
            lifetime: "1".to_string(),
            trail_interval: 0.0,
            trail_lifetime: String::new(),
            trail_type: "particle".to_string(),
            duration: -1.0,
            delay: 0.0,
            direction: "forward".to_string(),
            particle_order: "original".to_string(),
            seed: -1,
            drag: 0.0,
            enabled: true,
            source: "local".to_string(),
            model_fill: "triangle".to_string(),
            over_time_slots: DEFAULT_OVER_TIME_SLOTS,
            position: "0 0 0".to_string(),
            velocity: "0 0 0".to_string(),
            acceleration: "0 0 0".to_string(),
            radial_position: "0".to_string(),
            radial_velocity: "0".to_string(),
            radial_acceleration: "0".to_string(),
            radial_type: "circle".to_string(),
            angular_velocity: "0 0 0".to_string(),
            angular_acceleration: "0 0 0".to_string(),
            orbital_velocity: "0".to_string(),
            orbital_acceleration: "0".to_string(),
            color: String::new(),
            opacity: String::new(),
            rotation: String::new(),
            scale: String::new(),
        }
    }
}

impl EmitterDescriptor {
    /// Parse every field and validate the result
    pub fn into_config(&self) -> Result<EmitterConfig> {
        let config = self.parse();
        config.validate()?;
        Ok(config)
    }

    /// Parse every field without validating
    pub fn parse(&self) -> EmitterConfig {
        let lifetime = ScalarRange::parse(&self.lifetime, [1.0]);
        let trail_lifetime = if self.trail_lifetime.trim().is_empty() {
            lifetime
        } else {
            ScalarRange::parse(&self.trail_lifetime, [lifetime.hi()])
        };

        let source = match self.source.trim().to_ascii_lowercase().as_str() {
            "entity" => SourceMode::Entity,
            "model" => SourceMode::Model(SurfaceMode::from_name(&self.model_fill)),
            _ => SourceMode::Local,
        };

        let zero3 = [0.0; 3];
        let ranges = ParameterRangeTable {
            position: Vec3Range::parse(&self.position, zero3),
            velocity: Vec3Range::parse(&self.velocity, zero3),
            acceleration: Vec3Range::parse(&self.acceleration, zero3),
            radial_position: ScalarRange::parse(&self.radial_position, [0.0]),
            radial_velocity: ScalarRange::parse(&self.radial_velocity, [0.0]),
            radial_acceleration: ScalarRange::parse(&self.radial_acceleration, [0.0]),
            radial_type: RadialType::from_name(&self.radial_type),
            angular_velocity: Vec3Range::parse(&self.angular_velocity, zero3),
            angular_acceleration: Vec3Range::parse(&self.angular_acceleration, zero3),
            orbital_velocity: ScalarRange::parse(&self.orbital_velocity, [0.0]),
            orbital_acceleration: ScalarRange::parse(&self.orbital_acceleration, [0.0]),
        };

        let curves = OverTimeTables::new(self.over_time_slots)
            .with_color(parse_color_list(&self.color))
            .with_opacity(ScalarRange::parse_list(&self.opacity, [1.0]))
            .with_rotation(ScalarRange::parse_list(&self.rotation, [0.0]))
            .with_scale(ScalarRange::parse_list(&self.scale, [1.0]));

        EmitterConfig {
            spawn_type: SpawnType::from_name(&self.spawn_type),
            spawn_rate: self.spawn_rate,
            lifetime,
            trail_interval: self.trail_interval,
            trail_lifetime,
            trail_type: TrailType::from_name(&self.trail_type),
            duration: self.duration,
            delay: self.delay,
            direction: Direction::from_name(&self.direction),
            particle_order: ParticleOrder::from_name(&self.particle_order),
            seed: self.seed,
            drag: self.drag,
            enabled: self.enabled,
            source,
            ranges,
            curves,
        }
    }
}
