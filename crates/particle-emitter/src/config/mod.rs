//! Validated emitter configuration and the capacity derived from it

mod descriptor;

pub use descriptor::EmitterDescriptor;

use crate::curve::OverTimeTables;
use crate::error::{EmitterError, Result};
use crate::range::{ParameterRangeTable, ScalarRange};

/// Most slots one emitter may allocate
pub const MAX_SLOTS: usize = 1 << 20;

/// Most trail points behind one particle, bounded by the 16-bit trail index
pub const MAX_TRAIL_POINTS: usize = u16::MAX as usize + 1;

/// Spawn cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnType {
    /// Steady emission at `spawn_rate`
    #[default]
    Continuous,
    /// Whole ring at once, then wait for it to age out
    Burst,
}

impl SpawnType {
    /// Parse from descriptor text
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "burst" => Self::Burst,
            _ => Self::Continuous,
        }
    }
}

/// Playback direction of the over-time evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Age runs from spawn towards death
    #[default]
    Forward,
    /// Age runs from death towards spawn
    Backward,
}

impl Direction {
    /// Parse from descriptor text
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "backward" => Self::Backward,
            _ => Self::Forward,
        }
    }
}

/// Draw order of particles within the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum ParticleOrder {
    /// Newest particle drawn last
    NewestLast,
    /// Oldest particle drawn last
    OldestLast,
    /// Buffer order, wrapping with the ring
    #[default]
    Cyclic,
}

impl ParticleOrder {
    /// Parse from descriptor text
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "newest" | "newest-last" | "newestlast" => Self::NewestLast,
            "oldest" | "oldest-last" | "oldestlast" => Self::OldestLast,
            _ => Self::Cyclic,
        }
    }
}

/// Geometry of the trail behind each particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum TrailType {
    /// One vertex per trail point
    #[default]
    Particle,
    /// Two vertices per trail point, joined into a strip
    Ribbon,
}

impl TrailType {
    /// Parse from descriptor text
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "ribbon" => Self::Ribbon,
            _ => Self::Particle,
        }
    }
}

/// How spawn positions are picked across a model surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceMode {
    /// A random vertex
    #[default]
    Vertex,
    /// A random point on a random triangle edge
    Edge,
    /// A random point inside a random triangle
    Triangle,
}

impl SurfaceMode {
    /// Parse from descriptor text
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "edge" => Self::Edge,
            "triangle" => Self::Triangle,
            _ => Self::Vertex,
        }
    }
}

/// Space particles are spawned in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceMode {
    /// Emitter local space
    #[default]
    Local,
    /// Relative to a moving source entity, stamped per spawn
    Entity,
    /// Across the surface of a model
    Model(SurfaceMode),
}

impl SourceMode {
    /// True when ids must be issued explicitly
    pub fn needs_explicit_ids(self) -> bool {
        !matches!(self, Self::Local)
    }
}

/// Validated emitter configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterConfig {
    /// Spawn cadence
    pub spawn_type: SpawnType,
    /// Particles per second
    pub spawn_rate: f64,
    /// Particle lifetime in seconds
    pub lifetime: ScalarRange,
    /// Seconds between trail points, 0 disables trails
    pub trail_interval: f64,
    /// Lifetime of the trail points
    pub trail_lifetime: ScalarRange,
    /// Trail geometry
    pub trail_type: TrailType,
    /// Seconds of emission, negative for infinite
    pub duration: f64,
    /// Seconds before the first spawn
    pub delay: f64,
    /// Over-time playback direction
    pub direction: Direction,
    /// Draw order
    pub particle_order: ParticleOrder,
    /// Base seed, negative draws one at creation
    pub seed: i64,
    /// Drag coefficient in `0..=1`
    pub drag: f32,
    /// Initial enablement
    pub enabled: bool,
    /// Spawn space
    pub source: SourceMode,
    /// Ranges sampled per particle
    pub ranges: ParameterRangeTable,
    /// Over-time curves, sized by `curves.slots`
    pub curves: OverTimeTables,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            spawn_type: SpawnType::Continuous,
            spawn_rate: 10.0,
            lifetime: ScalarRange::scalar(1.0, 1.0),
            trail_interval: 0.0,
            trail_lifetime: ScalarRange::scalar(1.0, 1.0),
            trail_type: TrailType::Particle,
            duration: -1.0,
            delay: 0.0,
            direction: Direction::Forward,
            particle_order: ParticleOrder::Cyclic,
            seed: -1,
            drag: 0.0,
            enabled: true,
            source: SourceMode::Local,
            ranges: ParameterRangeTable::default(),
            curves: OverTimeTables::default(),
        }
    }
}

impl EmitterConfig {
    /// Longest particle lifetime
    pub fn max_lifetime(&self) -> f64 {
        f64::from(self.lifetime.lo().max(self.lifetime.hi()))
    }

    /// Longest trail lifetime
    pub fn max_trail_lifetime(&self) -> f64 {
        f64::from(self.trail_lifetime.lo().max(self.trail_lifetime.hi()))
    }

    /// True when each particle leaves a trail
    pub fn has_trails(&self) -> bool {
        self.trail_interval > 0.0
    }

    /// True when emission stops after `duration`
    pub fn is_finite(&self) -> bool {
        self.duration >= 0.0
    }

    /// Number of over-time entries per channel
    pub fn over_time_slots(&self) -> usize {
        self.curves.slots
    }

    /// Check every field, reporting the first problem found
    pub fn validate(&self) -> Result<()> {
        if !self.spawn_rate.is_finite() || self.spawn_rate <= 0.0 {
            return Err(EmitterError::InvalidConfig(format!(
                "spawn rate must be positive, got {}",
                self.spawn_rate
            )));
        }
        let max_lifetime = self.max_lifetime();
        if !max_lifetime.is_finite() || max_lifetime <= 0.0 {
            return Err(EmitterError::InvalidConfig(format!(
                "lifetime must be positive, got {:?}",
                self.lifetime
            )));
        }
        if self.lifetime.lo() < 0.0 {
            return Err(EmitterError::InvalidConfig(format!(
                "lifetime cannot be negative, got {:?}",
                self.lifetime
            )));
        }
        if !self.trail_interval.is_finite() || self.trail_interval < 0.0 {
            return Err(EmitterError::InvalidConfig(format!(
                "trail interval must be zero or positive, got {}",
                self.trail_interval
            )));
        }
        if self.has_trails() && self.max_trail_lifetime() <= 0.0 {
            return Err(EmitterError::InvalidConfig(
                "trails need a positive trail lifetime".to_string(),
            ));
        }
        if !self.duration.is_finite() {
            return Err(EmitterError::InvalidConfig(format!(
                "duration must be finite, got {}",
                self.duration
            )));
        }
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(EmitterError::InvalidConfig(format!(
                "delay must be zero or positive, got {}",
                self.delay
            )));
        }
        if !(0.0..=1.0).contains(&self.drag) {
            return Err(EmitterError::InvalidConfig(format!(
                "drag must be within 0..=1, got {}",
                self.drag
            )));
        }
        if self.curves.slots == 0 {
            return Err(EmitterError::InvalidConfig(
                "over-time slots must be at least 1".to_string(),
            ));
        }
        self.check_capacity()
    }

    /// Reject rates and trail intervals whose buffer would not fit
    fn check_capacity(&self) -> Result<()> {
        let particles = Capacity::particles_needed(self);
        if particles > MAX_SLOTS as f64 {
            return Err(EmitterError::InvalidConfig(format!(
                "{} particles alive at once exceed the limit of {} slots",
                particles, MAX_SLOTS
            )));
        }
        if self.has_trails() {
            let points = Capacity::trail_points_needed(self);
            if points > MAX_TRAIL_POINTS as f64 {
                return Err(EmitterError::InvalidConfig(format!(
                    "{} trail points per particle exceed the limit of {}",
                    points, MAX_TRAIL_POINTS
                )));
            }
        }
        let capacity = Capacity::from_config(self);
        match capacity.particle_count.checked_mul(capacity.stride()) {
            Some(count) if count <= MAX_SLOTS => Ok(()),
            _ => Err(EmitterError::InvalidConfig(format!(
                "{} particles x {} trail points x {} verts exceed the limit of {} slots",
                capacity.particle_count,
                capacity.trail_count,
                capacity.verts_per_particle,
                MAX_SLOTS
            ))),
        }
    }
}

/// Slot counts derived from a configuration
///
/// Fixed for the lifetime of a configuration: changing any of these fields
/// needs a rebuild of the attribute buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capacity {
    /// Particles alive at most at once
    pub particle_count: usize,
    /// Trail points per particle (1 without trails)
    pub trail_count: usize,
    /// Vertices per trail point (2 for ribbons)
    pub verts_per_particle: usize,
}

impl Capacity {
    /// Capacity of a validated configuration
    ///
    /// Counts are clamped to [`MAX_SLOTS`] and [`MAX_TRAIL_POINTS`];
    /// [`EmitterConfig::validate`] rejects configurations that need more.
    pub fn from_config(config: &EmitterConfig) -> Self {
        let particle_count = Self::particles_needed(config).min(MAX_SLOTS as f64) as usize;

        let (trail_count, verts_per_particle) = if config.has_trails() {
            let trail_count =
                Self::trail_points_needed(config).min(MAX_TRAIL_POINTS as f64) as usize;
            let verts = match config.trail_type {
                TrailType::Ribbon => 2,
                TrailType::Particle => 1,
            };
            (trail_count, verts)
        } else {
            (1, 1)
        };

        Self {
            particle_count,
            trail_count,
            verts_per_particle,
        }
    }

    fn particles_needed(config: &EmitterConfig) -> f64 {
        (config.max_lifetime() * config.spawn_rate).ceil().max(1.0)
    }

    fn trail_points_needed(config: &EmitterConfig) -> f64 {
        let trail_span = config.max_trail_lifetime().min(config.max_lifetime());
        1.0 + (trail_span / config.trail_interval).ceil()
    }

    /// Empty capacity of an idle emitter
    pub const fn empty() -> Self {
        Self {
            particle_count: 0,
            trail_count: 1,
            verts_per_particle: 1,
        }
    }

    /// Slots used by one particle
    pub fn stride(&self) -> usize {
        self.trail_count * self.verts_per_particle
    }

    /// Total slots in the buffer
    pub fn count(&self) -> usize {
        self.particle_count * self.stride()
    }

    /// Particle id owning a slot
    pub fn particle_id(&self, index: usize) -> usize {
        index / self.trail_count / self.verts_per_particle
    }
}
