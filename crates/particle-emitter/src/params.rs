//! Per-tick parameter vector read by the renderer
//!
//! Every value is stored as `f32` in a fixed slot so a renderer can upload the
//! whole vector as one uniform block.

use crate::config::{Capacity, Direction, EmitterConfig, ParticleOrder, SpawnType};

/// Number of entries in the packed parameter vector
pub const PARAM_COUNT: usize = 19;

/// Position of each value in the packed vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ParamSlot {
    EmitterTime = 0,
    LastSpawnedId = 1,
    SpawnType = 2,
    SpawnRate = 3,
    Duration = 4,
    Delay = 5,
    Direction = 6,
    Drag = 7,
    Seed = 8,
    ParticleCount = 9,
    TrailCount = 10,
    VertsPerParticle = 11,
    TrailInterval = 12,
    OverTimeSlots = 13,
    ParticleOrder = 14,
    ColorEntries = 15,
    OpacityEntries = 16,
    RotationEntries = 17,
    ScaleEntries = 18,
}

impl ParamSlot {
    /// Every slot in packing order
    pub const ALL: [Self; PARAM_COUNT] = [
        Self::EmitterTime,
        Self::LastSpawnedId,
        Self::SpawnType,
        Self::SpawnRate,
        Self::Duration,
        Self::Delay,
        Self::Direction,
        Self::Drag,
        Self::Seed,
        Self::ParticleCount,
        Self::TrailCount,
        Self::VertsPerParticle,
        Self::TrailInterval,
        Self::OverTimeSlots,
        Self::ParticleOrder,
        Self::ColorEntries,
        Self::OpacityEntries,
        Self::RotationEntries,
        Self::ScaleEntries,
    ];

    /// Index into the packed vector
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short label used in listings
    pub fn name(self) -> &'static str {
        match self {
            Self::EmitterTime => "emitter_time",
            Self::LastSpawnedId => "last_spawned_id",
            Self::SpawnType => "spawn_type",
            Self::SpawnRate => "spawn_rate",
            Self::Duration => "duration",
            Self::Delay => "delay",
            Self::Direction => "direction",
            Self::Drag => "drag",
            Self::Seed => "seed",
            Self::ParticleCount => "particle_count",
            Self::TrailCount => "trail_count",
            Self::VertsPerParticle => "verts_per_particle",
            Self::TrailInterval => "trail_interval",
            Self::OverTimeSlots => "over_time_slots",
            Self::ParticleOrder => "particle_order",
            Self::ColorEntries => "color_entries",
            Self::OpacityEntries => "opacity_entries",
            Self::RotationEntries => "rotation_entries",
            Self::ScaleEntries => "scale_entries",
        }
    }
}

/// Values the renderer needs to animate the stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterParams {
    pub emitter_time: f64,
    pub last_spawned_id: i64,
    pub spawn_type: SpawnType,
    pub spawn_rate: f64,
    pub duration: f64,
    pub delay: f64,
    pub direction: Direction,
    pub drag: f32,
    /// Resolved base seed (never negative)
    ///
    /// Packed as `f32`, which is exact below 2^24. Randomly drawn seeds stay
    /// in that range; larger fixed seeds lose their low bits in the vector.
    pub seed: u32,
    pub capacity: Capacity,
    pub trail_interval: f64,
    pub over_time_slots: usize,
    pub particle_order: ParticleOrder,
    /// Entry counts of the color, opacity, rotation and scale curves
    pub curve_entries: [usize; 4],
}

impl EmitterParams {
    /// Static part of the vector for a configuration
    pub fn from_config(config: &EmitterConfig, capacity: Capacity, seed: u32) -> Self {
        let curve_entries = config.curves.lengths();
        Self {
            emitter_time: 0.0,
            last_spawned_id: -1,
            spawn_type: config.spawn_type,
            spawn_rate: config.spawn_rate,
            duration: config.duration,
            delay: config.delay,
            direction: config.direction,
            drag: config.drag,
            seed,
            capacity,
            trail_interval: config.trail_interval,
            over_time_slots: config.over_time_slots(),
            particle_order: config.particle_order,
            curve_entries,
        }
    }

    /// Value of one slot
    pub fn get(&self, slot: ParamSlot) -> f32 {
        match slot {
            ParamSlot::EmitterTime => self.emitter_time as f32,
            ParamSlot::LastSpawnedId => self.last_spawned_id as f32,
            ParamSlot::SpawnType => match self.spawn_type {
                SpawnType::Continuous => 0.0,
                SpawnType::Burst => 1.0,
            },
            ParamSlot::SpawnRate => self.spawn_rate as f32,
            ParamSlot::Duration => self.duration as f32,
            ParamSlot::Delay => self.delay as f32,
            ParamSlot::Direction => match self.direction {
                Direction::Forward => 0.0,
                Direction::Backward => 1.0,
            },
            ParamSlot::Drag => self.drag,
            ParamSlot::Seed => self.seed as f32,
            ParamSlot::ParticleCount => self.capacity.particle_count as f32,
            ParamSlot::TrailCount => self.capacity.trail_count as f32,
            ParamSlot::VertsPerParticle => self.capacity.verts_per_particle as f32,
            ParamSlot::TrailInterval => self.trail_interval as f32,
            ParamSlot::OverTimeSlots => self.over_time_slots as f32,
            ParamSlot::ParticleOrder => match self.particle_order {
                ParticleOrder::NewestLast => 0.0,
                ParticleOrder::OldestLast => 1.0,
                ParticleOrder::Cyclic => 2.0,
            },
            ParamSlot::ColorEntries => self.curve_entries[0] as f32,
            ParamSlot::OpacityEntries => self.curve_entries[1] as f32,
            ParamSlot::RotationEntries => self.curve_entries[2] as f32,
            ParamSlot::ScaleEntries => self.curve_entries[3] as f32,
        }
    }

    /// Pack every slot in layout order
    pub fn to_array(&self) -> [f32; PARAM_COUNT] {
        let mut out = [0.0; PARAM_COUNT];
        for slot in ParamSlot::ALL {
            out[slot.index()] = self.get(slot);
        }
        out
    }
}

/// Particle id drawn at position `draw_index` for a draw order
///
/// `NewestLast` walks from the oldest live id up to `last_spawned_id`,
/// `OldestLast` walks down from it. `Cyclic` draws in buffer order and
/// returns `None`. Ids are wrapped into `0..id_modulus`.
pub fn ordered_particle_id(
    order: ParticleOrder,
    last_spawned_id: i64,
    particle_count: usize,
    draw_index: usize,
    id_modulus: u64,
) -> Option<u64> {
    let count = particle_count as i64;
    let index = draw_index as i64;
    let id = match order {
        ParticleOrder::NewestLast => last_spawned_id - count + 1 + index,
        ParticleOrder::OldestLast => last_spawned_id - index,
        ParticleOrder::Cyclic => return None,
    };
    Some(id.rem_euclid(id_modulus as i64) as u64)
}
