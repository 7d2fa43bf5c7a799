//! Per-slot attribute storage with dirty-range tracking
//!
//! The stream is a structure of arrays: one array per attribute, all indexed
//! by slot. A spawn writes every array at a slot in one call, so a renderer
//! reading after a tick never sees half of a particle.

use glam::{Quat, Vec3};

use crate::config::Direction;

/// Id written into slots that hold no particle
pub const INACTIVE_ID: i32 = -1;

/// Contiguous slot interval touched by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyRange {
    /// First slot
    pub offset: usize,
    /// Number of slots
    pub count: usize,
}

impl DirtyRange {
    /// Range covering nothing
    pub const EMPTY: Self = Self {
        offset: 0,
        count: 0,
    };

    /// Range from offset and length
    pub const fn new(offset: usize, count: usize) -> Self {
        Self { offset, count }
    }

    /// True when nothing was touched
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// One past the last slot
    pub fn end(&self) -> usize {
        self.offset + self.count
    }
}

/// Every attribute of one slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotAttributes {
    /// Spawn offset
    pub position: Vec3,
    /// Linear velocity
    pub velocity: Vec3,
    /// Linear acceleration
    pub acceleration: Vec3,
    /// Radial offset, velocity, acceleration
    pub radial: Vec3,
    /// Angular velocity (degrees per second)
    pub angular_velocity: Vec3,
    /// Angular acceleration (degrees per second squared)
    pub angular_acceleration: Vec3,
    /// Orbital velocity and acceleration
    pub orbital: [f32; 2],
    /// Source position at spawn
    pub source_position: Vec3,
    /// Source orientation at spawn
    pub source_rotation: Quat,
    /// Emitter time of the spawn
    pub spawn_time: f32,
    /// Lifetime of this particle (or trail point)
    pub lifetime: f32,
    /// Particle id, [`INACTIVE_ID`] for empty slots
    pub id: i32,
    /// Position along the trail (0 is the head)
    pub trail_index: u16,
    /// Vertex within a ribbon segment
    pub vertex_index: u8,
    /// Random seed of the particle
    pub seed: f32,
}

impl SlotAttributes {
    /// Attributes of an empty slot
    pub fn inactive() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            radial: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            angular_acceleration: Vec3::ZERO,
            orbital: [0.0, 0.0],
            source_position: Vec3::ZERO,
            source_rotation: Quat::IDENTITY,
            spawn_time: 0.0,
            lifetime: 0.0,
            id: INACTIVE_ID,
            trail_index: 0,
            vertex_index: 0,
            seed: 0.0,
        }
    }
}

impl Default for SlotAttributes {
    fn default() -> Self {
        Self::inactive()
    }
}

/// Fixed-size attribute buffer owned by the scheduler
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeStream {
    position: Vec<Vec3>,
    velocity: Vec<Vec3>,
    acceleration: Vec<Vec3>,
    radial: Vec<Vec3>,
    angular_velocity: Vec<Vec3>,
    angular_acceleration: Vec<Vec3>,
    orbital: Vec<[f32; 2]>,
    source_position: Vec<Vec3>,
    source_rotation: Vec<Quat>,
    spawn_time: Vec<f32>,
    lifetime: Vec<f32>,
    id: Vec<i32>,
    trail_index: Vec<u16>,
    vertex_index: Vec<u8>,
    seed: Vec<f32>,

    // Touched interval since the last publish, as [start, end)
    touched: Option<(usize, usize)>,
    full_rewrite: bool,
}

impl AttributeStream {
    /// Stream with `count` inactive slots
    pub fn new(count: usize) -> Self {
        let blank = SlotAttributes::inactive();
        Self {
            position: vec![blank.position; count],
            velocity: vec![blank.velocity; count],
            acceleration: vec![blank.acceleration; count],
            radial: vec![blank.radial; count],
            angular_velocity: vec![blank.angular_velocity; count],
            angular_acceleration: vec![blank.angular_acceleration; count],
            orbital: vec![blank.orbital; count],
            source_position: vec![blank.source_position; count],
            source_rotation: vec![blank.source_rotation; count],
            spawn_time: vec![blank.spawn_time; count],
            lifetime: vec![blank.lifetime; count],
            id: vec![blank.id; count],
            trail_index: vec![blank.trail_index; count],
            vertex_index: vec![blank.vertex_index; count],
            seed: vec![blank.seed; count],
            touched: None,
            full_rewrite: false,
        }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.id.len()
    }

    /// True when the stream has no slots
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// Overwrite every attribute of one slot
    ///
    /// Out-of-range indices are ignored.
    pub fn write_slot(&mut self, index: usize, attrs: &SlotAttributes) {
        if index >= self.len() {
            log::warn!(
                "Ignoring write to slot {} of a {} slot stream",
                index,
                self.len()
            );
            return;
        }
        self.position[index] = attrs.position;
        self.velocity[index] = attrs.velocity;
        self.acceleration[index] = attrs.acceleration;
        self.radial[index] = attrs.radial;
        self.angular_velocity[index] = attrs.angular_velocity;
        self.angular_acceleration[index] = attrs.angular_acceleration;
        self.orbital[index] = attrs.orbital;
        self.source_position[index] = attrs.source_position;
        self.source_rotation[index] = attrs.source_rotation;
        self.spawn_time[index] = attrs.spawn_time;
        self.lifetime[index] = attrs.lifetime;
        self.id[index] = attrs.id;
        self.trail_index[index] = attrs.trail_index;
        self.vertex_index[index] = attrs.vertex_index;
        self.seed[index] = attrs.seed;

        self.touched = Some(match self.touched {
            Some((start, end)) => (start.min(index), end.max(index + 1)),
            None => (index, index + 1),
        });
    }

    /// Read back every attribute of one slot
    pub fn slot(&self, index: usize) -> Option<SlotAttributes> {
        if index >= self.len() {
            return None;
        }
        Some(SlotAttributes {
            position: self.position[index],
            velocity: self.velocity[index],
            acceleration: self.acceleration[index],
            radial: self.radial[index],
            angular_velocity: self.angular_velocity[index],
            angular_acceleration: self.angular_acceleration[index],
            orbital: self.orbital[index],
            source_position: self.source_position[index],
            source_rotation: self.source_rotation[index],
            spawn_time: self.spawn_time[index],
            lifetime: self.lifetime[index],
            id: self.id[index],
            trail_index: self.trail_index[index],
            vertex_index: self.vertex_index[index],
            seed: self.seed[index],
        })
    }

    /// Mark the whole buffer for upload
    pub fn request_full_rewrite(&mut self) {
        self.full_rewrite = true;
    }

    /// True when the pending range must be the whole buffer
    pub fn needs_full_rewrite(&self) -> bool {
        self.full_rewrite
    }

    /// Range touched since the last publish
    pub fn dirty_range(&self) -> DirtyRange {
        if self.full_rewrite {
            return DirtyRange::new(0, self.len());
        }
        self.touched
            .map_or(DirtyRange::EMPTY, |(start, end)| {
                DirtyRange::new(start, end - start)
            })
    }

    /// Return the pending range and start tracking the next one
    pub fn publish(&mut self) -> DirtyRange {
        let range = self.dirty_range();
        self.touched = None;
        self.full_rewrite = false;
        range
    }

    /// Mark every slot inactive and request a full upload
    pub fn clear(&mut self) {
        let blank = SlotAttributes::inactive();
        for index in 0..self.len() {
            self.write_slot(index, &blank);
        }
        self.full_rewrite = true;
    }

    /// Age of the particle in a slot at `time`, `None` when inactive
    pub fn age(&self, index: usize, time: f64) -> Option<f64> {
        let id = *self.id.get(index)?;
        if id == INACTIVE_ID {
            return None;
        }
        Some(time - f64::from(self.spawn_time[index]))
    }

    /// True when the slot holds a particle whose age is within its lifetime
    pub fn is_alive(&self, index: usize, time: f64) -> bool {
        self.age(index, time)
            .is_some_and(|age| age >= 0.0 && age <= f64::from(self.lifetime[index]))
    }

    /// Normalized age in `0..1`, reversed for backward playback
    pub fn age_ratio(&self, index: usize, time: f64, direction: Direction) -> Option<f32> {
        let age = self.age(index, time)?;
        let lifetime = f64::from(self.lifetime[index]);
        let ratio = if lifetime > 0.0 {
            (age / lifetime).clamp(0.0, 1.0) as f32
        } else {
            1.0
        };
        Some(match direction {
            Direction::Forward => ratio,
            Direction::Backward => 1.0 - ratio,
        })
    }

    /// Spawn offsets
    pub fn positions(&self) -> &[Vec3] {
        &self.position
    }

    /// Linear velocities
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocity
    }

    /// Linear accelerations
    pub fn accelerations(&self) -> &[Vec3] {
        &self.acceleration
    }

    /// Radial offset, velocity and acceleration
    pub fn radials(&self) -> &[Vec3] {
        &self.radial
    }

    /// Angular velocities
    pub fn angular_velocities(&self) -> &[Vec3] {
        &self.angular_velocity
    }

    /// Angular accelerations
    pub fn angular_accelerations(&self) -> &[Vec3] {
        &self.angular_acceleration
    }

    /// Orbital velocity and acceleration
    pub fn orbitals(&self) -> &[[f32; 2]] {
        &self.orbital
    }

    /// Source positions stamped at spawn
    pub fn source_positions(&self) -> &[Vec3] {
        &self.source_position
    }

    /// Source orientations stamped at spawn
    pub fn source_rotations(&self) -> &[Quat] {
        &self.source_rotation
    }

    /// Spawn times
    pub fn spawn_times(&self) -> &[f32] {
        &self.spawn_time
    }

    /// Lifetimes
    pub fn lifetimes(&self) -> &[f32] {
        &self.lifetime
    }

    /// Particle ids
    pub fn ids(&self) -> &[i32] {
        &self.id
    }

    /// Trail indices
    pub fn trail_indices(&self) -> &[u16] {
        &self.trail_index
    }

    /// Ribbon vertex indices
    pub fn vertex_indices(&self) -> &[u8] {
        &self.vertex_index
    }

    /// Particle seeds
    pub fn seeds(&self) -> &[f32] {
        &self.seed
    }
}
