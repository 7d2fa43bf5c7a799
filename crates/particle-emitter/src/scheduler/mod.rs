//! Ring-buffer emission scheduler
//!
//! The scheduler owns a fixed pool of particle slots. Each tick it advances
//! the emitter clock, spawns every particle that has come due into the next
//! slot of the ring, and reports the slot range it touched. Particle
//! attributes are drawn from a seed derived from the spawn sequence number,
//! so every pass over the ring reproduces the same values bit for bit.

mod rebuild;
mod state;

pub use rebuild::RebuildPlan;
pub use state::SchedulerState;

use glam::Vec3;

use crate::bounds::{Bounds, BoundsEstimator};
use crate::config::{Capacity, EmitterConfig, ParticleOrder, SourceMode, SpawnType};
use crate::curve::Appearance;
use crate::error::{EmitterError, Result};
use crate::params::{EmitterParams, ordered_particle_id};
use crate::random::{RANDOM_REPEAT_COUNT, SeededRandom, virtual_seed};
use crate::source::{ModelSurface, SourceTransform};
use crate::stream::{AttributeStream, DirtyRange, SlotAttributes};

/// Longest step simulated by one tick, in seconds
pub const MAX_TICK: f64 = 0.1;

/// Attributes drawn once per particle
#[derive(Debug, Clone, Copy)]
struct ParticleSample {
    lifetime: f32,
    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,
    radial: Vec3,
    angular_velocity: Vec3,
    angular_acceleration: Vec3,
    orbital: [f32; 2],
}

impl ParticleSample {
    fn draw(config: &EmitterConfig, rng: &mut SeededRandom, seed: f64) -> Self {
        let r = &config.ranges;
        Self {
            lifetime: config.lifetime.sample_scalar(rng, seed),
            position: r.position.sample_vec3(rng, seed),
            velocity: r.velocity.sample_vec3(rng, seed),
            acceleration: r.acceleration.sample_vec3(rng, seed),
            radial: Vec3::new(
                r.radial_position.sample_scalar(rng, seed),
                r.radial_velocity.sample_scalar(rng, seed),
                r.radial_acceleration.sample_scalar(rng, seed),
            ),
            angular_velocity: r.angular_velocity.sample_vec3(rng, seed),
            angular_acceleration: r.angular_acceleration.sample_vec3(rng, seed),
            orbital: [
                r.orbital_velocity.sample_scalar(rng, seed),
                r.orbital_acceleration.sample_scalar(rng, seed),
            ],
        }
    }
}

/// Deterministic emission scheduler
#[derive(Debug, Clone)]
pub struct EmissionScheduler {
    config: EmitterConfig,
    capacity: Capacity,
    base_seed: u32,
    state: SchedulerState,
    paused: bool,
    enabled: bool,
    /// Ids are issued from `next_id` instead of the spawn sequence
    manage_ids: bool,

    stream: AttributeStream,
    bounds: Bounds,
    params: EmitterParams,
    rng: SeededRandom,

    emitter_time: f64,
    next_spawn_time: f64,
    /// Spawns since the clock was last reset; the cursor is this mod capacity
    spawn_count: u64,
    next_id: u64,
    last_spawned_id: i64,
    num_enabled_run: usize,
    num_disabled_run: usize,
    last_full_rewrite: bool,

    source_transform: Option<SourceTransform>,
    model: Option<ModelSurface>,
    missing_source_reported: bool,
    missing_model_reported: bool,
}

impl EmissionScheduler {
    /// Create a scheduler, staying idle if the configuration is invalid
    pub fn new(config: EmitterConfig) -> Self {
        let config = normalize_order(config);
        let enabled = config.enabled;
        let bounds = BoundsEstimator::for_config(&config).estimate();
        let params = EmitterParams::from_config(&config, Capacity::empty(), 0);
        let mut scheduler = Self {
            capacity: Capacity::empty(),
            base_seed: 0,
            state: SchedulerState::Idle,
            paused: false,
            enabled,
            manage_ids: false,
            stream: AttributeStream::new(0),
            bounds,
            params,
            rng: SeededRandom::new(),
            emitter_time: 0.0,
            next_spawn_time: 0.0,
            spawn_count: 0,
            next_id: 0,
            last_spawned_id: -1,
            num_enabled_run: 0,
            num_disabled_run: 0,
            last_full_rewrite: false,
            source_transform: None,
            model: None,
            missing_source_reported: false,
            missing_model_reported: false,
            config,
        };

        match scheduler.config.validate() {
            Ok(()) => scheduler.build(),
            Err(err) => log::error!("Emitter stays idle: {}", err),
        }
        scheduler
    }

    /// Create a scheduler, failing on an invalid configuration
    pub fn try_new(config: EmitterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Allocate the stream for the current configuration and restart the clock
    fn build(&mut self) {
        self.capacity = Capacity::from_config(&self.config);
        self.stream = AttributeStream::new(self.capacity.count());
        self.stream.request_full_rewrite();
        self.base_seed = resolve_seed(self.config.seed);
        self.bounds = self.estimate_bounds();
        self.manage_ids |= self.config.source.needs_explicit_ids();
        self.reset_clock();
        self.state = SchedulerState::Scheduling;
        self.refresh_params();

        log::debug!(
            "Built emitter: {} particles x {} trail points x {} verts = {} slots, seed {}",
            self.capacity.particle_count,
            self.capacity.trail_count,
            self.capacity.verts_per_particle,
            self.capacity.count(),
            self.base_seed
        );
    }

    /// Bounds of the current configuration, widened by the model surface
    fn estimate_bounds(&self) -> Bounds {
        let surface = match self.config.source {
            SourceMode::Model(_) => self.model.as_ref().and_then(ModelSurface::aabb),
            _ => None,
        };
        BoundsEstimator::for_config(&self.config)
            .with_surface(surface)
            .estimate()
    }

    fn reset_clock(&mut self) {
        self.emitter_time = 0.0;
        self.next_spawn_time = self.config.delay;
        self.spawn_count = 0;
        self.num_enabled_run = 0;
        self.num_disabled_run = 0;
    }

    fn refresh_params(&mut self) {
        let mut params = EmitterParams::from_config(&self.config, self.capacity, self.base_seed);
        params.emitter_time = self.emitter_time;
        params.last_spawned_id = self.last_spawned_id;
        self.params = params;
    }

    /// Advance the clock by `dt` seconds and spawn everything that came due
    ///
    /// Returns the slot range written since the last call. `dt` is clamped
    /// to [`MAX_TICK`]; the excess is dropped.
    pub fn tick(&mut self, dt: f64) -> DirtyRange {
        if !self.state.is_scheduling() || self.paused || (!self.enabled && !self.manage_ids) {
            return self.publish();
        }

        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_TICK)
        } else {
            0.0
        };
        self.emitter_time += dt;

        let particle_count = self.capacity.particle_count;
        let spawn_delta = match self.config.spawn_type {
            SpawnType::Continuous => 1.0 / self.config.spawn_rate,
            SpawnType::Burst => 0.0,
        };

        self.fast_forward(spawn_delta);

        let mut spawned = 0;
        let mut first_written: Option<usize> = None;
        let mut wrapped = false;
        while self.next_spawn_time <= self.emitter_time && spawned < particle_count {
            let slot = (self.spawn_count % particle_count as u64) as usize;
            if self.spawn(slot, self.next_spawn_time) {
                match first_written {
                    None => first_written = Some(slot),
                    Some(first) if slot < first => wrapped = true,
                    Some(_) => {}
                }
            }

            self.spawn_count += 1;
            spawned += 1;
            self.next_spawn_time += spawn_delta;
            if self.config.spawn_type == SpawnType::Burst
                && self.spawn_count % particle_count as u64 == 0
            {
                self.next_spawn_time += self.burst_period();
            }
        }

        if wrapped {
            self.stream.request_full_rewrite();
        }
        if spawned > 0 {
            log::trace!(
                "t={:.4}: spawned {} (total {}), next spawn at {:.4}",
                self.emitter_time,
                spawned,
                self.spawn_count,
                self.next_spawn_time
            );
        }

        self.params.emitter_time = self.emitter_time;
        self.params.last_spawned_id = self.last_spawned_id;
        self.check_exhausted();
        self.publish()
    }

    fn publish(&mut self) -> DirtyRange {
        self.last_full_rewrite = self.stream.needs_full_rewrite();
        self.stream.publish()
    }

    /// Seconds between the start of one burst and the next
    fn burst_period(&self) -> f64 {
        if self.config.has_trails() {
            self.config.max_lifetime() + self.config.max_trail_lifetime()
        } else {
            self.config.max_lifetime()
        }
    }

    /// Skip spawns whose slots would be overwritten again within this tick
    fn fast_forward(&mut self, spawn_delta: f64) {
        if self.next_spawn_time > self.emitter_time {
            return;
        }
        let particle_count = self.capacity.particle_count as u64;
        let behind = self.emitter_time - self.next_spawn_time;

        let skipped = if spawn_delta > 0.0 {
            let due = (behind / spawn_delta).floor() as u64 + 1;
            let skipped = due.saturating_sub(particle_count);
            self.next_spawn_time += skipped as f64 * spawn_delta;
            skipped
        } else {
            let period = self.burst_period();
            let bursts = (behind / period).floor() as u64;
            self.next_spawn_time += bursts as f64 * period;
            bursts * particle_count
        };

        if skipped == 0 {
            return;
        }
        self.spawn_count += skipped;
        if self.enabled && self.manage_ids {
            self.next_id = (self.next_id + skipped) % RANDOM_REPEAT_COUNT;
        }
        log::debug!("Fast-forwarded {} spawns that would be overwritten this tick", skipped);
    }

    /// Fill one particle's slots; returns false when the write was skipped
    fn spawn(&mut self, slot: usize, spawn_time: f64) -> bool {
        if self.enabled {
            self.num_enabled_run += 1;
            self.num_disabled_run = 0;
            let id = if self.manage_ids {
                let id = self.next_id;
                self.next_id = (self.next_id + 1) % RANDOM_REPEAT_COUNT;
                id
            } else {
                self.spawn_count % RANDOM_REPEAT_COUNT
            };
            self.write_particle(slot, spawn_time, id);
            self.last_spawned_id = id as i64;
            return true;
        }

        self.num_enabled_run = 0;
        // A full ring of markers already hides everything
        if self.num_disabled_run >= self.capacity.particle_count {
            return false;
        }
        self.num_disabled_run += 1;
        let marker = SlotAttributes {
            spawn_time: spawn_time as f32,
            ..SlotAttributes::inactive()
        };
        let base = slot * self.capacity.stride();
        for index in base..base + self.capacity.stride() {
            self.stream.write_slot(index, &marker);
        }
        true
    }

    fn write_particle(&mut self, slot: usize, spawn_time: f64, id: u64) {
        let seed = virtual_seed(self.base_seed, id);
        self.rng.reset();
        let sample = ParticleSample::draw(&self.config, &mut self.rng, seed);
        let surface_offset = self.surface_point(seed);
        let source = self.stamped_source();

        let verts = self.capacity.verts_per_particle;
        let base = slot * self.capacity.stride();
        for trail in 0..self.capacity.trail_count {
            // Trail points replay the head's motion `trail * interval` later
            let lifetime = sample.lifetime + (trail as f64 * self.config.trail_interval) as f32;
            for vertex in 0..verts {
                let attrs = SlotAttributes {
                    position: sample.position + surface_offset,
                    velocity: sample.velocity,
                    acceleration: sample.acceleration,
                    radial: sample.radial,
                    angular_velocity: sample.angular_velocity,
                    angular_acceleration: sample.angular_acceleration,
                    orbital: sample.orbital,
                    source_position: source.position,
                    source_rotation: source.rotation,
                    spawn_time: spawn_time as f32,
                    lifetime,
                    id: id as i32,
                    trail_index: trail as u16,
                    vertex_index: vertex as u8,
                    seed: seed as f32,
                };
                self.stream.write_slot(base + trail * verts + vertex, &attrs);
            }
        }
    }

    fn surface_point(&mut self, seed: f64) -> Vec3 {
        let SourceMode::Model(mode) = self.config.source else {
            return Vec3::ZERO;
        };
        let point = self
            .model
            .as_ref()
            .and_then(|model| model.sample(mode, &mut self.rng, seed));
        match point {
            Some(point) => point,
            None => {
                if !self.missing_model_reported {
                    log::error!("Emitter spawns on a model surface but none was set; spawning locally");
                    self.missing_model_reported = true;
                }
                Vec3::ZERO
            }
        }
    }

    fn stamped_source(&mut self) -> SourceTransform {
        match (self.config.source, self.source_transform) {
            (SourceMode::Entity, Some(transform)) => transform,
            (SourceMode::Entity, None) => {
                if !self.missing_source_reported {
                    log::error!("Emitter follows a source entity but none was set; spawning locally");
                    self.missing_source_reported = true;
                }
                SourceTransform::IDENTITY
            }
            _ if self.manage_ids => self.source_transform.unwrap_or_default(),
            _ => SourceTransform::IDENTITY,
        }
    }

    /// Spawns at or after this time are hidden by the renderer
    fn visibility_cutoff(&self) -> Option<f64> {
        self.config
            .is_finite()
            .then_some(self.config.delay + self.config.duration)
    }

    fn check_exhausted(&mut self) {
        if self.state != SchedulerState::Scheduling {
            return;
        }
        let Some(cutoff) = self.visibility_cutoff() else {
            return;
        };
        let time = self.emitter_time;
        if time < cutoff {
            return;
        }
        let spawn_times = self.stream.spawn_times();
        let any_visible = (0..self.stream.len()).any(|index| {
            f64::from(spawn_times[index]) < cutoff && self.stream.is_alive(index, time)
        });
        if !any_visible {
            self.state = SchedulerState::Exhausted;
            log::debug!("Emitter exhausted at {:.3}s", time);
        }
    }

    /// Report a missing source entity or model surface
    pub fn check_sources(&self) -> Result<()> {
        match self.config.source {
            SourceMode::Entity if self.source_transform.is_none() => Err(
                EmitterError::MissingSource("emitter follows an entity but no transform was set".to_string()),
            ),
            SourceMode::Model(_) if self.model.as_ref().is_none_or(ModelSurface::is_empty) => {
                Err(EmitterError::MissingModel(
                    "emitter spawns on a model but no vertices were set".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Turn emission on or off at runtime
    ///
    /// The first toggle switches the scheduler to explicit id management for
    /// good, so disabled spawns can mark their slots inactive.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        if !self.manage_ids {
            self.manage_ids = true;
            self.next_id = self.spawn_count % RANDOM_REPEAT_COUNT;
            log::debug!("Enable toggle switched the emitter to explicit ids at {}", self.next_id);
        }
        self.enabled = enabled;
    }

    /// Stop advancing the clock
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume advancing the clock
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Start over from time zero, keeping capacity and the id counter
    pub fn restart(&mut self) {
        if self.state == SchedulerState::Idle {
            log::warn!("Ignoring restart of an idle emitter");
            return;
        }
        self.reset_clock();
        self.clear();
        self.state = SchedulerState::Scheduling;
        self.params.emitter_time = 0.0;
    }

    /// Vacate every slot at once
    pub fn clear(&mut self) {
        self.stream.clear();
        self.num_enabled_run = 0;
        self.num_disabled_run = self.capacity.particle_count;
    }

    /// Apply a new configuration
    ///
    /// Changes that need a new buffer are refused while the emitter is
    /// running; pause it first. Everything else applies in place.
    pub fn reconfigure(&mut self, config: EmitterConfig) -> Result<RebuildPlan> {
        if let Err(err) = config.validate() {
            log::error!("Rejected emitter configuration: {}", err);
            return Err(err);
        }
        let config = normalize_order(config);
        let plan = if self.state == SchedulerState::Idle {
            RebuildPlan::full()
        } else {
            RebuildPlan::between(&self.config, &config)
        };

        if plan.needs_rebuild() && self.is_running() {
            let what = plan.describe();
            log::error!("Cannot change {} while the emitter is running; pause it first", what);
            return Err(EmitterError::RebuildWhileRunning { what });
        }

        let enable_changed = config.enabled != self.config.enabled;
        self.config = config;

        if plan.needs_rebuild() {
            self.build();
        } else {
            if plan.reseed {
                self.base_seed = resolve_seed(self.config.seed);
            }
            if plan.update_bounds {
                self.bounds = self.estimate_bounds();
            }
            self.manage_ids |= self.config.source.needs_explicit_ids();
            self.refresh_params();
        }
        if enable_changed {
            self.set_enabled(self.config.enabled);
        }

        log::debug!("Reconfigured emitter: {:?}", plan);
        Ok(plan)
    }

    /// Set the transform stamped onto entity-relative spawns
    pub fn set_source_transform(&mut self, transform: SourceTransform) {
        self.source_transform = Some(transform);
        self.missing_source_reported = false;
    }

    /// Set the surface sampled by model spawns
    pub fn set_model_surface(&mut self, surface: ModelSurface) {
        self.model = Some(surface);
        self.missing_model_reported = false;
        self.bounds = self.estimate_bounds();
    }

    /// Appearance of the particle in a slot at the current time
    pub fn appearance(&self, index: usize) -> Option<Appearance> {
        let ratio = self
            .stream
            .age_ratio(index, self.emitter_time, self.config.direction)?;
        let seed = f64::from(*self.stream.seeds().get(index)?);
        Some(self.config.curves.evaluate(ratio, seed))
    }

    /// Particle id to draw at `draw_index`, `None` for buffer order
    pub fn draw_order_id(&self, draw_index: usize) -> Option<u64> {
        ordered_particle_id(
            self.config.particle_order,
            self.last_spawned_id,
            self.capacity.particle_count,
            draw_index,
            RANDOM_REPEAT_COUNT,
        )
    }

    /// Number of particles whose head slot is alive
    pub fn alive_count(&self) -> usize {
        let stride = self.capacity.stride();
        (0..self.capacity.particle_count)
            .filter(|particle| self.stream.is_alive(particle * stride, self.emitter_time))
            .count()
    }

    /// True when the slot holds a live particle
    pub fn is_slot_alive(&self, index: usize) -> bool {
        self.stream.is_alive(index, self.emitter_time)
    }

    /// True when the clock advances on tick
    pub fn is_running(&self) -> bool {
        self.state.is_scheduling() && !self.paused
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn stream(&self) -> &AttributeStream {
        &self.stream
    }

    pub fn params(&self) -> &EmitterParams {
        &self.params
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Resolved base seed
    pub fn base_seed(&self) -> u32 {
        self.base_seed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn manage_ids(&self) -> bool {
        self.manage_ids
    }

    pub fn emitter_time(&self) -> f64 {
        self.emitter_time
    }

    pub fn next_spawn_time(&self) -> f64 {
        self.next_spawn_time
    }

    /// Spawns since the last clock reset, fast-forwarded ones included
    pub fn total_spawned(&self) -> u64 {
        self.spawn_count
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Id of the most recent visible spawn, -1 before the first
    pub fn last_spawned_id(&self) -> i64 {
        self.last_spawned_id
    }

    pub fn num_enabled_run(&self) -> usize {
        self.num_enabled_run
    }

    pub fn num_disabled_run(&self) -> usize {
        self.num_disabled_run
    }

    /// True when the last published range was a whole-buffer rewrite
    pub fn needs_full_rewrite(&self) -> bool {
        self.last_full_rewrite
    }
}

/// Entity and model sources only support buffer order
fn normalize_order(mut config: EmitterConfig) -> EmitterConfig {
    if config.source != SourceMode::Local && config.particle_order != ParticleOrder::Cyclic {
        log::warn!(
            "Particle order {:?} is not supported with a {:?} source; using cyclic order",
            config.particle_order,
            config.source
        );
        config.particle_order = ParticleOrder::Cyclic;
    }
    config
}

/// Random base seeds stay below this so the packed `f32` seed is exact
const RANDOM_SEED_LIMIT: u32 = 1 << 24;

fn resolve_seed(seed: i64) -> u32 {
    if seed < 0 {
        let drawn = rand::random_range(1..RANDOM_SEED_LIMIT);
        log::debug!("Drew random base seed {}", drawn);
        return drawn;
    }
    if seed == 0 {
        log::warn!("Base seed 0 gives every particle the same random values");
    }
    seed as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamSlot;
    use crate::range::{ScalarRange, Vec3Range};
    use crate::stream::INACTIVE_ID;
    use glam::Quat;
    use pretty_assertions::assert_eq;

    /// Rate 32, lifetime 1/8: four particles, one every 1/32 s
    fn small_config() -> EmitterConfig {
        EmitterConfig {
            spawn_rate: 32.0,
            lifetime: ScalarRange::scalar(0.125, 0.125),
            seed: 7,
            ..Default::default()
        }
    }

    const STEP: f64 = 0.0625;

    #[test]
    fn test_invalid_config_stays_idle() {
        let mut scheduler = EmissionScheduler::new(EmitterConfig {
            spawn_rate: 0.0,
            ..Default::default()
        });
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.capacity().count(), 0);
        assert!(scheduler.tick(0.1).is_empty());
        assert!(
            EmissionScheduler::try_new(EmitterConfig {
                spawn_rate: 0.0,
                ..Default::default()
            })
            .is_err()
        );
    }

    #[test]
    fn test_first_tick_spawns_due_particles() {
        let mut scheduler = EmissionScheduler::new(small_config());
        assert_eq!(scheduler.capacity().particle_count, 4);
        let range = scheduler.tick(STEP);
        // Spawns at 0, 1/32 and 2/32; the initial full upload is still pending
        assert_eq!(scheduler.total_spawned(), 3);
        assert_eq!(range, DirtyRange::new(0, 4));
        assert_eq!(scheduler.last_spawned_id(), 2);
        assert_eq!(&scheduler.stream().ids()[..3], &[0, 1, 2]);
        assert_eq!(scheduler.next_spawn_time(), 0.09375);
    }

    #[test]
    fn test_wrap_within_tick_requests_full_rewrite() {
        let mut scheduler = EmissionScheduler::new(small_config());
        scheduler.tick(STEP);
        scheduler.tick(0.0);
        assert!(!scheduler.needs_full_rewrite());

        // Spawns at 3/32 and 4/32 land in slots 3 and 0
        let range = scheduler.tick(STEP);
        assert_eq!(range, DirtyRange::new(0, 4));
        assert!(scheduler.needs_full_rewrite());
        assert_eq!(scheduler.stream().ids(), &[4, 1, 2, 3]);
    }

    #[test]
    fn test_partial_range_without_wrap() {
        let mut scheduler = EmissionScheduler::new(EmitterConfig {
            spawn_rate: 16.0,
            lifetime: ScalarRange::scalar(1.0, 1.0),
            seed: 1,
            ..Default::default()
        });
        scheduler.tick(STEP);
        let range = scheduler.tick(STEP);
        // One spawn at 2/16 into slot 2
        assert_eq!(range, DirtyRange::new(2, 1));
        assert!(!scheduler.needs_full_rewrite());
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut scheduler = EmissionScheduler::new(small_config());
        scheduler.tick(5.0);
        assert_eq!(scheduler.emitter_time(), MAX_TICK);
        scheduler.tick(-1.0);
        scheduler.tick(f64::NAN);
        assert_eq!(scheduler.emitter_time(), MAX_TICK);
    }

    #[test]
    fn test_backlog_is_fast_forwarded() {
        let mut scheduler = EmissionScheduler::new(EmitterConfig {
            spawn_rate: 1024.0,
            lifetime: ScalarRange::scalar(0.003_906_25, 0.003_906_25),
            seed: 3,
            ..Default::default()
        });
        assert_eq!(scheduler.capacity().particle_count, 4);
        let range = scheduler.tick(STEP);
        assert_eq!(scheduler.total_spawned(), 65);
        assert_eq!(range, DirtyRange::new(0, 4));
        assert_eq!(scheduler.last_spawned_id(), 64);
    }

    #[test]
    fn test_burst_spawns_whole_ring_then_waits() {
        let mut scheduler = EmissionScheduler::new(EmitterConfig {
            spawn_type: SpawnType::Burst,
            spawn_rate: 5.0,
            lifetime: ScalarRange::scalar(2.0, 2.0),
            seed: 9,
            ..Default::default()
        });
        scheduler.tick(STEP);
        assert_eq!(scheduler.total_spawned(), 10);
        assert!(scheduler.stream().spawn_times().iter().all(|t| *t == 0.0));
        assert_eq!(scheduler.next_spawn_time(), 2.0);

        for _ in 0..30 {
            scheduler.tick(STEP);
        }
        assert_eq!(scheduler.emitter_time(), 1.9375);
        assert_eq!(scheduler.total_spawned(), 10);
        scheduler.tick(STEP);
        assert_eq!(scheduler.total_spawned(), 20);
        assert!(scheduler.stream().spawn_times().iter().all(|t| *t == 2.0));
    }

    #[test]
    fn test_disabled_spawns_write_markers_then_stop() {
        let mut scheduler = EmissionScheduler::new(small_config());
        scheduler.tick(STEP);
        scheduler.set_enabled(false);
        assert!(scheduler.manage_ids());
        assert_eq!(scheduler.next_id(), 3);

        scheduler.tick(STEP);
        assert_eq!(scheduler.num_disabled_run(), 2);
        scheduler.tick(STEP);
        assert_eq!(scheduler.num_disabled_run(), 4);
        assert!(scheduler.stream().ids().iter().all(|id| *id == INACTIVE_ID));

        let range = scheduler.tick(STEP);
        assert!(range.is_empty());
        assert_eq!(scheduler.num_disabled_run(), 4);
        assert_eq!(scheduler.alive_count(), 0);

        scheduler.set_enabled(true);
        scheduler.tick(STEP);
        assert_eq!(scheduler.num_enabled_run(), 2);
        assert_eq!(scheduler.num_disabled_run(), 0);
        // Explicit ids continue from where the toggle left them
        assert_eq!(scheduler.last_spawned_id(), 4);
    }

    #[test]
    fn test_initially_disabled_emitter_does_not_advance() {
        let mut scheduler = EmissionScheduler::new(EmitterConfig {
            enabled: false,
            ..small_config()
        });
        scheduler.tick(STEP);
        assert_eq!(scheduler.emitter_time(), 0.0);
        assert_eq!(scheduler.total_spawned(), 0);
    }

    #[test]
    fn test_paused_emitter_does_not_advance() {
        let mut scheduler = EmissionScheduler::new(small_config());
        scheduler.pause();
        scheduler.tick(STEP);
        assert_eq!(scheduler.emitter_time(), 0.0);
        scheduler.resume();
        scheduler.tick(STEP);
        assert_eq!(scheduler.emitter_time(), STEP);
    }

    #[test]
    fn test_duration_hides_without_stopping_allocation() {
        let mut scheduler = EmissionScheduler::new(EmitterConfig {
            duration: 0.25,
            ..small_config()
        });
        // At 5/16 the particle spawned at 7/32 is still alive
        for _ in 0..5 {
            scheduler.tick(STEP);
        }
        assert_eq!(scheduler.state(), SchedulerState::Scheduling);
        scheduler.tick(STEP);
        assert_eq!(scheduler.state(), SchedulerState::Exhausted);

        for _ in 0..14 {
            scheduler.tick(STEP);
        }
        assert_eq!(scheduler.emitter_time(), 1.25);
        assert_eq!(scheduler.total_spawned(), 41);
        assert_eq!(scheduler.stream().ids(), &[40, 37, 38, 39]);
        assert_eq!(scheduler.alive_count(), 4);
        assert_eq!(
            scheduler.params().to_array()[ParamSlot::Duration.index()],
            0.25
        );

        let next_id = scheduler.next_id();
        scheduler.restart();
        assert_eq!(scheduler.state(), SchedulerState::Scheduling);
        assert_eq!(scheduler.emitter_time(), 0.0);
        assert_eq!(scheduler.next_id(), next_id);
        scheduler.tick(STEP);
        assert_eq!(scheduler.alive_count(), 3);
    }

    #[test]
    fn test_clear_vacates_slots() {
        let mut scheduler = EmissionScheduler::new(small_config());
        scheduler.tick(STEP);
        scheduler.clear();
        assert_eq!(scheduler.alive_count(), 0);
        assert_eq!(scheduler.tick(0.0), DirtyRange::new(0, 4));
    }

    #[test]
    fn test_rebuild_rejected_while_running() {
        let mut scheduler = EmissionScheduler::new(small_config());
        scheduler.tick(STEP);
        let bigger = EmitterConfig {
            spawn_rate: 64.0,
            ..small_config()
        };
        assert!(matches!(
            scheduler.reconfigure(bigger.clone()),
            Err(EmitterError::RebuildWhileRunning { .. })
        ));
        assert_eq!(scheduler.capacity().particle_count, 4);

        scheduler.pause();
        let plan = scheduler.reconfigure(bigger).unwrap();
        assert!(plan.needs_rebuild());
        assert_eq!(scheduler.capacity().particle_count, 8);
        assert_eq!(scheduler.stream().len(), 8);
        assert_eq!(scheduler.emitter_time(), 0.0);
    }

    #[test]
    fn test_incremental_change_while_running() {
        let mut scheduler = EmissionScheduler::new(small_config());
        scheduler.tick(STEP);
        let mut moved = small_config();
        moved.ranges.velocity = Vec3Range::fixed([0.0, 4.0, 0.0]);
        let plan = scheduler.reconfigure(moved).unwrap();
        assert!(!plan.needs_rebuild());
        assert_eq!(scheduler.emitter_time(), STEP);
        assert_eq!(scheduler.bounds().max.y, 0.5);
    }

    #[test]
    fn test_external_source_forces_cyclic_order() {
        let scheduler = EmissionScheduler::new(EmitterConfig {
            source: SourceMode::Entity,
            particle_order: ParticleOrder::NewestLast,
            ..small_config()
        });
        assert_eq!(scheduler.config().particle_order, ParticleOrder::Cyclic);
        assert!(scheduler.manage_ids());
        assert_eq!(scheduler.draw_order_id(0), None);
    }

    #[test]
    fn test_entity_source_is_stamped() {
        let mut scheduler = EmissionScheduler::new(EmitterConfig {
            source: SourceMode::Entity,
            ..small_config()
        });
        assert!(matches!(
            scheduler.check_sources(),
            Err(EmitterError::MissingSource(_))
        ));
        scheduler.tick(STEP);
        assert_eq!(scheduler.stream().source_positions()[0], Vec3::ZERO);

        let transform = SourceTransform::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_z(1.0));
        scheduler.set_source_transform(transform);
        assert!(scheduler.check_sources().is_ok());
        scheduler.tick(STEP);
        assert_eq!(scheduler.stream().source_positions()[3], transform.position);
        assert_eq!(scheduler.stream().source_rotations()[3], transform.rotation);
    }

    #[test]
    fn test_newest_last_draw_order() {
        let mut scheduler = EmissionScheduler::new(EmitterConfig {
            particle_order: ParticleOrder::NewestLast,
            ..small_config()
        });
        scheduler.tick(STEP);
        scheduler.tick(STEP);
        assert_eq!(scheduler.last_spawned_id(), 4);
        assert_eq!(scheduler.draw_order_id(0), Some(1));
        assert_eq!(scheduler.draw_order_id(3), Some(4));
    }

    #[test]
    fn test_random_seed_fits_packed_float() {
        for _ in 0..64 {
            let seed = resolve_seed(-1);
            assert!((1..RANDOM_SEED_LIMIT).contains(&seed));
            assert_eq!(seed as f32 as u32, seed);
        }
        assert_eq!(resolve_seed(0), 0);
        assert_eq!(resolve_seed(1234), 1234);
    }

    #[test]
    fn test_appearance_uses_curves() {
        let mut config = small_config();
        config.curves = config
            .curves
            .with_opacity(vec![ScalarRange::scalar(1.0, 1.0), ScalarRange::scalar(0.0, 0.0)]);
        let mut scheduler = EmissionScheduler::new(config);
        scheduler.tick(STEP);
        // Slot 0 spawned at 0 with lifetime 1/8: half way at 1/16
        let appearance = scheduler.appearance(0).unwrap();
        assert_eq!(appearance.opacity, 0.5);
        assert_eq!(appearance.scale, 1.0);
        assert_eq!(scheduler.appearance(3), None);
    }
}
