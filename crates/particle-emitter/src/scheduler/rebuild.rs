//! Decide how much work a configuration change needs

use crate::config::{Capacity, EmitterConfig};

/// What has to be redone when moving from one configuration to another
///
/// A buffer rebuild reallocates the attribute stream and restarts the
/// clock. Everything else is applied in place on the next tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildPlan {
    /// Reasons the attribute buffer must be reallocated, empty when it can stay
    pub rebuild_reasons: Vec<&'static str>,
    /// Per-particle ranges changed
    pub update_ranges: bool,
    /// Over-time curves changed
    pub update_curves: bool,
    /// Analytic bounds must be recomputed
    pub update_bounds: bool,
    /// Parameter vector changed
    pub update_params: bool,
    /// Base seed changed
    pub reseed: bool,
}

impl RebuildPlan {
    /// Compare two configurations
    pub fn between(old: &EmitterConfig, new: &EmitterConfig) -> Self {
        let mut rebuild_reasons = Vec::new();

        let old_capacity = Capacity::from_config(old);
        let new_capacity = Capacity::from_config(new);
        if old_capacity.particle_count != new_capacity.particle_count {
            rebuild_reasons.push("particle capacity");
        }
        if old.has_trails() != new.has_trails()
            || old.trail_type != new.trail_type
            || old_capacity.trail_count != new_capacity.trail_count
            || old_capacity.verts_per_particle != new_capacity.verts_per_particle
        {
            rebuild_reasons.push("trail topology");
        }
        if old.over_time_slots() != new.over_time_slots() {
            rebuild_reasons.push("over-time slots");
        }

        let update_ranges = old.ranges != new.ranges || old.lifetime != new.lifetime;
        let update_curves = old.curves != new.curves;
        let update_bounds =
            old.ranges != new.ranges || old.lifetime != new.lifetime || old.drag != new.drag;
        let update_params = old.spawn_type != new.spawn_type
            || old.spawn_rate != new.spawn_rate
            || old.duration != new.duration
            || old.delay != new.delay
            || old.direction != new.direction
            || old.drag != new.drag
            || old.seed != new.seed
            || old.particle_order != new.particle_order
            || old.trail_interval != new.trail_interval
            || update_curves
            || !rebuild_reasons.is_empty();

        Self {
            rebuild_reasons,
            update_ranges,
            update_curves,
            update_bounds,
            update_params,
            reseed: old.seed != new.seed,
        }
    }

    /// Plan for an emitter with no previous buffer
    pub fn full() -> Self {
        Self {
            rebuild_reasons: vec!["initial build"],
            update_ranges: true,
            update_curves: true,
            update_bounds: true,
            update_params: true,
            reseed: true,
        }
    }

    /// True when the attribute buffer must be reallocated
    pub fn needs_rebuild(&self) -> bool {
        !self.rebuild_reasons.is_empty()
    }

    /// True when nothing changed
    pub fn is_noop(&self) -> bool {
        !self.needs_rebuild()
            && !self.update_ranges
            && !self.update_curves
            && !self.update_bounds
            && !self.update_params
            && !self.reseed
    }

    /// Human readable list of rebuild reasons
    pub fn describe(&self) -> String {
        self.rebuild_reasons.join(", ")
    }
}
