//! Analytic bounding volume of everything an emitter can produce
//!
//! Motion along each axis is `f(t) = offset + v*t + a*t^2/2`. For `t >= 0`
//! it grows with each of offset, v and a, so the smallest value over the
//! whole range table comes from the range minima and the largest from the
//! maxima. Each extreme is found by checking `t = 0`, `t = max_age` and the
//! turning point `t = -v/a`.

use glam::Vec3;

use crate::config::EmitterConfig;
use crate::range::{ParameterRangeTable, RadialType, ScalarRange};

/// Axis-aligned box plus enclosing sphere (both centered on the emitter)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower corner
    pub min: Vec3,
    /// Upper corner
    pub max: Vec3,
    /// Radius of a sphere at the origin containing the box
    pub radius: f32,
}

impl Bounds {
    /// True when `point` lies inside the box (inclusive)
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Box center
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Box size
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Effective maximum age used by the motion model
pub fn max_age(max_lifetime: f32, drag: f32) -> f32 {
    if drag > 0.0 {
        max_lifetime * (1.0 - 0.5 * drag)
    } else {
        max_lifetime
    }
}

/// Minimum and maximum of `offset + v*t + a*t^2/2` over `t in [0, max_age]`
pub fn extent_1d(offset: f32, velocity: f32, acceleration: f32, max_age: f32) -> (f32, f32) {
    let f = |t: f32| offset + velocity * t + 0.5 * acceleration * t * t;

    let mut lo = f(0.0).min(f(max_age));
    let mut hi = f(0.0).max(f(max_age));

    if acceleration != 0.0 {
        let turning = -velocity / acceleration;
        if turning > 0.0 && turning < max_age {
            let value = f(turning);
            lo = lo.min(value);
            hi = hi.max(value);
        }
    }

    (lo, hi)
}

/// Analytic bounds estimator
#[derive(Debug, Clone, Copy)]
pub struct BoundsEstimator<'a> {
    ranges: &'a ParameterRangeTable,
    max_age: f32,
    /// Box of spawn points added on top of the sampled position
    surface: Option<(Vec3, Vec3)>,
}

impl<'a> BoundsEstimator<'a> {
    /// Estimator over a range table and a maximum age
    pub fn new(ranges: &'a ParameterRangeTable, max_age: f32) -> Self {
        Self {
            ranges,
            max_age,
            surface: None,
        }
    }

    /// Widen the spawn position by a surface box, as model sources do
    pub fn with_surface(mut self, surface: Option<(Vec3, Vec3)>) -> Self {
        self.surface = surface;
        self
    }

    /// Estimator for a whole configuration
    pub fn for_config(config: &'a EmitterConfig) -> Self {
        let max_lifetime = config.lifetime.lo().max(config.lifetime.hi());
        Self::new(&config.ranges, max_age(max_lifetime, config.drag))
    }

    /// Range of the radial distance
    pub fn radial_extent(&self) -> (f32, f32) {
        scalar_extent(
            &self.ranges.radial_position,
            &self.ranges.radial_velocity,
            &self.ranges.radial_acceleration,
            self.max_age,
        )
    }

    /// Compute the box and sphere
    pub fn estimate(&self) -> Bounds {
        let r = self.ranges;
        let mut min = [0.0f32; 3];
        let mut max = [0.0f32; 3];
        for axis in 0..3 {
            let (lo, _) = extent_1d(
                r.position.min[axis],
                r.velocity.min[axis],
                r.acceleration.min[axis],
                self.max_age,
            );
            let (_, hi) = extent_1d(
                r.position.max[axis],
                r.velocity.max[axis],
                r.acceleration.max[axis],
                self.max_age,
            );
            min[axis] = lo;
            max[axis] = hi;
        }

        // The surface point is a constant offset for the whole life
        if let Some((surface_min, surface_max)) = self.surface {
            for axis in 0..3 {
                min[axis] += surface_min[axis];
                max[axis] += surface_max[axis];
            }
        }

        // Radial motion can point anywhere in its plane or sphere
        let (radial_lo, radial_hi) = self.radial_extent();
        let radial = radial_lo.abs().max(radial_hi.abs());
        let radial_axes = match r.radial_type {
            RadialType::Circle => 2,
            RadialType::Sphere => 3,
        };
        for axis in 0..radial_axes {
            min[axis] -= radial;
            max[axis] += radial;
        }

        let mut min = Vec3::from_array(min);
        let mut max = Vec3::from_array(max);

        // Rotation about the origin can carry a corner onto any axis
        if r.has_rotation() {
            let reach = min.abs().max(max.abs()).length();
            min = Vec3::splat(-reach);
            max = Vec3::splat(reach);
        }

        let radius = min.abs().max(max.abs()).length();
        Bounds { min, max, radius }
    }
}

fn scalar_extent(
    offset: &ScalarRange,
    velocity: &ScalarRange,
    acceleration: &ScalarRange,
    max_age: f32,
) -> (f32, f32) {
    let (lo, _) = extent_1d(offset.lo(), velocity.lo(), acceleration.lo(), max_age);
    let (_, hi) = extent_1d(offset.hi(), velocity.hi(), acceleration.hi(), max_age);
    (lo, hi)
}
