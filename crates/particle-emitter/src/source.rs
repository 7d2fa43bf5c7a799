//! External spawn sources: a moving entity transform or a model surface

use glam::{Quat, Vec3};

use crate::config::SurfaceMode;
use crate::error::{EmitterError, Result};
use crate::random::SeededRandom;

/// Position and orientation of a source entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceTransform {
    /// World position
    pub position: Vec3,
    /// World orientation
    pub rotation: Quat,
}

impl SourceTransform {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Transform from parts
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

impl Default for SourceTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Flattened, non-indexed triangle list of a model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelSurface {
    vertices: Vec<Vec3>,
}

impl ModelSurface {
    /// Surface from vertices, three per triangle
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self { vertices }
    }

    /// Surface from a flat `x y z x y z ...` buffer
    pub fn from_flat(data: &[f32]) -> Result<Self> {
        if data.len() % 3 != 0 {
            return Err(EmitterError::Parse(format!(
                "vertex buffer length {} is not a multiple of 3",
                data.len()
            )));
        }
        Ok(Self {
            vertices: data
                .chunks_exact(3)
                .map(|c| Vec3::new(c[0], c[1], c[2]))
                .collect(),
        })
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of complete triangles
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// True when there is nothing to sample
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Corners of the box around every vertex, `None` when empty
    ///
    /// Edge and triangle samples are convex combinations of vertices, so the
    /// box holds every point [`ModelSurface::sample`] can return.
    pub fn aabb(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
        )
    }

    /// Pick a point on the surface for a particle seed
    ///
    /// Returns `None` when the surface has no geometry for `mode`.
    pub fn sample(&self, mode: SurfaceMode, rng: &mut SeededRandom, seed: f64) -> Option<Vec3> {
        match mode {
            SurfaceMode::Vertex => {
                let index = pick(rng, seed, self.vertices.len())?;
                Some(self.vertices[index])
            }
            SurfaceMode::Edge => {
                let [a, b, c] = self.triangle(pick(rng, seed, self.triangle_count())?);
                let (start, end) = match pick(rng, seed, 3)? {
                    0 => (a, b),
                    1 => (b, c),
                    _ => (c, a),
                };
                let t = rng.next_float(seed) as f32;
                Some(start.lerp(end, t))
            }
            SurfaceMode::Triangle => {
                let [a, b, c] = self.triangle(pick(rng, seed, self.triangle_count())?);
                // Uniform barycentric sample
                let r1 = (rng.next_float(seed) as f32).sqrt();
                let r2 = rng.next_float(seed) as f32;
                Some(a * (1.0 - r1) + b * (r1 * (1.0 - r2)) + c * (r1 * r2))
            }
        }
    }

    fn triangle(&self, index: usize) -> [Vec3; 3] {
        let base = index * 3;
        [
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        ]
    }
}

fn pick(rng: &mut SeededRandom, seed: f64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let index = (rng.next_float(seed) * len as f64) as usize;
    Some(index.min(len - 1))
}
