//! Over-time curves: how color, opacity, rotation and scale change with age
//!
//! A curve is a list of ranges spread evenly over the normalized lifetime
//! `0..1`. Evaluation picks the bracketing pair, samples both ends with the
//! same seed so one particle keeps a coherent look, and interpolates.

use crate::random::SeededRandom;
use crate::range::{RangeSpec, ScalarRange, Vec3Range};

/// Default number of entries per over-time channel
pub const DEFAULT_OVER_TIME_SLOTS: usize = 5;

/// Neutral color (white)
pub const NEUTRAL_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
/// Neutral opacity (opaque)
pub const NEUTRAL_OPACITY: [f32; 1] = [1.0];
/// Neutral rotation (degrees)
pub const NEUTRAL_ROTATION: [f32; 1] = [0.0];
/// Neutral scale
pub const NEUTRAL_SCALE: [f32; 1] = [1.0];

/// Piecewise table of ranges over a particle's lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct OverTimeCurve<const N: usize> {
    entries: Vec<RangeSpec<N>>,
    neutral: [f32; N],
}

impl<const N: usize> OverTimeCurve<N> {
    /// Empty curve that evaluates to `neutral`
    pub fn empty(neutral: [f32; N]) -> Self {
        Self {
            entries: Vec::new(),
            neutral,
        }
    }

    /// Build a curve, keeping at most `slots` entries
    pub fn new(mut entries: Vec<RangeSpec<N>>, slots: usize, neutral: [f32; N]) -> Self {
        if entries.len() > slots {
            log::trace!(
                "Truncating over-time curve from {} to {} entries",
                entries.len(),
                slots
            );
            entries.truncate(slots);
        }
        Self { entries, neutral }
    }

    /// Entries in lifetime order
    pub fn entries(&self) -> &[RangeSpec<N>] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the curve has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value used when the curve has no entries
    pub fn neutral(&self) -> [f32; N] {
        self.neutral
    }

    /// Evaluate at `ratio` (clamped to `0..1`) for a particle `seed`
    pub fn evaluate(&self, ratio: f32, rng: &mut SeededRandom, seed: f64) -> [f32; N] {
        match self.entries.as_slice() {
            [] => self.neutral,
            [only] => only.sample(rng, seed),
            entries => {
                let (index, t) = segment(ratio, entries.len());
                // Both ends see the same draws
                let mut end_rng = rng.clone();
                let a = entries[index].sample(rng, seed);
                let b = entries[index + 1].sample(&mut end_rng, seed);
                std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
            }
        }
    }

    /// Pad or clip the entries to exactly `slots`, repeating the last entry
    pub fn padded(&self, slots: usize) -> Vec<RangeSpec<N>> {
        let fill = self
            .entries
            .last()
            .copied()
            .unwrap_or_else(|| RangeSpec::fixed(self.neutral));
        (0..slots)
            .map(|i| self.entries.get(i).copied().unwrap_or(fill))
            .collect()
    }
}

/// Segment index and fractional position for `ratio` over `n` entries (n >= 2)
fn segment(ratio: f32, n: usize) -> (usize, f32) {
    let scaled = ratio.clamp(0.0, 1.0) * (n - 1) as f32;
    let index = (scaled.floor() as usize).min(n - 2);
    (index, scaled - index as f32)
}

/// All over-time channels of one emitter
#[derive(Debug, Clone, PartialEq)]
pub struct OverTimeTables {
    /// Maximum entries per channel
    pub slots: usize,
    /// RGB color
    pub color: OverTimeCurve<3>,
    /// Opacity
    pub opacity: OverTimeCurve<1>,
    /// Rotation in degrees
    pub rotation: OverTimeCurve<1>,
    /// Uniform scale
    pub scale: OverTimeCurve<1>,
}

/// Appearance of one particle at a given age
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    /// RGB color
    pub color: [f32; 3],
    /// Opacity
    pub opacity: f32,
    /// Rotation in degrees
    pub rotation: f32,
    /// Uniform scale
    pub scale: f32,
}

impl OverTimeTables {
    /// Tables with every channel empty
    pub fn new(slots: usize) -> Self {
        Self {
            slots,
            color: OverTimeCurve::empty(NEUTRAL_COLOR),
            opacity: OverTimeCurve::empty(NEUTRAL_OPACITY),
            rotation: OverTimeCurve::empty(NEUTRAL_ROTATION),
            scale: OverTimeCurve::empty(NEUTRAL_SCALE),
        }
    }

    /// Replace the color channel
    pub fn with_color(mut self, entries: Vec<Vec3Range>) -> Self {
        self.color = OverTimeCurve::new(entries, self.slots, NEUTRAL_COLOR);
        self
    }

    /// Replace the opacity channel
    pub fn with_opacity(mut self, entries: Vec<ScalarRange>) -> Self {
        self.opacity = OverTimeCurve::new(entries, self.slots, NEUTRAL_OPACITY);
        self
    }

    /// Replace the rotation channel
    pub fn with_rotation(mut self, entries: Vec<ScalarRange>) -> Self {
        self.rotation = OverTimeCurve::new(entries, self.slots, NEUTRAL_ROTATION);
        self
    }

    /// Replace the scale channel
    pub fn with_scale(mut self, entries: Vec<ScalarRange>) -> Self {
        self.scale = OverTimeCurve::new(entries, self.slots, NEUTRAL_SCALE);
        self
    }

    /// Largest scale any particle can reach
    pub fn max_scale(&self) -> f32 {
        if self.scale.is_empty() {
            return NEUTRAL_SCALE[0];
        }
        self.scale
            .entries()
            .iter()
            .map(|r| r.max_abs()[0])
            .fold(0.0, f32::max)
    }

    /// Evaluate every channel for one particle
    ///
    /// Each channel starts from a fresh draw sequence so adding entries to
    /// one channel does not shift the random values of another.
    pub fn evaluate(&self, ratio: f32, seed: f64) -> Appearance {
        let mut rng = SeededRandom::new();
        let color = self.color.evaluate(ratio, &mut rng, seed);
        rng.reset();
        let opacity = self.opacity.evaluate(ratio, &mut rng, seed)[0];
        rng.reset();
        let rotation = self.rotation.evaluate(ratio, &mut rng, seed)[0];
        rng.reset();
        let scale = self.scale.evaluate(ratio, &mut rng, seed)[0];
        Appearance {
            color,
            opacity,
            rotation,
            scale,
        }
    }

    /// Color and opacity packed as `[r, g, b, a]`, min then max for each slot
    ///
    /// The two channels are sized independently; each is padded to `slots`
    /// by repeating its last entry.
    pub fn pack_color_opacity(&self) -> Vec<[f32; 4]> {
        let color = self.color.padded(self.slots);
        let opacity = self.opacity.padded(self.slots);
        color
            .iter()
            .zip(opacity.iter())
            .flat_map(|(c, o)| {
                [
                    [c.min[0], c.min[1], c.min[2], o.min[0]],
                    [c.max[0], c.max[1], c.max[2], o.max[0]],
                ]
            })
            .collect()
    }

    /// Rotation and scale packed as `[rot_min, rot_max, scale_min, scale_max]`
    pub fn pack_rotation_scale(&self) -> Vec<[f32; 4]> {
        let rotation = self.rotation.padded(self.slots);
        let scale = self.scale.padded(self.slots);
        rotation
            .iter()
            .zip(scale.iter())
            .map(|(r, s)| [r.min[0], r.max[0], s.min[0], s.max[0]])
            .collect()
    }

    /// Entry counts of each channel: color, opacity, rotation, scale
    pub fn lengths(&self) -> [usize; 4] {
        [
            self.color.len(),
            self.opacity.len(),
            self.rotation.len(),
            self.scale.len(),
        ]
    }
}

impl Default for OverTimeTables {
    fn default() -> Self {
        Self::new(DEFAULT_OVER_TIME_SLOTS)
    }
}
