//! Deterministic particle emission scheduling
//!
//! A ring buffer of particle slots filled on a fixed spawn cadence, with
//! seeded per-particle attributes, over-time appearance curves, analytic
//! bounds and a parameter vector for the renderer.
//!
//! ```
//! use particle_emitter::{EmissionScheduler, EmitterDescriptor};
//!
//! let descriptor = EmitterDescriptor {
//!     spawn_rate: 20.0,
//!     lifetime: "0.5..1".to_string(),
//!     velocity: "-1 2 -1..1 4 1".to_string(),
//!     seed: 42,
//!     ..Default::default()
//! };
//! let mut scheduler = EmissionScheduler::try_new(descriptor.into_config()?)?;
//! let range = scheduler.tick(1.0 / 60.0);
//! assert!(range.end() <= scheduler.capacity().count());
//! # Ok::<(), particle_emitter::EmitterError>(())
//! ```

pub mod bounds;
pub mod color;
pub mod config;
pub mod curve;
pub mod error;
pub mod params;
pub mod random;
pub mod range;
pub mod scheduler;
pub mod source;
pub mod stream;

// Re-export common types
pub use bounds::{Bounds, BoundsEstimator};
pub use config::{
    Capacity, Direction, EmitterConfig, EmitterDescriptor, MAX_SLOTS, MAX_TRAIL_POINTS,
    ParticleOrder, SourceMode, SpawnType, SurfaceMode, TrailType,
};
pub use curve::{Appearance, OverTimeCurve, OverTimeTables};
pub use error::{EmitterError, Result};
pub use params::{EmitterParams, PARAM_COUNT, ParamSlot};
pub use random::{RANDOM_REPEAT_COUNT, SeededRandom, virtual_seed};
pub use range::{ParameterRangeTable, RadialType, ScalarRange, Vec3Range};
pub use scheduler::{EmissionScheduler, MAX_TICK, RebuildPlan, SchedulerState};
pub use source::{ModelSurface, SourceTransform};
pub use stream::{AttributeStream, DirtyRange, INACTIVE_ID, SlotAttributes};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
