//! `info`: capacity and derived parameters of a descriptor

use anyhow::Result;
use particle_emitter::{
    Direction, EmissionScheduler, ParticleOrder, SourceMode, SpawnType, TrailType,
};
use serde::Serialize;
use std::path::Path;

use crate::utils::{OutputFormat, format_range, load_scheduler, property_table, render_serialized};

/// Summary of one emitter configuration
#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub spawn_type: SpawnType,
    pub spawn_rate: f64,
    pub lifetime: [f32; 2],
    pub duration: Option<f64>,
    pub delay: f64,
    pub direction: Direction,
    pub particle_order: ParticleOrder,
    pub source: SourceMode,
    pub seed: u32,
    pub trail_type: Option<TrailType>,
    pub trail_interval: f64,
    pub particle_count: usize,
    pub trail_count: usize,
    pub verts_per_particle: usize,
    pub slot_count: usize,
    pub over_time_slots: usize,
    /// Entries of the color, opacity, rotation and scale curves
    pub curve_entries: [usize; 4],
}

impl InfoReport {
    pub fn new(scheduler: &EmissionScheduler) -> Self {
        let config = scheduler.config();
        let capacity = scheduler.capacity();
        Self {
            spawn_type: config.spawn_type,
            spawn_rate: config.spawn_rate,
            lifetime: [config.lifetime.lo(), config.lifetime.hi()],
            duration: config.is_finite().then_some(config.duration),
            delay: config.delay,
            direction: config.direction,
            particle_order: config.particle_order,
            source: config.source,
            seed: scheduler.base_seed(),
            trail_type: config.has_trails().then_some(config.trail_type),
            trail_interval: config.trail_interval,
            particle_count: capacity.particle_count,
            trail_count: capacity.trail_count,
            verts_per_particle: capacity.verts_per_particle,
            slot_count: capacity.count(),
            over_time_slots: config.over_time_slots(),
            curve_entries: config.curves.lengths(),
        }
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Spawn type", format!("{:?}", self.spawn_type)),
            ("Spawn rate", format!("{}/s", self.spawn_rate)),
            ("Lifetime", format!("{}s", format_range(self.lifetime[0], self.lifetime[1]))),
            (
                "Duration",
                self.duration
                    .map_or_else(|| "infinite".to_string(), |d| format!("{d}s")),
            ),
            ("Delay", format!("{}s", self.delay)),
            ("Direction", format!("{:?}", self.direction)),
            ("Particle order", format!("{:?}", self.particle_order)),
            ("Source", format!("{:?}", self.source)),
            ("Seed", self.seed.to_string()),
            (
                "Trails",
                self.trail_type.map_or_else(
                    || "none".to_string(),
                    |t| format!("{:?} every {}s", t, self.trail_interval),
                ),
            ),
            ("Particles", self.particle_count.to_string()),
            ("Trail points", self.trail_count.to_string()),
            ("Verts per point", self.verts_per_particle.to_string()),
            ("Slots", self.slot_count.to_string()),
            ("Over-time slots", self.over_time_slots.to_string()),
            (
                "Curve entries",
                format!(
                    "color {}, opacity {}, rotation {}, scale {}",
                    self.curve_entries[0],
                    self.curve_entries[1],
                    self.curve_entries[2],
                    self.curve_entries[3]
                ),
            ),
        ]
    }
}

pub fn execute(path: &Path, format: OutputFormat) -> Result<()> {
    let scheduler = load_scheduler(path)?;
    let report = InfoReport::new(&scheduler);

    match render_serialized(&report, format)? {
        Some(text) => println!("{text}"),
        None => {
            println!("Emitter: {}", path.display());
            property_table(&report.rows()).printstd();
        }
    }
    Ok(())
}
