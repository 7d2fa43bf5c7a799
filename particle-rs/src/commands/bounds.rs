//! `bounds`: analytic bounding volume of a descriptor

use anyhow::Result;
use particle_emitter::Bounds;
use serde::Serialize;
use std::path::Path;

use crate::utils::{OutputFormat, format_vec3, load_scheduler, property_table, render_serialized};

#[derive(Debug, Serialize)]
pub struct BoundsReport {
    pub min: [f32; 3],
    pub max: [f32; 3],
    pub center: [f32; 3],
    pub size: [f32; 3],
    pub radius: f32,
}

impl From<Bounds> for BoundsReport {
    fn from(bounds: Bounds) -> Self {
        Self {
            min: bounds.min.to_array(),
            max: bounds.max.to_array(),
            center: bounds.center().to_array(),
            size: bounds.size().to_array(),
            radius: bounds.radius,
        }
    }
}

pub fn execute(path: &Path, format: OutputFormat) -> Result<()> {
    let scheduler = load_scheduler(path)?;
    let bounds = scheduler.bounds();
    let report = BoundsReport::from(bounds);

    match render_serialized(&report, format)? {
        Some(text) => println!("{text}"),
        None => {
            println!("Bounds: {}", path.display());
            property_table(&[
                ("Min", format_vec3(bounds.min)),
                ("Max", format_vec3(bounds.max)),
                ("Center", format_vec3(bounds.center())),
                ("Size", format_vec3(bounds.size())),
                ("Radius", format!("{:.3}", bounds.radius)),
            ])
            .printstd();
        }
    }
    Ok(())
}
