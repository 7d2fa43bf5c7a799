//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use glam::Vec3;
use serde::Serialize;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable table
    Table,
    /// Pretty printed JSON
    Json,
    /// YAML document
    Yaml,
}

/// Render a report as JSON or YAML; `None` for table output
pub fn render_serialized<T: Serialize>(value: &T, format: OutputFormat) -> Result<Option<String>> {
    match format {
        OutputFormat::Table => Ok(None),
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(Some)
            .context("Failed to serialize report as JSON"),
        OutputFormat::Yaml => serde_yaml_ng::to_string(value)
            .map(Some)
            .context("Failed to serialize report as YAML"),
    }
}

/// Format a vector with fixed precision
pub fn format_vec3(v: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

/// Format a `min..max` pair, collapsing equal ends
pub fn format_range(min: f32, max: f32) -> String {
    if min == max {
        format!("{min}")
    } else {
        format!("{min}..{max}")
    }
}
