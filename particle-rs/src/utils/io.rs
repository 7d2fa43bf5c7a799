//! Descriptor loading

use anyhow::{Context, Result};
use particle_emitter::{EmissionScheduler, EmitterDescriptor};
use std::fs;
use std::path::Path;

/// Descriptor file syntax, picked from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorSyntax {
    Json,
    Yaml,
}

impl DescriptorSyntax {
    /// `.yaml` and `.yml` are YAML, everything else JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Parse descriptor text; missing fields take their defaults
pub fn parse_descriptor(text: &str, syntax: DescriptorSyntax) -> Result<EmitterDescriptor> {
    match syntax {
        DescriptorSyntax::Json => {
            serde_json::from_str(text).context("Failed to parse JSON descriptor")
        }
        DescriptorSyntax::Yaml => {
            serde_yaml_ng::from_str(text).context("Failed to parse YAML descriptor")
        }
    }
}

/// Read a descriptor from disk
pub fn load_descriptor(path: &Path) -> Result<EmitterDescriptor> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read descriptor {}", path.display()))?;
    let descriptor = parse_descriptor(&text, DescriptorSyntax::from_path(path))
        .with_context(|| format!("Invalid descriptor file {}", path.display()))?;
    log::debug!("Loaded descriptor {}: {:?}", path.display(), descriptor);
    Ok(descriptor)
}

/// Read a descriptor and build a scheduler for it
pub fn load_scheduler(path: &Path) -> Result<EmissionScheduler> {
    let descriptor = load_descriptor(path)?;
    let config = descriptor
        .into_config()
        .with_context(|| format!("Invalid emitter configuration in {}", path.display()))?;
    let scheduler = EmissionScheduler::try_new(config)?;
    if let Err(err) = scheduler.check_sources() {
        log::warn!("{}; particles spawn in emitter space", err);
    }
    Ok(scheduler)
}
