//! `params`: packed parameter vector after a simulated interval

use anyhow::Result;
use particle_emitter::ParamSlot;
use serde::Serialize;
use std::path::Path;

use super::simulate::{run, tick_count};
use crate::utils::{OutputFormat, add_table_row, create_table, load_scheduler, render_serialized};

#[derive(Debug, Serialize)]
pub struct ParamEntry {
    pub index: usize,
    pub name: &'static str,
    pub value: f32,
}

pub fn execute(path: &Path, seconds: f64, fps: u32, format: OutputFormat) -> Result<()> {
    let ticks = tick_count(seconds, fps)?;
    let mut scheduler = load_scheduler(path)?;
    run(&mut scheduler, ticks, fps, |_, _, _| {});

    let packed = scheduler.params().to_array();
    let entries: Vec<ParamEntry> = ParamSlot::ALL
        .iter()
        .map(|slot| ParamEntry {
            index: slot.index(),
            name: slot.name(),
            value: packed[slot.index()],
        })
        .collect();

    match render_serialized(&entries, format)? {
        Some(text) => println!("{text}"),
        None => {
            let mut table = create_table(vec!["Slot", "Name", "Value"]);
            for entry in &entries {
                add_table_row(
                    &mut table,
                    vec![
                        entry.index.to_string(),
                        entry.name.to_string(),
                        entry.value.to_string(),
                    ],
                );
            }
            table.printstd();
        }
    }
    Ok(())
}
