//! `simulate`: run the scheduler and report what each tick touched

use anyhow::{Result, bail};
use particle_emitter::{DirtyRange, EmissionScheduler};
use std::path::Path;

use crate::utils::load_scheduler;

/// Totals over a simulation run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: usize,
    pub dirty_ticks: usize,
    pub full_rewrites: usize,
    pub slots_uploaded: usize,
}

/// Number of ticks covering `seconds` at `fps`
pub fn tick_count(seconds: f64, fps: u32) -> Result<usize> {
    if fps == 0 {
        bail!("--fps must be at least 1");
    }
    if !seconds.is_finite() || seconds < 0.0 {
        bail!("--seconds must be zero or positive, got {seconds}");
    }
    Ok((seconds * f64::from(fps)).round() as usize)
}

/// Tick `ticks` times at `1 / fps`, calling `on_tick` after each one
pub fn run<F>(scheduler: &mut EmissionScheduler, ticks: usize, fps: u32, mut on_tick: F) -> RunStats
where
    F: FnMut(usize, &EmissionScheduler, DirtyRange),
{
    let dt = 1.0 / f64::from(fps);
    let mut stats = RunStats::default();
    for tick in 0..ticks {
        let range = scheduler.tick(dt);
        stats.ticks += 1;
        if !range.is_empty() {
            stats.dirty_ticks += 1;
            stats.slots_uploaded += range.count;
        }
        if scheduler.needs_full_rewrite() {
            stats.full_rewrites += 1;
        }
        on_tick(tick, scheduler, range);
    }
    stats
}

pub fn execute(path: &Path, seconds: f64, fps: u32, every: usize) -> Result<()> {
    let ticks = tick_count(seconds, fps)?;
    let mut scheduler = load_scheduler(path)?;
    log::info!(
        "Simulating {} for {}s at {} fps ({} ticks)",
        path.display(),
        seconds,
        fps,
        ticks
    );

    let mut last_spawned = 0;
    let stats = run(&mut scheduler, ticks, fps, |tick, scheduler, range| {
        let spawned = scheduler.total_spawned();
        if every > 0 && tick % every == 0 {
            println!(
                "t={:>8.4}s  spawned {:>4}  range {:>6}..{:<6} alive {:>5}{}",
                scheduler.emitter_time(),
                spawned.saturating_sub(last_spawned),
                range.offset,
                range.end(),
                scheduler.alive_count(),
                if scheduler.needs_full_rewrite() {
                    "  (full)"
                } else {
                    ""
                }
            );
        }
        last_spawned = spawned;
    });

    let capacity = scheduler.capacity();
    println!("Ticks:          {}", stats.ticks);
    println!("Emitter time:   {:.4}s", scheduler.emitter_time());
    println!("Spawned:        {}", scheduler.total_spawned());
    println!("Dirty ticks:    {}", stats.dirty_ticks);
    println!("Full rewrites:  {}", stats.full_rewrites);
    println!("Slots uploaded: {}", stats.slots_uploaded);
    println!(
        "Alive:          {} / {}",
        scheduler.alive_count(),
        capacity.particle_count
    );
    println!("State:          {}", scheduler.state());
    Ok(())
}
