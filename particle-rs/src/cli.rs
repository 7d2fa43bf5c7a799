//! Root CLI structure for particle-rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::OutputFormat;

#[derive(Parser)]
#[command(name = "particle-rs")]
#[command(about = "Inspect and simulate particle emitter descriptors", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show capacity and derived parameters of an emitter descriptor
    Info {
        /// Path to the descriptor (JSON or YAML)
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Run the scheduler and report spawns and dirty ranges
    Simulate {
        /// Path to the descriptor (JSON or YAML)
        file: PathBuf,

        /// Seconds to simulate
        #[arg(short, long, default_value = "2.0")]
        seconds: f64,

        /// Ticks per second
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Print every Nth tick (0 prints only the summary)
        #[arg(short, long, default_value = "0")]
        every: usize,
    },

    /// Show the analytic bounding box and sphere
    Bounds {
        /// Path to the descriptor (JSON or YAML)
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the packed parameter vector after simulating
    Params {
        /// Path to the descriptor (JSON or YAML)
        file: PathBuf,

        /// Seconds to simulate before sampling
        #[arg(short, long, default_value = "0.0")]
        seconds: f64,

        /// Ticks per second
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
