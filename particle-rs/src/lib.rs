//! Particle-RS library
//!
//! Command implementations and helpers behind the `particle-rs` binary.

pub mod cli;
pub mod commands;
pub mod utils;
