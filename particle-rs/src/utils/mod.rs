//! Shared utilities for the particle-rs CLI

pub mod format;
pub mod io;
pub mod table;

pub use format::*;
pub use io::*;
pub use table::*;
