//! Command implementations

pub mod bounds;
pub mod info;
pub mod params;
pub mod simulate;
