pub mod color;
pub mod config;
pub mod geometry;
pub mod snapshot;

pub use color::*;
pub use config::*;
pub use geometry::*;
pub use snapshot::*;

/// Storage key the world snapshot is saved under
pub const SNAPSHOT_KEY: &str = "CanvasData";
