//! Model Viewer Core Data Structures
//!
//! This crate contains the viewer-independent pieces of the measurement ruler:
//! - BoundingBox / BoundingSphere: measured target extents
//! - ViewDirection: the six axis-aligned presets and their side tables
//! - CameraState: eye/center/up orbit state
//! - Tick planning and tick number formatting
//! - ViewerConfig: RON-backed configuration

pub mod bounds;
pub mod camera;
pub mod config;
pub mod direction;
pub mod ticks;

pub use bounds::*;
pub use camera::*;
pub use config::*;
pub use direction::*;
pub use ticks::*;
