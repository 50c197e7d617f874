//! Model Viewer Ruler Overlay
//!
//! Builds the three-axis measurement ruler drawn over the displayed model.
//!
//! # Architecture
//!
//! - [`ruler::build_axis_ruler`] - Geometry and labels for one axis
//! - [`overlay::OverlayManager`] - Lifecycle of the full three-axis overlay
//! - [`surface::RenderSurface`] - Render surface the overlay is pushed to
//! - [`label::LabelRenderer`] - Text label rasterizer supplied by the host

pub mod label;
pub mod overlay;
pub mod ruler;
pub mod style;
pub mod surface;

pub use label::{LabelHandle, LabelRenderer, LabelSprite, RenderedLabel};
pub use overlay::{OverlayManager, RulerOverlay};
pub use ruler::{
    AxisPlacement, AxisRuler, RulerLine, RulerParams, TickEntry, axis_placement, build_axis_ruler,
};
pub use style::{LineStyle, LineVertex};
pub use surface::{MeshEntry, MeshFilter, MeshHandle, RenderSurface, measure_target};
