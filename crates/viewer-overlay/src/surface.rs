//! Render surface collaborator
//!
//! The viewer object itself lives in the host. This module describes what the
//! ruler and camera engine need from it.

use viewer_core::{BoundingBox, BoundingSphere, CameraState};

use crate::overlay::RulerOverlay;

/// Host-side identifier of a renderable mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// One renderable mesh of the current object, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshEntry {
    pub index: usize,
    pub handle: MeshHandle,
    /// World-space bounds of the mesh.
    pub bounds: BoundingBox,
}

/// Which meshes a measurement or bounding query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshFilter {
    /// The whole object.
    #[default]
    All,
    /// A single mesh by traversal index.
    Index(usize),
}

impl MeshFilter {
    /// Map the host's mesh index convention (`-1` or absent = whole object).
    ///
    /// Indices too large for `usize` saturate, so they match no mesh instead
    /// of wrapping onto a real one.
    pub fn from_index(index: Option<i64>) -> Self {
        match index {
            Some(i) if i >= 0 => MeshFilter::Index(usize::try_from(i).unwrap_or(usize::MAX)),
            _ => MeshFilter::All,
        }
    }

    pub fn matches(&self, entry: &MeshEntry) -> bool {
        match self {
            MeshFilter::All => true,
            MeshFilter::Index(i) => entry.index == *i,
        }
    }
}

/// The 3D display surface driven by the bridge.
pub trait RenderSurface {
    /// Current camera.
    fn camera(&self) -> CameraState;

    /// Replace the camera.
    fn set_camera(&mut self, camera: CameraState);

    /// Request a redraw.
    fn render(&mut self);

    /// Meshes of the current object in deterministic traversal order.
    /// Empty when no object is loaded.
    fn meshes(&self) -> Vec<MeshEntry>;

    /// Bounding sphere of the meshes selected by `filter`.
    fn bounding_sphere(&self, filter: MeshFilter) -> Option<BoundingSphere>;

    /// Fit near/far clipping planes around `sphere`.
    fn adjust_clipping_planes(&mut self, sphere: BoundingSphere);

    /// Move the camera so `sphere` fills the view.
    fn fit_sphere_to_view(&mut self, sphere: BoundingSphere, animated: bool);

    /// Show an overlay group. Replaces nothing; call
    /// [`clear_overlay_group`](Self::clear_overlay_group) first.
    fn add_overlay_group(&mut self, overlay: &RulerOverlay);

    /// Remove the overlay group.
    fn clear_overlay_group(&mut self);

    /// Opacity multiplier applied to every line and label of the overlay.
    fn set_overlay_opacity(&mut self, opacity: f32);
}

/// Bounding box of the meshes selected by `filter`, or `None` when nothing
/// matches (no object loaded, bad index).
pub fn measure_target(meshes: &[MeshEntry], filter: MeshFilter) -> Option<BoundingBox> {
    meshes
        .iter()
        .filter(|entry| filter.matches(entry))
        .map(|entry| entry.bounds)
        .reduce(|acc, b| acc.union(&b))
}
