//! Headless render surface and label renderer
//!
//! Record everything the bridge asks of them. Used by the demo binary and by
//! tests that drive the bridge end to end without a GPU.

use std::collections::HashMap;

use glam::DVec3;
use viewer_core::{BoundingBox, BoundingSphere, CameraState};
use viewer_overlay::{
    LabelHandle, LabelRenderer, LineVertex, MeshEntry, MeshFilter, MeshHandle, RenderSurface,
    RenderedLabel, RulerOverlay, measure_target,
};

/// Vertical field of view used when fitting a sphere to the view.
const FIT_FOV_Y: f64 = std::f64::consts::FRAC_PI_4;

/// Snapshot of the overlay group last pushed to the surface.
#[derive(Debug, Clone)]
pub struct OverlayGroup {
    pub id: uuid::Uuid,
    pub vertices: Vec<LineVertex>,
    pub label_count: usize,
}

/// In-memory render surface.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    camera: CameraState,
    meshes: Vec<MeshEntry>,
    overlay: Option<OverlayGroup>,
    overlay_opacity: f32,
    clipping_sphere: Option<BoundingSphere>,
    frames_rendered: usize,
    /// Overlay opacity of every rendered frame that showed an overlay.
    presented_opacities: Vec<f32>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            overlay_opacity: 1.0,
            ..Default::default()
        }
    }

    /// Replace the displayed object with meshes of the given bounds.
    pub fn load_meshes(&mut self, bounds: impl IntoIterator<Item = BoundingBox>) {
        self.meshes = bounds
            .into_iter()
            .enumerate()
            .map(|(index, bounds)| MeshEntry {
                index,
                handle: MeshHandle(index as u64 + 1),
                bounds,
            })
            .collect();
    }

    pub fn clear_meshes(&mut self) {
        self.meshes.clear();
    }

    pub fn overlay(&self) -> Option<&OverlayGroup> {
        self.overlay.as_ref()
    }

    pub fn overlay_opacity(&self) -> f32 {
        self.overlay_opacity
    }

    pub fn clipping_sphere(&self) -> Option<BoundingSphere> {
        self.clipping_sphere
    }

    pub fn frames_rendered(&self) -> usize {
        self.frames_rendered
    }

    pub fn presented_opacities(&self) -> &[f32] {
        &self.presented_opacities
    }
}

impl RenderSurface for HeadlessSurface {
    fn camera(&self) -> CameraState {
        self.camera
    }

    fn set_camera(&mut self, camera: CameraState) {
        self.camera = camera;
    }

    fn render(&mut self) {
        self.frames_rendered += 1;
        if self.overlay.is_some() {
            self.presented_opacities.push(self.overlay_opacity);
        }
    }

    fn meshes(&self) -> Vec<MeshEntry> {
        self.meshes.clone()
    }

    fn bounding_sphere(&self, filter: MeshFilter) -> Option<BoundingSphere> {
        measure_target(&self.meshes, filter).map(|bbox| bbox.bounding_sphere())
    }

    fn adjust_clipping_planes(&mut self, sphere: BoundingSphere) {
        self.clipping_sphere = Some(sphere);
    }

    fn fit_sphere_to_view(&mut self, sphere: BoundingSphere, _animated: bool) {
        let dir = self.camera.offset().try_normalize().unwrap_or(DVec3::Z);
        let distance = (sphere.radius / (FIT_FOV_Y * 0.5).sin()).max(f64::EPSILON);
        self.camera = CameraState::new(sphere.center + dir * distance, sphere.center, self.camera.up);
    }

    fn add_overlay_group(&mut self, overlay: &RulerOverlay) {
        self.overlay = Some(OverlayGroup {
            id: overlay.id,
            vertices: overlay.line_vertices(),
            label_count: overlay.labels().count(),
        });
    }

    fn clear_overlay_group(&mut self) {
        self.overlay = None;
    }

    fn set_overlay_opacity(&mut self, opacity: f32) {
        self.overlay_opacity = opacity;
    }
}

/// A label as the headless renderer last rasterized it.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessLabel {
    pub text: String,
    pub font_size: f32,
    pub color: [f32; 4],
}

/// Label renderer that keeps label text in memory instead of rasterizing.
#[derive(Debug, Default)]
pub struct HeadlessLabels {
    labels: HashMap<LabelHandle, HeadlessLabel>,
}

impl HeadlessLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: LabelHandle) -> Option<&HeadlessLabel> {
        self.labels.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl LabelRenderer for HeadlessLabels {
    fn create(&mut self, text: &str, font_size: f32, color: [f32; 4]) -> RenderedLabel {
        let handle = LabelHandle::new();
        self.labels.insert(
            handle,
            HeadlessLabel {
                text: text.to_string(),
                font_size,
                color,
            },
        );
        RenderedLabel {
            handle,
            // Monospace cell of half the line height plus padding.
            aspect_ratio: 0.5 * text.chars().count() as f64 + 1.0,
        }
    }

    fn update(&mut self, handle: LabelHandle, text: &str, font_size: f32, color: [f32; 4]) {
        match self.labels.get_mut(&handle) {
            Some(label) => {
                label.text = text.to_string();
                label.font_size = font_size;
                label.color = color;
            }
            None => tracing::warn!("Update for unknown label {:?}", handle),
        }
    }

    fn release(&mut self, handle: LabelHandle) {
        self.labels.remove(&handle);
    }
}
