//! Viewer bridge state

use std::sync::Arc;

use parking_lot::Mutex;
use viewer_core::{ViewDirection, ViewerConfig};
use viewer_overlay::{
    LabelRenderer, MeshFilter, OverlayManager, RenderSurface, measure_target,
};

use crate::animator::{CameraAnimator, TransitionTarget};
use crate::command::{BridgeCommand, CommandError};

/// Bridge shared between the host callback and the frame loop
pub type SharedViewerBridge<S, L> = Arc<Mutex<ViewerBridge<S, L>>>;

/// Everything the host page can ask of the 3D viewer.
///
/// Owns the render surface and label renderer handed over by the host, the
/// ruler overlay and the camera animator. Nothing here blocks: animations
/// advance only through [`ViewerBridge::on_frame`].
pub struct ViewerBridge<S, L> {
    config: ViewerConfig,
    surface: S,
    labels: L,
    overlay: OverlayManager,
    animator: CameraAnimator,
    ruler_enabled: bool,
}

impl<S: RenderSurface, L: LabelRenderer> ViewerBridge<S, L> {
    pub fn new(surface: S, labels: L, config: ViewerConfig) -> Self {
        let overlay = OverlayManager::new(&config);
        let animator = CameraAnimator::new(&config.camera);
        Self {
            config,
            surface,
            labels,
            overlay,
            animator,
            ruler_enabled: false,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn labels(&self) -> &L {
        &self.labels
    }

    pub fn overlay(&self) -> &OverlayManager {
        &self.overlay
    }

    pub fn animator(&self) -> &CameraAnimator {
        &self.animator
    }

    pub fn is_ruler_enabled(&self) -> bool {
        self.ruler_enabled
    }

    /// Show or hide the ruler around the whole object or one mesh.
    ///
    /// `mesh_index` of `None` or `-1` measures the whole object. Enabling
    /// with nothing to measure does nothing.
    pub fn set_scale_ruler(&mut self, enabled: bool, mesh_index: Option<i64>) {
        if !enabled {
            self.ruler_enabled = false;
            self.overlay.set_overlay(
                false,
                None,
                self.overlay.direction(),
                &mut self.surface,
                &mut self.labels,
            );
            return;
        }

        let filter = MeshFilter::from_index(mesh_index);
        let Some(target) = measure_target(&self.surface.meshes(), filter) else {
            tracing::debug!("Nothing to measure for {:?}, ruler unchanged", filter);
            return;
        };

        self.ruler_enabled = true;
        self.overlay.set_overlay(
            true,
            Some(target),
            self.overlay.direction(),
            &mut self.surface,
            &mut self.labels,
        );
    }

    /// Replace the dimension texts, optionally converting tick values.
    pub fn update_ruler_labels(
        &mut self,
        width: &str,
        height: &str,
        depth: &str,
        unit_factor: Option<f64>,
    ) {
        self.overlay.relabel(
            [width.to_string(), height.to_string(), depth.to_string()],
            unit_factor,
            &mut self.surface,
            &mut self.labels,
        );
    }

    /// Animate to a preset direction given by name. Unknown names are ignored.
    pub fn set_camera_direction(&mut self, token: &str) {
        match token.parse::<ViewDirection>() {
            Ok(direction) => self
                .animator
                .transition_to(TransitionTarget::Direction(direction), &self.surface),
            Err(e) => tracing::warn!("Ignoring camera direction request: {}", e),
        }
    }

    /// Animate back to the home view.
    pub fn reset_camera(&mut self) {
        self.animator
            .transition_to(TransitionTarget::Reset, &self.surface);
    }

    pub fn start_auto_rotate(&mut self, h_speed: f64, tilt_deg: f64) {
        self.animator
            .start_auto_rotate(h_speed, tilt_deg, &self.surface);
    }

    pub fn stop_auto_rotate(&mut self) {
        self.animator.stop_auto_rotate();
    }

    /// Advance animations. Call once per presented frame.
    pub fn on_frame(&mut self, now_ms: f64) {
        self.animator.on_frame(
            now_ms,
            &mut self.surface,
            &mut self.overlay,
            &mut self.labels,
        );
    }

    /// Switch the overlay between the dark and light palettes.
    pub fn set_theme(&mut self, is_dark: bool) {
        tracing::info!("Theme set to {}", if is_dark { "dark" } else { "light" });
        self.overlay
            .restyle(is_dark, &mut self.surface, &mut self.labels);
    }

    /// A new object was loaded into the surface.
    ///
    /// Fits the view without animation and drops the ruler and any
    /// transition belonging to the previous object.
    pub fn on_model_loaded(&mut self) {
        self.animator.stop_transition();
        self.overlay.reset(&mut self.surface, &mut self.labels);
        self.ruler_enabled = false;

        let mesh_count = self.surface.meshes().len();
        if let Some(sphere) = self.surface.bounding_sphere(MeshFilter::All) {
            self.surface.fit_sphere_to_view(sphere, false);
            self.surface.adjust_clipping_planes(sphere);
        }
        self.surface.render();
        tracing::info!("Model loaded ({} meshes)", mesh_count);
    }

    /// The object was removed from the surface.
    pub fn on_model_cleared(&mut self) {
        self.animator.stop_transition();
        self.animator.stop_auto_rotate();
        self.overlay.reset(&mut self.surface, &mut self.labels);
        self.ruler_enabled = false;
        self.surface.render();
        tracing::info!("Model cleared");
    }

    pub fn dispatch(&mut self, command: BridgeCommand) {
        tracing::debug!("Bridge command: {:?}", command);
        match command {
            BridgeCommand::SetScaleRuler {
                enabled,
                mesh_index,
            } => self.set_scale_ruler(enabled, mesh_index),
            BridgeCommand::UpdateRulerLabels {
                width,
                height,
                depth,
                unit_factor,
            } => self.update_ruler_labels(&width, &height, &depth, unit_factor),
            BridgeCommand::SetCameraDirection { direction } => {
                self.set_camera_direction(&direction)
            }
            BridgeCommand::ResetCamera => self.reset_camera(),
            BridgeCommand::StartAutoRotate { h_speed, tilt } => {
                self.start_auto_rotate(h_speed, tilt)
            }
            BridgeCommand::StopAutoRotate => self.stop_auto_rotate(),
            BridgeCommand::SetTheme { is_dark } => self.set_theme(is_dark),
        }
    }

    /// Decode and run a JSON command from the host.
    pub fn dispatch_json(&mut self, message: &str) -> Result<(), CommandError> {
        let command = BridgeCommand::from_json(message)?;
        self.dispatch(command);
        Ok(())
    }
}

/// Wrap a bridge for sharing with host callbacks.
pub fn create_shared_bridge<S: RenderSurface, L: LabelRenderer>(
    surface: S,
    labels: L,
    config: ViewerConfig,
) -> SharedViewerBridge<S, L> {
    Arc::new(Mutex::new(ViewerBridge::new(surface, labels, config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessLabels, HeadlessSurface};
    use approx::assert_relative_eq;
    use glam::DVec3;
    use viewer_core::{Axis, BoundingBox, CameraState};

    type TestBridge = ViewerBridge<HeadlessSurface, HeadlessLabels>;

    fn loaded_bridge() -> TestBridge {
        let mut surface = HeadlessSurface::new();
        surface.load_meshes([
            BoundingBox::new(DVec3::ZERO, DVec3::new(10.0, 4.0, 2.0)),
            BoundingBox::new(DVec3::new(1.0, 1.0, 0.5), DVec3::new(2.0, 1.0, 1.0)),
        ]);
        let mut bridge = ViewerBridge::new(surface, HeadlessLabels::new(), ViewerConfig::new());
        bridge.on_model_loaded();
        bridge
    }

    fn dimension_texts(bridge: &TestBridge) -> Vec<String> {
        let overlay = bridge.overlay().overlay().unwrap();
        Axis::ALL
            .iter()
            .filter_map(|axis| overlay.dimension_label(*axis))
            .map(|label| bridge.labels().get(label.handle).unwrap().text.clone())
            .collect()
    }

    fn run_frames(bridge: &mut TestBridge, until_ms: f64) {
        let mut now = 0.0;
        while now <= until_ms {
            bridge.on_frame(now);
            now += 16.0;
        }
        bridge.on_frame(until_ms + 1000.0);
    }

    #[test]
    fn test_model_load_fits_view() {
        let bridge = loaded_bridge();
        let camera = bridge.surface().camera();
        assert!(camera.center.abs_diff_eq(DVec3::new(5.0, 2.0, 1.0), 1e-12));
        assert!(bridge.surface().clipping_sphere().is_some());
        assert!(!bridge.animator().is_transitioning());
    }

    #[test]
    fn test_ruler_whole_object_and_single_mesh() {
        let mut bridge = loaded_bridge();
        bridge.set_scale_ruler(true, Some(-1));
        assert!(bridge.is_ruler_enabled());
        assert_eq!(dimension_texts(&bridge), ["10", "4", "2"]);

        bridge.set_scale_ruler(true, Some(1));
        assert_eq!(dimension_texts(&bridge), ["2", "1", "1"]);
        assert!(bridge.surface().overlay().is_some());
    }

    #[test]
    fn test_ruler_toggle_is_idempotent() {
        let mut bridge = loaded_bridge();
        bridge.set_scale_ruler(true, None);
        let first = bridge.surface().overlay().unwrap().vertices.clone();
        let label_count = bridge.labels().len();

        bridge.set_scale_ruler(true, None);
        assert_eq!(bridge.surface().overlay().unwrap().vertices, first);
        assert_eq!(bridge.labels().len(), label_count);

        bridge.set_scale_ruler(false, None);
        assert!(bridge.surface().overlay().is_none());
        assert!(bridge.labels().is_empty());
        assert!(!bridge.is_ruler_enabled());
    }

    #[test]
    fn test_ruler_bad_index_is_noop() {
        let mut bridge = loaded_bridge();
        bridge.set_scale_ruler(true, Some(9));
        assert!(!bridge.is_ruler_enabled());
        assert!(bridge.surface().overlay().is_none());
    }

    #[test]
    fn test_update_labels_with_units() {
        let mut bridge = loaded_bridge();
        bridge.set_scale_ruler(true, None);
        bridge.update_ruler_labels("254 mm", "101.6 mm", "50.8 mm", Some(25.4));
        assert_eq!(dimension_texts(&bridge), ["254 mm", "101.6 mm", "50.8 mm"]);

        // Cached texts follow the overlay through a direction change.
        bridge.set_camera_direction("top");
        run_frames(&mut bridge, 400.0);
        assert_eq!(bridge.overlay().direction(), ViewDirection::Top);
        assert_eq!(dimension_texts(&bridge), ["254 mm", "101.6 mm", "50.8 mm"]);
    }

    #[test]
    fn test_invalid_direction_is_ignored() {
        let mut bridge = loaded_bridge();
        let before = bridge.surface().camera();
        bridge.set_camera_direction("diagonal");
        assert!(!bridge.animator().is_transitioning());
        bridge.on_frame(0.0);
        assert_eq!(bridge.surface().camera(), before);
    }

    #[test]
    fn test_direction_token_is_case_insensitive() {
        let mut bridge = loaded_bridge();
        bridge.set_camera_direction("Right");
        assert!(bridge.animator().is_transitioning());
    }

    #[test]
    fn test_top_then_reset() {
        let mut bridge = loaded_bridge();
        let start = bridge.surface().camera();
        let center = start.center;
        let distance = start.distance();

        bridge.set_camera_direction("top");
        run_frames(&mut bridge, 400.0);
        let camera = bridge.surface().camera();
        assert!(camera.eye.abs_diff_eq(center + DVec3::Y * distance, 1e-9));
        assert!(camera.up.abs_diff_eq(DVec3::NEG_Z, 1e-12));

        bridge.reset_camera();
        run_frames(&mut bridge, 400.0);
        let camera = bridge.surface().camera();
        assert!(camera.eye.abs_diff_eq(center + DVec3::Z * distance, 1e-9));
        assert_eq!(bridge.overlay().direction(), ViewDirection::Front);
    }

    #[test]
    fn test_theme_repaints_labels() {
        let mut bridge = loaded_bridge();
        bridge.set_scale_ruler(true, None);
        bridge.set_theme(false);

        let light = bridge.config().theme.light;
        let overlay = bridge.overlay().overlay().unwrap();
        for label in overlay.labels() {
            assert_eq!(bridge.labels().get(label.handle).unwrap().color, light.label_color);
        }
        let alpha = bridge.surface().overlay().unwrap().vertices[0].color[3];
        assert_relative_eq!(alpha, light.line_color[3] * light.line_opacity);
    }

    #[test]
    fn test_model_cleared_drops_ruler_and_blocks_animation() {
        let mut bridge = loaded_bridge();
        bridge.set_scale_ruler(true, None);
        bridge.surface_mut().clear_meshes();
        bridge.on_model_cleared();

        assert!(bridge.overlay().overlay().is_none());
        bridge.set_camera_direction("left");
        assert!(!bridge.animator().is_transitioning());
        bridge.set_scale_ruler(true, None);
        assert!(!bridge.is_ruler_enabled());
    }

    #[test]
    fn test_model_cleared_stops_auto_rotate() {
        let mut bridge = loaded_bridge();
        bridge.start_auto_rotate(60.0, 5.0);
        bridge.on_frame(0.0);
        bridge.on_frame(16.0);
        assert!(bridge.animator().is_auto_rotating());

        bridge.surface_mut().clear_meshes();
        bridge.on_model_cleared();
        assert!(!bridge.animator().is_auto_rotating());

        let before = bridge.surface().camera();
        bridge.on_frame(32.0);
        assert_eq!(bridge.surface().camera(), before);
    }

    #[test]
    fn test_dispatch_json() {
        let mut bridge = loaded_bridge();
        bridge
            .dispatch_json(r#"{"fn": "setScaleRuler", "args": {"enabled": true}}"#)
            .unwrap();
        assert!(bridge.is_ruler_enabled());

        bridge
            .dispatch_json(r#"{"fn": "startAutoRotate", "args": {"hSpeed": 45, "tilt": 0}}"#)
            .unwrap();
        assert!(bridge.animator().is_auto_rotating());
        bridge.dispatch_json(r#"{"fn": "stopAutoRotate"}"#).unwrap();
        assert!(!bridge.animator().is_auto_rotating());

        assert!(bridge.dispatch_json(r#"{"fn": "launch"}"#).is_err());
    }

    #[test]
    fn test_shared_bridge() {
        let mut surface = HeadlessSurface::new();
        surface.load_meshes([BoundingBox::new(DVec3::ZERO, DVec3::ONE)]);
        surface.set_camera(CameraState::looking_from(ViewDirection::Front, DVec3::ZERO, 3.0));
        let shared = create_shared_bridge(surface, HeadlessLabels::new(), ViewerConfig::new());

        shared.lock().set_camera_direction("bottom");
        shared.lock().on_frame(0.0);
        shared.lock().on_frame(500.0);
        let camera = shared.lock().surface().camera();
        assert!(camera.eye.abs_diff_eq(DVec3::new(0.0, -3.0, 0.0), 1e-9));
        assert!(camera.up.abs_diff_eq(DVec3::Z, 1e-12));
    }
}
