//! Three-axis ruler overlay lifecycle

use uuid::Uuid;
use viewer_core::{
    Axis, BoundingBox, RulerConfig, ThemeConfig, ViewDirection, ViewerConfig, format_tick_num,
};

use crate::label::{LabelRenderer, LabelSprite};
use crate::ruler::{
    AxisPlacement, RulerLine, RulerParams, TickEntry, axis_placement, build_axis_ruler,
};
use crate::style::{LineStyle, LineVertex, line_vertices};
use crate::surface::RenderSurface;

/// The complete overlay for one target and one view direction.
///
/// Never patched geometrically: a direction or target change builds a new one.
#[derive(Debug, Clone)]
pub struct RulerOverlay {
    pub id: Uuid,
    pub direction: ViewDirection,
    pub target: BoundingBox,
    pub placements: [AxisPlacement; 3],
    pub lines: Vec<RulerLine>,
    /// Dimension labels indexed by [`Axis::index`]; `None` for degenerate axes.
    pub dimension_labels: [Option<LabelSprite>; 3],
    pub tick_entries: Vec<TickEntry>,
    pub style: LineStyle,
    pub opacity: f32,
}

impl RulerOverlay {
    pub fn dimension_label(&self, axis: Axis) -> Option<&LabelSprite> {
        self.dimension_labels[axis.index()].as_ref()
    }

    /// Every label of the overlay, dimension labels first.
    pub fn labels(&self) -> impl Iterator<Item = &LabelSprite> {
        self.dimension_labels
            .iter()
            .flatten()
            .chain(self.tick_entries.iter().filter_map(|t| t.label.as_ref()))
    }

    /// Line list for upload, with the current opacity folded into alpha.
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        line_vertices(&self.lines, &self.style, self.opacity)
    }
}

/// Owns the ruler overlay and everything needed to rebuild it.
pub struct OverlayManager {
    config: RulerConfig,
    theme: ThemeConfig,
    is_dark: bool,
    direction: ViewDirection,
    target: Option<BoundingBox>,
    overlay: Option<RulerOverlay>,
    /// Last dimension texts supplied by the host, re-applied after rebuilds.
    dimension_texts: Option<[String; 3]>,
    /// Last unit conversion factor supplied by the host.
    unit_factor: Option<f64>,
}

impl OverlayManager {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            config: config.ruler.clone(),
            theme: config.theme.clone(),
            is_dark: config.theme.start_dark,
            direction: ViewDirection::default(),
            target: None,
            overlay: None,
            dimension_texts: None,
            unit_factor: None,
        }
    }

    pub fn overlay(&self) -> Option<&RulerOverlay> {
        self.overlay.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn direction(&self) -> ViewDirection {
        self.direction
    }

    /// Record the current view direction without touching the overlay.
    pub fn set_direction(&mut self, direction: ViewDirection) {
        self.direction = direction;
    }

    pub fn target(&self) -> Option<&BoundingBox> {
        self.target.as_ref()
    }

    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    pub fn unit_factor(&self) -> Option<f64> {
        self.unit_factor
    }

    fn style(&self) -> LineStyle {
        LineStyle::from(self.theme.palette(self.is_dark))
    }

    /// Show (or hide) the ruler for `target` as seen from `direction`.
    ///
    /// Any existing overlay is discarded first. Enabling without a target is
    /// a no-op.
    pub fn set_overlay(
        &mut self,
        enabled: bool,
        target: Option<BoundingBox>,
        direction: ViewDirection,
        surface: &mut dyn RenderSurface,
        labels: &mut dyn LabelRenderer,
    ) {
        if !enabled {
            self.clear(surface, labels);
            self.target = None;
            surface.render();
            return;
        }

        let Some(target) = target else {
            tracing::debug!("Ruler requested with no target, ignoring");
            return;
        };

        self.install(target, direction, 1.0, surface, labels);
        surface.render();
    }

    /// Rebuild the active overlay for a new direction, fully transparent.
    ///
    /// Returns false (and only records the direction) when no overlay is shown.
    pub fn rebuild_for(
        &mut self,
        direction: ViewDirection,
        surface: &mut dyn RenderSurface,
        labels: &mut dyn LabelRenderer,
    ) -> bool {
        let target = match (&self.overlay, self.target) {
            (Some(_), Some(target)) => target,
            _ => {
                self.direction = direction;
                return false;
            }
        };

        self.install(target, direction, 0.0, surface, labels);
        true
    }

    /// Replace the overlay with a fresh build at `opacity`. Does not render.
    fn install(
        &mut self,
        target: BoundingBox,
        direction: ViewDirection,
        opacity: f32,
        surface: &mut dyn RenderSurface,
        labels: &mut dyn LabelRenderer,
    ) {
        self.discard(surface, labels);
        self.direction = direction;
        self.target = Some(target);

        let mut overlay = self.build(&target, direction, labels);
        overlay.opacity = opacity.clamp(0.0, 1.0);
        tracing::debug!(
            "Built ruler overlay {} for {} ({} lines, {} ticks)",
            overlay.id,
            direction,
            overlay.lines.len(),
            overlay.tick_entries.len()
        );
        surface.set_overlay_opacity(overlay.opacity);
        surface.add_overlay_group(&overlay);
        self.overlay = Some(overlay);

        self.reapply_cached_texts(labels);
    }

    /// Remove the overlay from the surface and free its labels.
    pub fn clear(&mut self, surface: &mut dyn RenderSurface, labels: &mut dyn LabelRenderer) {
        if self.discard(surface, labels) {
            tracing::debug!("Cleared ruler overlay");
        }
    }

    /// Forget everything tied to the current model.
    pub fn reset(&mut self, surface: &mut dyn RenderSurface, labels: &mut dyn LabelRenderer) {
        self.clear(surface, labels);
        self.target = None;
        self.dimension_texts = None;
        self.unit_factor = None;
    }

    fn discard(&mut self, surface: &mut dyn RenderSurface, labels: &mut dyn LabelRenderer) -> bool {
        let Some(overlay) = self.overlay.take() else {
            return false;
        };
        surface.clear_overlay_group();
        for label in overlay.labels() {
            labels.release(label.handle);
        }
        true
    }

    /// Switch line and label colors between the dark and light palettes.
    pub fn restyle(
        &mut self,
        is_dark: bool,
        surface: &mut dyn RenderSurface,
        labels: &mut dyn LabelRenderer,
    ) {
        self.is_dark = is_dark;
        let style = self.style();
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };

        overlay.style = style;
        for label in overlay.labels() {
            label.repaint(labels, style.label_color);
        }
        surface.clear_overlay_group();
        surface.add_overlay_group(overlay);
        surface.set_overlay_opacity(overlay.opacity);
        surface.render();
    }

    /// Replace the dimension texts and optionally convert tick values.
    ///
    /// Both are cached and survive rebuilds. Geometry is never recomputed.
    pub fn relabel(
        &mut self,
        texts: [String; 3],
        unit_factor: Option<f64>,
        surface: &mut dyn RenderSurface,
        labels: &mut dyn LabelRenderer,
    ) {
        self.dimension_texts = Some(texts);
        if let Some(factor) = unit_factor {
            self.unit_factor = Some(factor);
        }

        if self.overlay.is_none() {
            return;
        }
        self.apply_dimension_texts(labels);
        if unit_factor.is_some() {
            self.apply_unit_factor(labels);
        }
        surface.render();
    }

    fn reapply_cached_texts(&mut self, labels: &mut dyn LabelRenderer) {
        if self.dimension_texts.is_some() {
            self.apply_dimension_texts(labels);
        }
        if self.unit_factor.is_some() {
            self.apply_unit_factor(labels);
        }
    }

    fn apply_dimension_texts(&mut self, labels: &mut dyn LabelRenderer) {
        let color = self.style().label_color;
        let (Some(overlay), Some(texts)) = (self.overlay.as_mut(), self.dimension_texts.as_ref())
        else {
            return;
        };
        for (slot, text) in overlay.dimension_labels.iter_mut().zip(texts) {
            if let Some(label) = slot {
                label.set_text(labels, text.clone(), color);
            }
        }
    }

    fn apply_unit_factor(&mut self, labels: &mut dyn LabelRenderer) {
        let color = self.style().label_color;
        let (Some(overlay), Some(factor)) = (self.overlay.as_mut(), self.unit_factor) else {
            return;
        };
        for entry in &mut overlay.tick_entries {
            if let Some(label) = entry.label.as_mut() {
                label.set_text(labels, format_tick_num(entry.raw_value * factor), color);
            }
        }
    }

    /// Set the fade factor of the overlay (1 = fully visible).
    pub fn set_opacity(&mut self, opacity: f32, surface: &mut dyn RenderSurface) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.opacity = opacity.clamp(0.0, 1.0);
            surface.set_overlay_opacity(overlay.opacity);
        }
    }

    fn build(
        &self,
        target: &BoundingBox,
        direction: ViewDirection,
        labels: &mut dyn LabelRenderer,
    ) -> RulerOverlay {
        let style = self.style();
        let params = RulerParams::for_target(target, &self.config, &style);
        let placements = Axis::ALL.map(|axis| axis_placement(target, direction, axis));

        let mut lines = Vec::new();
        let mut tick_entries = Vec::new();
        let mut dimension_labels: [Option<LabelSprite>; 3] = [None, None, None];

        for placement in &placements {
            let ruler = build_axis_ruler(
                placement.start,
                placement.end,
                placement.tick_dir,
                placement.tick_dir,
                &params,
                labels,
            );
            lines.extend(ruler.lines);
            tick_entries.extend(ruler.tick_entries);
            dimension_labels[placement.axis.index()] = ruler.dimension_label;
        }

        RulerOverlay {
            id: Uuid::new_v4(),
            direction,
            target: *target,
            placements,
            lines,
            dimension_labels,
            tick_entries,
            style,
            opacity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use glam::DVec3;
    use viewer_core::{BoundingSphere, CameraState};

    use super::*;
    use crate::label::{LabelHandle, RenderedLabel};
    use crate::surface::{MeshEntry, MeshFilter};

    #[derive(Default)]
    struct TestSurface {
        groups: usize,
        clears: usize,
        opacity: f32,
        renders: usize,
        /// Surface opacity seen by each render and each group upload.
        presented: Vec<f32>,
        uploaded: Vec<f32>,
    }

    impl RenderSurface for TestSurface {
        fn camera(&self) -> CameraState {
            CameraState::default()
        }
        fn set_camera(&mut self, _camera: CameraState) {}
        fn render(&mut self) {
            self.renders += 1;
            self.presented.push(self.opacity);
        }
        fn meshes(&self) -> Vec<MeshEntry> {
            Vec::new()
        }
        fn bounding_sphere(&self, _filter: MeshFilter) -> Option<BoundingSphere> {
            None
        }
        fn adjust_clipping_planes(&mut self, _sphere: BoundingSphere) {}
        fn fit_sphere_to_view(&mut self, _sphere: BoundingSphere, _animated: bool) {}
        fn add_overlay_group(&mut self, _overlay: &RulerOverlay) {
            self.groups += 1;
            self.uploaded.push(self.opacity);
        }
        fn clear_overlay_group(&mut self) {
            self.clears += 1;
        }
        fn set_overlay_opacity(&mut self, opacity: f32) {
            self.opacity = opacity;
        }
    }

    #[derive(Default)]
    struct TestLabels {
        live: HashMap<LabelHandle, (String, [f32; 4])>,
        released: HashSet<LabelHandle>,
    }

    impl TestLabels {
        fn text(&self, handle: LabelHandle) -> &str {
            &self.live[&handle].0
        }
    }

    impl LabelRenderer for TestLabels {
        fn create(&mut self, text: &str, _font_size: f32, color: [f32; 4]) -> RenderedLabel {
            let handle = LabelHandle::new();
            self.live.insert(handle, (text.to_string(), color));
            RenderedLabel {
                handle,
                aspect_ratio: 0.5 * text.len() as f64 + 1.0,
            }
        }

        fn update(&mut self, handle: LabelHandle, text: &str, _font_size: f32, color: [f32; 4]) {
            self.live.insert(handle, (text.to_string(), color));
        }

        fn release(&mut self, handle: LabelHandle) {
            self.live.remove(&handle);
            self.released.insert(handle);
        }
    }

    fn sample_box() -> BoundingBox {
        BoundingBox::new(DVec3::ZERO, DVec3::new(10.0, 4.0, 2.0))
    }

    fn snapshot(overlay: &RulerOverlay) -> (Vec<RulerLine>, Vec<(DVec3, String)>) {
        let labels = overlay
            .labels()
            .map(|l| (l.position, l.text.clone()))
            .collect();
        (overlay.lines.clone(), labels)
    }

    fn enabled_manager(surface: &mut TestSurface, labels: &mut TestLabels) -> OverlayManager {
        let mut manager = OverlayManager::new(&ViewerConfig::new());
        manager.set_overlay(true, Some(sample_box()), ViewDirection::Front, surface, labels);
        manager
    }

    #[test]
    fn test_enable_builds_three_rulers() {
        let mut surface = TestSurface::default();
        let mut labels = TestLabels::default();
        let manager = enabled_manager(&mut surface, &mut labels);

        let overlay = manager.overlay().unwrap();
        assert_eq!(surface.groups, 1);
        assert_eq!(surface.opacity, 1.0);
        assert_eq!(overlay.dimension_label(Axis::X).unwrap().text, "10");
        assert_eq!(overlay.dimension_label(Axis::Y).unwrap().text, "4");
        assert_eq!(overlay.dimension_label(Axis::Z).unwrap().text, "2");
        assert_eq!(labels.live.len(), overlay.labels().count());
    }

    #[test]
    fn test_enable_twice_is_idempotent() {
        let mut surface = TestSurface::default();
        let mut labels = TestLabels::default();
        let mut manager = enabled_manager(&mut surface, &mut labels);
        let first = snapshot(manager.overlay().unwrap());
        let first_handles: Vec<LabelHandle> =
            manager.overlay().unwrap().labels().map(|l| l.handle).collect();

        manager.set_overlay(true, Some(sample_box()), ViewDirection::Front, &mut surface, &mut labels);
        assert_eq!(snapshot(manager.overlay().unwrap()), first);
        assert_eq!(surface.clears, 1);
        assert!(first_handles.iter().all(|h| labels.released.contains(h)));
        assert_eq!(labels.live.len(), manager.overlay().unwrap().labels().count());
    }

    #[test]
    fn test_enable_without_target_is_noop() {
        let mut surface = TestSurface::default();
        let mut labels = TestLabels::default();
        let mut manager = OverlayManager::new(&ViewerConfig::new());
        manager.set_overlay(true, None, ViewDirection::Top, &mut surface, &mut labels);
        assert!(!manager.is_active());
        assert_eq!(manager.direction(), ViewDirection::Front);
        assert_eq!(surface.groups, 0);
        assert_eq!(surface.renders, 0);
    }

    #[test]
    fn test_disable_clears() {
        let mut surface = TestSurface::default();
        let mut labels = TestLabels::default();
        let mut manager = enabled_manager(&mut surface, &mut labels);
        manager.set_overlay(false, None, ViewDirection::Front, &mut surface, &mut labels);
        assert!(!manager.is_active());
        assert!(manager.target().is_none());
        assert_eq!(surface.clears, 1);
        assert!(labels.live.is_empty());
    }

    #[test]
    fn test_relabel_converts_ticks_without_geometry_change() {
        let mut surface = TestSurface::default();
        let mut labels = TestLabels::default();
        let mut manager = enabled_manager(&mut surface, &mut labels);
        let lines_before = manager.overlay().unwrap().lines.clone();

        let texts = ["W 254 mm".to_string(), "H 101.6 mm".to_string(), "D 50.8 mm".to_string()];
        manager.relabel(texts, Some(25.4), &mut surface, &mut labels);

        let overlay = manager.overlay().unwrap();
        assert_eq!(overlay.lines, lines_before);
        assert_eq!(labels.text(overlay.dimension_label(Axis::X).unwrap().handle), "W 254 mm");
        assert_eq!(overlay.dimension_label(Axis::Z).unwrap().text, "D 50.8 mm");

        let two = overlay
            .tick_entries
            .iter()
            .find(|t| t.raw_value == 2.0 && t.label.is_some())
            .unwrap();
        assert_eq!(two.label.as_ref().unwrap().text, "50.8");
        assert_eq!(labels.text(two.label.as_ref().unwrap().handle), "50.8");
        assert_eq!(manager.unit_factor(), Some(25.4));
    }

    #[test]
    fn test_relabel_without_factor_keeps_tick_text() {
        let mut surface = TestSurface::default();
        let mut labels = TestLabels::default();
        let mut manager = enabled_manager(&mut surface, &mut labels);
        manager.relabel(["a".into(), "b".into(), "c".into()], None, &mut surface, &mut labels);

        let overlay = manager.overlay().unwrap();
        let end = overlay.tick_entries.iter().find(|t| t.raw_value == 10.0).unwrap();
        assert_eq!(end.label.as_ref().unwrap().text, "10");
        assert_eq!(manager.unit_factor(), None);
    }

    #[test]
    fn test_rebuild_reapplies_cached_texts() {
        let mut surface = TestSurface::default();
        let mut labels = TestLabels::default();
        let mut manager = enabled_manager(&mut surface, &mut labels);
        manager.relabel(["x".into(), "y".into(), "z".into()], Some(0.1), &mut surface, &mut labels);

        assert!(manager.rebuild_for(ViewDirection::Top, &mut surface, &mut labels));
        let overlay = manager.overlay().unwrap();
        assert_eq!(overlay.direction, ViewDirection::Top);
        assert_eq!(overlay.opacity, 0.0);
        assert_eq!(surface.opacity, 0.0);
        assert_eq!(overlay.dimension_label(Axis::Y).unwrap().text, "y");
        let end = overlay.tick_entries.iter().find(|t| t.raw_value == 10.0).unwrap();
        assert_eq!(end.label.as_ref().unwrap().text, "1");
        assert_eq!(manager.direction(), ViewDirection::Top);
    }

    #[test]
    fn test_rebuild_is_never_presented_opaque() {
        let mut surface = TestSurface::default();
        let mut labels = TestLabels::default();
        let mut manager = enabled_manager(&mut surface, &mut labels);
        manager.set_opacity(0.1, &mut surface);
        surface.presented.clear();
        surface.uploaded.clear();

        assert!(manager.rebuild_for(ViewDirection::Top, &mut surface, &mut labels));
        assert!(surface.presented.is_empty());
        assert_eq!(surface.uploaded, vec![0.0]);
        assert_eq!(surface.opacity, 0.0);
    }

    #[test]
    fn test_rebuild_without_overlay_only_records_direction() {
        let mut surface = TestSurface::default();
        let mut labels = TestLabels::default();
        let mut manager = OverlayManager::new(&ViewerConfig::new());
        assert!(!manager.rebuild_for(ViewDirection::Left, &mut surface, &mut labels));
        assert_eq!(manager.direction(), ViewDirection::Left);
        assert!(!manager.is_active());
    }

    #[test]
    fn test_direction_round_trip_is_identical() {
        let mut surface = TestSurface::default();
        let mut labels = TestLabels::default();
        let mut manager = enabled_manager(&mut surface, &mut labels);
        let front = snapshot(manager.overlay().unwrap());

        manager.rebuild_for(ViewDirection::Right, &mut surface, &mut labels);
        assert_ne!(snapshot(manager.overlay().unwrap()), front);
        manager.rebuild_for(ViewDirection::Front, &mut surface, &mut labels);
        assert_eq!(snapshot(manager.overlay().unwrap()), front);
    }

    #[test]
    fn test_restyle_repaints_without_moving() {
        let mut surface = TestSurface::default();
        let mut labels = TestLabels::default();
        let mut manager = enabled_manager(&mut surface, &mut labels);
        let before = snapshot(manager.overlay().unwrap());

        manager.restyle(false, &mut surface, &mut labels);
        let light = ThemeConfig::default().light;
        let overlay = manager.overlay().unwrap();
        assert_eq!(snapshot(overlay), before);
        assert_eq!(overlay.style.color, light.line_color);
        assert!(labels.live.values().all(|(_, color)| *color == light.label_color));
        assert_eq!(surface.groups, 2);
    }

    #[test]
    fn test_flat_target_omits_degenerate_axis() {
        let mut surface = TestSurface::default();
        let mut labels = TestLabels::default();
        let mut manager = OverlayManager::new(&ViewerConfig::new());
        let flat = BoundingBox::new(DVec3::ZERO, DVec3::new(3.0, 1.0, 0.0));
        manager.set_overlay(true, Some(flat), ViewDirection::Front, &mut surface, &mut labels);

        let overlay = manager.overlay().unwrap();
        assert!(overlay.dimension_label(Axis::Z).is_none());
        assert!(overlay.dimension_label(Axis::X).is_some());
        assert!(overlay.lines.iter().all(|l| l.length() > 0.0));
    }

    #[test]
    fn test_reset_forgets_caches() {
        let mut surface = TestSurface::default();
        let mut labels = TestLabels::default();
        let mut manager = enabled_manager(&mut surface, &mut labels);
        manager.relabel(["a".into(), "b".into(), "c".into()], Some(2.0), &mut surface, &mut labels);
        manager.reset(&mut surface, &mut labels);
        assert!(!manager.is_active());
        assert_eq!(manager.unit_factor(), None);

        manager.set_overlay(true, Some(sample_box()), ViewDirection::Front, &mut surface, &mut labels);
        assert_eq!(manager.overlay().unwrap().dimension_label(Axis::X).unwrap().text, "10");
    }
}
