//! Text label collaborator

use glam::{DVec2, DVec3};
use uuid::Uuid;

/// Opaque handle to a label owned by a [`LabelRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelHandle(pub Uuid);

impl LabelHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LabelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of rasterizing a label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedLabel {
    pub handle: LabelHandle,
    /// Width over height of the rendered text.
    pub aspect_ratio: f64,
}

/// Turns text into flat, camera-facing labels.
///
/// Implemented by the host; the overlay only needs the handle and the aspect
/// ratio to size the label in world space.
pub trait LabelRenderer {
    /// Rasterize a new label.
    fn create(&mut self, text: &str, font_size: f32, color: [f32; 4]) -> RenderedLabel;

    /// Re-render an existing label in place. Its world scale is kept.
    fn update(&mut self, handle: LabelHandle, text: &str, font_size: f32, color: [f32; 4]);

    /// Free a label that is no longer displayed.
    fn release(&mut self, _handle: LabelHandle) {}
}

/// A label placed in the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSprite {
    pub handle: LabelHandle,
    pub text: String,
    pub font_size: f32,
    pub position: DVec3,
    /// World-space width and height.
    pub scale: DVec2,
}

impl LabelSprite {
    /// Rasterize `text` and size it to `height` world units.
    pub fn create(
        labels: &mut dyn LabelRenderer,
        text: String,
        font_size: f32,
        color: [f32; 4],
        position: DVec3,
        height: f64,
    ) -> Self {
        let rendered = labels.create(&text, font_size, color);
        Self {
            handle: rendered.handle,
            text,
            font_size,
            position,
            scale: DVec2::new(height * rendered.aspect_ratio, height),
        }
    }

    /// Replace the text, keeping position and scale.
    pub fn set_text(&mut self, labels: &mut dyn LabelRenderer, text: String, color: [f32; 4]) {
        labels.update(self.handle, &text, self.font_size, color);
        self.text = text;
    }

    /// Re-render the current text with a new color.
    pub fn repaint(&self, labels: &mut dyn LabelRenderer, color: [f32; 4]) {
        labels.update(self.handle, &self.text, self.font_size, color);
    }
}
