//! Overlay line styling and GPU-ready line vertices

use bytemuck::{Pod, Zeroable};
use viewer_core::OverlayPalette;

use crate::ruler::RulerLine;

/// Color and base opacity of the ruler lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: [f32; 4],
    pub opacity: f32,
    /// Label text color paired with the lines.
    pub label_color: [f32; 4],
}

impl From<OverlayPalette> for LineStyle {
    fn from(palette: OverlayPalette) -> Self {
        Self {
            color: palette.line_color,
            opacity: palette.line_opacity,
            label_color: palette.label_color,
        }
    }
}

impl LineStyle {
    /// Line color with base opacity and a fade factor folded into alpha.
    pub fn faded_color(&self, fade: f32) -> [f32; 4] {
        let [r, g, b, a] = self.color;
        [r, g, b, a * self.opacity * fade.clamp(0.0, 1.0)]
    }
}

/// Vertex with position and color, laid out for a line-list pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    pub const STRIDE: u64 = std::mem::size_of::<LineVertex>() as u64;
}

/// Flatten ruler segments into a line list (two vertices per segment).
pub fn line_vertices(lines: &[RulerLine], style: &LineStyle, fade: f32) -> Vec<LineVertex> {
    let color = style.faded_color(fade);
    lines
        .iter()
        .flat_map(|line| {
            [
                LineVertex {
                    position: line.start.as_vec3().to_array(),
                    color,
                },
                LineVertex {
                    position: line.end.as_vec3().to_array(),
                    color,
                },
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(LineVertex::STRIDE, 28);
        let v = LineVertex {
            position: [1.0, 2.0, 3.0],
            color: [0.0, 0.0, 0.0, 1.0],
        };
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 28);
    }

    #[test]
    fn test_line_vertices_fade() {
        let style = LineStyle {
            color: [1.0, 1.0, 1.0, 1.0],
            opacity: 0.5,
            label_color: [1.0; 4],
        };
        let lines = [RulerLine {
            start: DVec3::ZERO,
            end: DVec3::X,
        }];
        let verts = line_vertices(&lines, &style, 0.5);
        assert_eq!(verts.len(), 2);
        assert_eq!(verts[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(verts[0].color[3], 0.25);
    }
}
