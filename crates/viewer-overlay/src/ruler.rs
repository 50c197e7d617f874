//! Single-axis ruler geometry
//!
//! A ruler is a line along one bounding-box edge with end marks, graduated
//! ticks, numeric tick labels and a dimension label at its midpoint.

use glam::DVec3;
use viewer_core::{
    Axis, BoundingBox, MIN_AXIS_LENGTH, RulerConfig, Side, ViewDirection, estimate_label_width,
    format_tick_num, plan_ticks, tick_marks,
};

use crate::label::{LabelRenderer, LabelSprite};
use crate::style::LineStyle;

/// A straight overlay segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulerLine {
    pub start: DVec3,
    pub end: DVec3,
}

impl RulerLine {
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// A tick along a ruler.
#[derive(Debug, Clone, PartialEq)]
pub struct TickEntry {
    pub position: DVec3,
    /// Unconverted distance from the ruler's zero end.
    pub raw_value: f64,
    pub is_major: bool,
    /// Numeric label; `None` for minor ticks.
    pub label: Option<LabelSprite>,
}

/// Sizes and label settings shared by the three rulers of an overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulerParams {
    pub major_len: f64,
    pub minor_len: f64,
    pub end_len: f64,
    /// Distance of the dimension label from the axis.
    pub label_offset: f64,
    /// World height of the dimension label.
    pub label_scale: f64,
    /// World height of tick labels.
    pub tick_label_scale: f64,
    pub dimension_font_size: f32,
    pub tick_font_size: f32,
    pub label_color: [f32; 4],
}

impl RulerParams {
    /// Scale every size to the target's largest extent.
    pub fn for_target(bbox: &BoundingBox, config: &RulerConfig, style: &LineStyle) -> Self {
        let max_dim = bbox.max_dimension();
        let end_len = max_dim * config.end_tick_ratio;
        let label_scale = max_dim * config.label_scale_ratio;
        let tick_label_scale = label_scale * config.tick_label_ratio;
        Self {
            major_len: max_dim * config.major_tick_ratio,
            minor_len: max_dim * config.minor_tick_ratio,
            end_len,
            label_offset: end_len + tick_label_scale * 2.0 + label_scale,
            label_scale,
            tick_label_scale,
            dimension_font_size: config.dimension_font_size,
            tick_font_size: config.tick_font_size,
            label_color: style.label_color,
        }
    }
}

/// Output of [`build_axis_ruler`]. Empty for degenerate axes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisRuler {
    pub lines: Vec<RulerLine>,
    pub tick_entries: Vec<TickEntry>,
    pub dimension_label: Option<LabelSprite>,
    pub length: f64,
}

impl AxisRuler {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Build one ruler from `axis_start` (value 0) to `axis_end` (full length).
///
/// Ticks grow along `tick_dir`; the dimension label is pushed out along
/// `label_offset_dir`.
pub fn build_axis_ruler(
    axis_start: DVec3,
    axis_end: DVec3,
    tick_dir: DVec3,
    label_offset_dir: DVec3,
    params: &RulerParams,
    labels: &mut dyn LabelRenderer,
) -> AxisRuler {
    let delta = axis_end - axis_start;
    let length = delta.length();
    if length < MIN_AXIS_LENGTH {
        return AxisRuler::default();
    }

    let end_text = format_tick_num(length);
    let Some(plan) = plan_ticks(length, estimate_label_width(&end_text, params.label_scale)) else {
        return AxisRuler::default();
    };

    let dir = delta / length;
    let tick_dir = tick_dir.try_normalize().unwrap_or(DVec3::ZERO);
    let label_offset_dir = label_offset_dir.try_normalize().unwrap_or(tick_dir);

    let mut lines = vec![
        RulerLine::new(axis_start, axis_end),
        RulerLine::new(axis_start, axis_start + tick_dir * params.end_len),
        RulerLine::new(axis_end, axis_end + tick_dir * params.end_len),
    ];

    let tick_label = |labels: &mut dyn LabelRenderer, value: f64, at: DVec3, mark_len: f64| {
        LabelSprite::create(
            labels,
            format_tick_num(value),
            params.tick_font_size,
            params.label_color,
            at + tick_dir * (mark_len + params.tick_label_scale),
            params.tick_label_scale,
        )
    };

    let mut tick_entries = Vec::new();
    tick_entries.push(TickEntry {
        position: axis_start,
        raw_value: 0.0,
        is_major: true,
        label: Some(tick_label(&mut *labels, 0.0, axis_start, params.end_len)),
    });

    for mark in tick_marks(length, &plan) {
        let position = axis_start + dir * mark.value;
        let mark_len = if mark.is_major {
            params.major_len
        } else {
            params.minor_len
        };
        lines.push(RulerLine::new(position, position + tick_dir * mark_len));

        let label = if mark.is_major {
            Some(tick_label(&mut *labels, mark.value, position, mark_len))
        } else {
            None
        };
        tick_entries.push(TickEntry {
            position,
            raw_value: mark.value,
            is_major: mark.is_major,
            label,
        });
    }

    tick_entries.push(TickEntry {
        position: axis_end,
        raw_value: length,
        is_major: true,
        label: Some(tick_label(&mut *labels, length, axis_end, params.end_len)),
    });

    let midpoint = axis_start + delta * 0.5;
    let dimension_label = LabelSprite::create(
        labels,
        end_text,
        params.dimension_font_size,
        params.label_color,
        midpoint + label_offset_dir * params.label_offset,
        params.label_scale,
    );

    AxisRuler {
        lines,
        tick_entries,
        dimension_label: Some(dimension_label),
        length,
    }
}

/// Where the ruler for one axis goes under a given view direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPlacement {
    pub axis: Axis,
    /// Zero end.
    pub start: DVec3,
    /// Full-length end.
    pub end: DVec3,
    /// Outward direction for ticks and labels.
    pub tick_dir: DVec3,
    /// Zero end sits at the box maximum.
    pub reverse: bool,
}

/// Resolve the edge, counting direction and tick direction of one ruler.
pub fn axis_placement(bbox: &BoundingBox, direction: ViewDirection, axis: Axis) -> AxisPlacement {
    let sides = direction.edge_sides();
    let placement = sides.placement(axis);

    let mut base = DVec3::ZERO;
    for (along, side) in placement {
        base[along.index()] = bbox.side_coord(along, side);
    }

    let reverse = sides.reverse(axis);
    let (lo, hi) = (bbox.min[axis.index()], bbox.max()[axis.index()]);
    let (from, to) = if reverse { (hi, lo) } else { (lo, hi) };

    let mut start = base;
    start[axis.index()] = from;
    let mut end = base;
    end[axis.index()] = to;

    // Ticks point away from the box in the screen plane: along whichever
    // placement axis is not the view axis, or along screen-up for the ruler
    // that runs into the screen.
    let view_axis = direction.view_axis();
    let (tick_axis, tick_side) = if placement[0].0 == view_axis {
        placement[1]
    } else if placement[1].0 == view_axis {
        placement[0]
    } else {
        let up = direction.screen_up_axis();
        (up, sides.side_for(axis, up).unwrap_or(Side::Near))
    };

    AxisPlacement {
        axis,
        start,
        end,
        tick_dir: tick_axis.unit() * tick_side.sign(),
        reverse,
    }
}
