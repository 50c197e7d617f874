//! View direction presets and the per-direction ruler side table

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> DVec3 {
        match self {
            Axis::X => DVec3::X,
            Axis::Y => DVec3::Y,
            Axis::Z => DVec3::Z,
        }
    }

    /// The two axes perpendicular to this one, in ascending order.
    pub fn others(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Which face of the bounding box a ruler is drawn against along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Minimum extent (-1).
    Near,
    /// Maximum extent (+1).
    Far,
}

impl Side {
    pub fn sign(self) -> f64 {
        match self {
            Side::Near => -1.0,
            Side::Far => 1.0,
        }
    }

    pub fn is_far(self) -> bool {
        matches!(self, Side::Far)
    }
}

use Side::{Far, Near};

/// Side assignment for the three axis rulers under one view direction.
///
/// Each ruler runs along its own axis and is pinned against one face of each
/// of the two perpendicular axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSides {
    pub x_ruler_y_side: Side,
    pub x_ruler_z_side: Side,
    pub y_ruler_x_side: Side,
    pub y_ruler_z_side: Side,
    pub z_ruler_x_side: Side,
    pub z_ruler_y_side: Side,
}

impl EdgeSides {
    /// Sides of the two perpendicular axes for the ruler along `axis`.
    pub fn placement(&self, axis: Axis) -> [(Axis, Side); 2] {
        match axis {
            Axis::X => [(Axis::Y, self.x_ruler_y_side), (Axis::Z, self.x_ruler_z_side)],
            Axis::Y => [(Axis::X, self.y_ruler_x_side), (Axis::Z, self.y_ruler_z_side)],
            Axis::Z => [(Axis::X, self.z_ruler_x_side), (Axis::Y, self.z_ruler_y_side)],
        }
    }

    /// Side of `along` used by the ruler of `ruler`. `along` must differ from `ruler`.
    pub fn side_for(&self, ruler: Axis, along: Axis) -> Option<Side> {
        self.placement(ruler)
            .into_iter()
            .find(|(axis, _)| *axis == along)
            .map(|(_, side)| side)
    }

    /// Whether the ruler along `axis` starts counting from the box maximum.
    ///
    /// True when the other two rulers sit on the far face of `axis`, so the
    /// zero ends of all three rulers meet at the same corner.
    pub fn reverse(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.y_ruler_x_side.is_far(),
            Axis::Y => self.x_ruler_y_side.is_far(),
            Axis::Z => self.x_ruler_z_side.is_far(),
        }
    }
}

/// One of the six axis-aligned camera presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewDirection {
    #[default]
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl ViewDirection {
    pub const ALL: [ViewDirection; 6] = [
        ViewDirection::Front,
        ViewDirection::Back,
        ViewDirection::Left,
        ViewDirection::Right,
        ViewDirection::Top,
        ViewDirection::Bottom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewDirection::Front => "front",
            ViewDirection::Back => "back",
            ViewDirection::Left => "left",
            ViewDirection::Right => "right",
            ViewDirection::Top => "top",
            ViewDirection::Bottom => "bottom",
        }
    }

    /// Unit vector from the orbit center towards the eye.
    pub fn eye_direction(self) -> DVec3 {
        match self {
            ViewDirection::Front => DVec3::Z,
            ViewDirection::Back => DVec3::NEG_Z,
            ViewDirection::Left => DVec3::NEG_X,
            ViewDirection::Right => DVec3::X,
            ViewDirection::Top => DVec3::Y,
            ViewDirection::Bottom => DVec3::NEG_Y,
        }
    }

    /// Camera up vector for this preset.
    pub fn up(self) -> DVec3 {
        match self {
            ViewDirection::Top => DVec3::NEG_Z,
            ViewDirection::Bottom => DVec3::Z,
            ViewDirection::Front
            | ViewDirection::Back
            | ViewDirection::Left
            | ViewDirection::Right => DVec3::Y,
        }
    }

    /// Axis the camera looks along.
    pub fn view_axis(self) -> Axis {
        match self {
            ViewDirection::Front | ViewDirection::Back => Axis::Z,
            ViewDirection::Left | ViewDirection::Right => Axis::X,
            ViewDirection::Top | ViewDirection::Bottom => Axis::Y,
        }
    }

    /// Axis that appears vertical on screen.
    pub fn screen_up_axis(self) -> Axis {
        match self {
            ViewDirection::Top | ViewDirection::Bottom => Axis::Z,
            ViewDirection::Front
            | ViewDirection::Back
            | ViewDirection::Left
            | ViewDirection::Right => Axis::Y,
        }
    }

    /// Ruler side table. Every entry pins the three rulers to the box corner
    /// nearest the viewer at the bottom-left of the screen.
    pub fn edge_sides(self) -> EdgeSides {
        match self {
            ViewDirection::Front => EdgeSides {
                x_ruler_y_side: Near,
                x_ruler_z_side: Far,
                y_ruler_x_side: Near,
                y_ruler_z_side: Far,
                z_ruler_x_side: Near,
                z_ruler_y_side: Near,
            },
            ViewDirection::Back => EdgeSides {
                x_ruler_y_side: Near,
                x_ruler_z_side: Near,
                y_ruler_x_side: Far,
                y_ruler_z_side: Near,
                z_ruler_x_side: Far,
                z_ruler_y_side: Near,
            },
            ViewDirection::Left => EdgeSides {
                x_ruler_y_side: Near,
                x_ruler_z_side: Near,
                y_ruler_x_side: Near,
                y_ruler_z_side: Near,
                z_ruler_x_side: Near,
                z_ruler_y_side: Near,
            },
            ViewDirection::Right => EdgeSides {
                x_ruler_y_side: Near,
                x_ruler_z_side: Far,
                y_ruler_x_side: Far,
                y_ruler_z_side: Far,
                z_ruler_x_side: Far,
                z_ruler_y_side: Near,
            },
            ViewDirection::Top => EdgeSides {
                x_ruler_y_side: Far,
                x_ruler_z_side: Far,
                y_ruler_x_side: Near,
                y_ruler_z_side: Far,
                z_ruler_x_side: Near,
                z_ruler_y_side: Far,
            },
            ViewDirection::Bottom => EdgeSides {
                x_ruler_y_side: Near,
                x_ruler_z_side: Near,
                y_ruler_x_side: Near,
                y_ruler_z_side: Near,
                z_ruler_x_side: Near,
                z_ruler_y_side: Near,
            },
        }
    }
}

impl fmt::Display for ViewDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized direction token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown view direction: {0:?}")]
pub struct DirectionParseError(pub String);

impl FromStr for ViewDirection {
    type Err = DirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewDirection::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DirectionParseError(s.to_string()))
    }
}
