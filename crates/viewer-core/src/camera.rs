//! Orbit camera state

use glam::DVec3;

use crate::direction::ViewDirection;

/// Eye / center / up triple as exchanged with the render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub eye: DVec3,
    pub center: DVec3,
    pub up: DVec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            eye: DVec3::new(0.0, 0.0, 5.0),
            center: DVec3::ZERO,
            up: DVec3::Y,
        }
    }
}

impl CameraState {
    pub fn new(eye: DVec3, center: DVec3, up: DVec3) -> Self {
        Self { eye, center, up }
    }

    /// Camera placed on a preset direction at `distance` from `center`.
    pub fn looking_from(direction: ViewDirection, center: DVec3, distance: f64) -> Self {
        Self {
            eye: center + direction.eye_direction() * distance,
            center,
            up: direction.up(),
        }
    }

    /// Vector from the center to the eye.
    pub fn offset(&self) -> DVec3 {
        self.eye - self.center
    }

    /// Orbit radius.
    pub fn distance(&self) -> f64 {
        self.offset().length()
    }

    /// Unit vector from the eye towards the center.
    pub fn forward(&self) -> Option<DVec3> {
        (self.center - self.eye).try_normalize()
    }
}

/// Push `point` radially onto the sphere of `radius` around `center`.
///
/// When `point` coincides with `center` the radial direction is undefined and
/// `fallback` is used instead.
pub fn project_onto_sphere(point: DVec3, center: DVec3, radius: f64, fallback: DVec3) -> DVec3 {
    let dir = (point - center)
        .try_normalize()
        .or_else(|| fallback.try_normalize())
        .unwrap_or(DVec3::Z);
    center + dir * radius
}
