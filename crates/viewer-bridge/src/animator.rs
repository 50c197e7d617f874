//! Camera transitions and auto-rotation
//!
//! Both animations are stepped from [`CameraAnimator::on_frame`]. A preset
//! transition orbits the eye at a constant distance around the view center
//! and crossfades the ruler overlay, rebuilding it once at the midpoint.

use std::f64::consts::FRAC_PI_4;

use glam::{DQuat, DVec3};
use viewer_core::{CameraConfig, CameraState, ViewDirection, project_onto_sphere};
use viewer_overlay::{LabelRenderer, MeshFilter, OverlayManager, RenderSurface};

use crate::scheduler::{FrameScheduler, FrameTask, SessionId};

/// Orbits shorter than this cannot be animated.
const MIN_DISTANCE: f64 = 1e-9;

/// Where a transition should end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionTarget {
    Direction(ViewDirection),
    /// Configured home view; the ruler goes back to the front layout.
    Reset,
}

/// Cubic ease-out: fast start, gentle stop.
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

#[derive(Debug, Clone)]
struct Transition {
    session: SessionId,
    /// Set on the first stepped frame.
    start_time: Option<f64>,
    center: DVec3,
    distance: f64,
    start_eye: DVec3,
    start_up: DVec3,
    target_eye: DVec3,
    target_up: DVec3,
    direction: ViewDirection,
    /// Whether the overlay has been rebuilt for `direction`.
    rebuilt: bool,
}

#[derive(Debug, Clone)]
struct AutoRotate {
    session: SessionId,
    /// Degrees per second about world +Y.
    h_speed: f64,
    /// Amplitude of the vertical sway in degrees.
    tilt_deg: f64,
    start_time: Option<f64>,
    last_time: Option<f64>,
}

/// Drives camera transitions and the auto-rotate loop.
#[derive(Debug)]
pub struct CameraAnimator {
    config: CameraConfig,
    scheduler: FrameScheduler,
    transition: Option<Transition>,
    auto_rotate: Option<AutoRotate>,
}

impl CameraAnimator {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            config: config.clone(),
            scheduler: FrameScheduler::new(),
            transition: None,
            auto_rotate: None,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate.is_some()
    }

    /// Whether anything wants to be stepped on the next frame.
    pub fn wants_frame(&self) -> bool {
        self.scheduler.has_pending()
    }

    /// Start a transition, superseding any transition in flight.
    ///
    /// Frame requests left over from the superseded run are dropped when
    /// they come due.
    ///
    /// Does nothing when no object is displayed or the camera sits on its
    /// center. Transitioning to the current direction still animates.
    pub fn transition_to(&mut self, target: TransitionTarget, surface: &dyn RenderSurface) {
        if surface.meshes().is_empty() {
            tracing::debug!("Camera transition requested with nothing displayed, ignoring");
            return;
        }

        let camera = surface.camera();
        let distance = camera.distance();
        if distance < MIN_DISTANCE {
            tracing::debug!("Camera sits on its center, ignoring transition");
            return;
        }

        let (eye_dir, target_up, direction) = match target {
            TransitionTarget::Direction(d) => (d.eye_direction(), d.up(), d),
            TransitionTarget::Reset => (
                self.config.home_direction(),
                self.config.home_up(),
                ViewDirection::Front,
            ),
        };

        let session = self.scheduler.next_session();
        self.transition = Some(Transition {
            session,
            start_time: None,
            center: camera.center,
            distance,
            start_eye: camera.eye,
            start_up: camera.up,
            target_eye: camera.center + eye_dir * distance,
            target_up,
            direction,
            rebuilt: false,
        });
        self.scheduler.request(session, FrameTask::Transition);
        tracing::debug!("Camera transition {:?} to {} started", session, direction);
    }

    /// Abandon the transition in flight, leaving the camera where it is.
    pub fn stop_transition(&mut self) {
        if self.transition.take().is_some() {
            tracing::debug!("Camera transition stopped");
        }
        self.scheduler.cancel(FrameTask::Transition);
    }

    /// Start (or restart) the perpetual orbit.
    pub fn start_auto_rotate(&mut self, h_speed: f64, tilt_deg: f64, surface: &dyn RenderSurface) {
        if surface.meshes().is_empty() {
            tracing::debug!("Auto-rotate requested with nothing displayed, ignoring");
            return;
        }

        let session = self.scheduler.next_session();
        self.auto_rotate = Some(AutoRotate {
            session,
            h_speed,
            tilt_deg,
            start_time: None,
            last_time: None,
        });
        self.scheduler.request(session, FrameTask::AutoRotate);
        tracing::debug!("Auto-rotate started at {} deg/s, tilt {} deg", h_speed, tilt_deg);
    }

    /// Stop the orbit. Safe to call when not rotating.
    pub fn stop_auto_rotate(&mut self) {
        if self.auto_rotate.take().is_some() {
            tracing::debug!("Auto-rotate stopped");
        }
        self.scheduler.cancel(FrameTask::AutoRotate);
    }

    /// Step every animation that asked for this frame.
    pub fn on_frame(
        &mut self,
        now_ms: f64,
        surface: &mut dyn RenderSurface,
        overlay: &mut OverlayManager,
        labels: &mut dyn LabelRenderer,
    ) {
        for (session, task) in self.scheduler.take_pending() {
            match task {
                FrameTask::Transition => {
                    if self.transition.as_ref().map(|t| t.session) != Some(session) {
                        tracing::trace!("Dropping stale transition frame {:?}", session);
                        continue;
                    }
                    self.step_transition(now_ms, surface, overlay, labels);
                }
                FrameTask::AutoRotate => {
                    if self.auto_rotate.as_ref().map(|r| r.session) != Some(session) {
                        tracing::trace!("Dropping stale auto-rotate frame {:?}", session);
                        continue;
                    }
                    self.step_auto_rotate(now_ms, surface);
                }
            }
        }
    }

    fn step_transition(
        &mut self,
        now_ms: f64,
        surface: &mut dyn RenderSurface,
        overlay: &mut OverlayManager,
        labels: &mut dyn LabelRenderer,
    ) {
        let Some(tr) = self.transition.as_mut() else {
            return;
        };

        let start = *tr.start_time.get_or_insert(now_ms);
        let elapsed = (now_ms - start).max(0.0);
        let raw = if self.config.transition_ms > 0.0 {
            (elapsed / self.config.transition_ms).min(1.0)
        } else {
            1.0
        };

        if raw >= 1.0 {
            surface.set_camera(CameraState::new(tr.target_eye, tr.center, tr.target_up));
            if let Some(sphere) = surface.bounding_sphere(MeshFilter::All) {
                surface.adjust_clipping_planes(sphere);
            }
            if !tr.rebuilt {
                overlay.rebuild_for(tr.direction, surface, labels);
            }
            overlay.set_opacity(1.0, surface);
            surface.render();

            tracing::debug!("Camera transition {:?} to {} complete", tr.session, tr.direction);
            self.transition = None;
            return;
        }

        let t = ease_out_cubic(raw);
        let up = tr
            .start_up
            .lerp(tr.target_up, t)
            .try_normalize()
            .unwrap_or(tr.target_up);
        let eye = project_onto_sphere(tr.start_eye.lerp(tr.target_eye, t), tr.center, tr.distance, up);
        surface.set_camera(CameraState::new(eye, tr.center, up));

        if raw < 0.5 {
            overlay.set_opacity((1.0 - 2.0 * raw) as f32, surface);
        } else {
            if !tr.rebuilt {
                tr.rebuilt = true;
                overlay.rebuild_for(tr.direction, surface, labels);
            }
            overlay.set_opacity((2.0 * (raw - 0.5)) as f32, surface);
        }
        surface.render();

        tracing::trace!("Camera transition {:?} at {:.3}", tr.session, raw);
        self.scheduler.request(tr.session, FrameTask::Transition);
    }

    fn step_auto_rotate(&mut self, now_ms: f64, surface: &mut dyn RenderSurface) {
        if surface.meshes().is_empty() {
            tracing::debug!("Nothing displayed, auto-rotate stopped");
            self.auto_rotate = None;
            return;
        }
        let Some(rot) = self.auto_rotate.as_mut() else {
            return;
        };

        let start = *rot.start_time.get_or_insert(now_ms);
        let dt = rot.last_time.map_or(0.0, |last| ((now_ms - last) / 1000.0).max(0.0));
        rot.last_time = Some(now_ms);
        let elapsed = (now_ms - start) / 1000.0;

        let camera = surface.camera();
        let distance = camera.distance();
        if distance >= MIN_DISTANCE && dt > 0.0 {
            let yaw = DQuat::from_axis_angle(DVec3::Y, (rot.h_speed * dt).to_radians());
            let mut offset = yaw * camera.offset();
            let mut up = yaw * camera.up;

            if rot.tilt_deg > 0.0 {
                // Derivative of tilt * sin(pi/4 * t): an 8 second sway.
                let tilt = rot.tilt_deg * FRAC_PI_4 * (FRAC_PI_4 * elapsed).cos() * dt;
                // Positive angles raise the eye.
                if let Some(axis) = up.cross(-offset).try_normalize() {
                    let pitch = DQuat::from_axis_angle(axis, tilt.to_radians());
                    offset = pitch * offset;
                    up = pitch * up;
                }
            }

            let up = up.try_normalize().unwrap_or(camera.up);
            let eye = project_onto_sphere(camera.center + offset, camera.center, distance, up);
            surface.set_camera(CameraState::new(eye, camera.center, up));
            surface.render();
        }

        self.scheduler.request(rot.session, FrameTask::AutoRotate);
    }
}
