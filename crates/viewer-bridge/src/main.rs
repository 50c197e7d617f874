//! Headless viewer bridge demo
//!
//! Loads a box-shaped model, drives a few host commands through the JSON
//! protocol and logs the camera as the animations play out.

use glam::DVec3;
use viewer_bridge::ViewerBridge;
use viewer_bridge::headless::{HeadlessLabels, HeadlessSurface};
use viewer_core::{BoundingBox, ViewerConfig};
use viewer_overlay::RenderSurface;

const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "viewer_bridge=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = match std::env::args().nth(1) {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::new(),
    };

    let mut surface = HeadlessSurface::new();
    surface.load_meshes([
        BoundingBox::new(DVec3::ZERO, DVec3::new(10.0, 4.0, 2.0)),
        BoundingBox::new(DVec3::new(4.0, 4.0, 0.5), DVec3::new(2.0, 1.5, 1.0)),
    ]);

    let mut bridge = ViewerBridge::new(surface, HeadlessLabels::new(), config);
    bridge.on_model_loaded();

    let script = [
        r#"{"fn": "setScaleRuler", "args": {"enabled": true, "meshIndex": -1}}"#,
        r#"{"fn": "updateRulerLabels", "args": {"width": "W 254 mm", "height": "H 139.7 mm", "depth": "D 50.8 mm", "unitFactor": 25.4}}"#,
        r#"{"fn": "setCameraDirection", "args": {"direction": "top"}}"#,
    ];
    for message in script {
        bridge.dispatch_json(message)?;
    }

    let mut now = 0.0;
    while bridge.animator().wants_frame() {
        bridge.on_frame(now);
        now += FRAME_MS;
    }
    log_camera(&bridge);

    bridge.dispatch_json(r#"{"fn": "startAutoRotate", "args": {"hSpeed": 30, "tilt": 10}}"#)?;
    for _ in 0..120 {
        bridge.on_frame(now);
        now += FRAME_MS;
    }
    bridge.dispatch_json(r#"{"fn": "stopAutoRotate"}"#)?;
    log_camera(&bridge);

    bridge.dispatch_json(r#"{"fn": "resetCamera"}"#)?;
    while bridge.animator().wants_frame() {
        bridge.on_frame(now);
        now += FRAME_MS;
    }
    log_camera(&bridge);

    if let Some(overlay) = bridge.overlay().overlay() {
        tracing::info!(
            "Ruler {}: {} lines, {} labels, {} frames rendered",
            overlay.direction,
            overlay.lines.len(),
            overlay.labels().count(),
            bridge.surface().frames_rendered()
        );
    }

    Ok(())
}

fn log_camera(bridge: &ViewerBridge<HeadlessSurface, HeadlessLabels>) {
    let camera = bridge.surface().camera();
    tracing::info!(
        "Camera eye {:.3} up {:.3} distance {:.3}",
        camera.eye,
        camera.up,
        camera.distance()
    );
}
