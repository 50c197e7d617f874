//! Host-facing command protocol
//!
//! The host page calls into the bridge with JSON messages of the form
//! `{"fn": "setCameraDirection", "args": {"direction": "top"}}`.

use serde::{Deserialize, Serialize};

/// Errors decoding a host command
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Malformed command: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown bridge function: {0}")]
    UnknownFunction(String),
}

/// One call from the host into the viewer bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "fn",
    content = "args",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum BridgeCommand {
    SetScaleRuler {
        enabled: bool,
        #[serde(default)]
        mesh_index: Option<i64>,
    },
    UpdateRulerLabels {
        width: String,
        height: String,
        depth: String,
        #[serde(default)]
        unit_factor: Option<f64>,
    },
    SetCameraDirection {
        direction: String,
    },
    ResetCamera,
    StartAutoRotate {
        h_speed: f64,
        #[serde(default)]
        tilt: f64,
    },
    StopAutoRotate,
    SetTheme {
        is_dark: bool,
    },
}

impl BridgeCommand {
    /// Function names accepted in the `fn` field.
    pub const FUNCTIONS: [&'static str; 7] = [
        "setScaleRuler",
        "updateRulerLabels",
        "setCameraDirection",
        "resetCamera",
        "startAutoRotate",
        "stopAutoRotate",
        "setTheme",
    ];

    /// Decode a host message.
    pub fn from_json(message: &str) -> Result<Self, CommandError> {
        let raw: RawCommand = serde_json::from_str(message)?;
        if !Self::FUNCTIONS.contains(&raw.function.as_str()) {
            return Err(CommandError::UnknownFunction(raw.function));
        }

        let mut object = serde_json::Map::new();
        object.insert("fn".into(), serde_json::Value::String(raw.function));
        if !raw.args.is_null() {
            object.insert("args".into(), raw.args);
        }
        Ok(serde_json::from_value(serde_json::Value::Object(object))?)
    }

    pub fn to_json(&self) -> Result<String, CommandError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Deserialize)]
struct RawCommand {
    #[serde(rename = "fn")]
    function: String,
    #[serde(default)]
    args: serde_json::Value,
}
