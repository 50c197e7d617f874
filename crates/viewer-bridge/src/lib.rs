//! Model Viewer Bridge
//!
//! Entry point the host page talks to: ruler toggling and relabeling,
//! animated preset views, auto-rotation and theme changes.
//!
//! # Architecture
//!
//! - [`bridge::ViewerBridge`] - Host-facing operations and command dispatch
//! - [`animator::CameraAnimator`] - Preset transitions with overlay crossfade
//! - [`scheduler::FrameScheduler`] - Pending per-frame work, tagged by session
//! - [`headless`] - In-memory surface and labels for tests and the demo

pub mod animator;
pub mod bridge;
pub mod command;
pub mod headless;
pub mod scheduler;

pub use animator::{CameraAnimator, TransitionTarget, ease_out_cubic};
pub use bridge::{SharedViewerBridge, ViewerBridge, create_shared_bridge};
pub use command::{BridgeCommand, CommandError};
pub use scheduler::{FrameScheduler, FrameTask, SessionId};
