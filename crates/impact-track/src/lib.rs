//! High-level facade crate for the `impact-track-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying detector crates
//! - the [`HitTracker`] trait and the [`TrackerSelector`] that arbitrates
//!   between a color path and a motion path
//! - persisted JSON configuration for the screen area and the tracked color
//! - (feature-gated) helpers that run the pipeline on `image` buffers
//!
//! ## Quickstart
//!
//! ```no_run
//! use impact_track::{HitTracker, TickFrames, TrackerMode, TrackerSelector};
//! use impact_track::core::{ColorFrameView, DepthFrameView, ScreenArea};
//!
//! let screen = ScreenArea::new(vec![[0, 0], [1280, 0], [1280, 800], [0, 800]], 1.5);
//! let mut selector = TrackerSelector::new(TrackerMode::Hybrid, screen);
//! selector.set_target_color("red").unwrap();
//!
//! # let (color_data, depth_data) = (vec![0u8; 1280 * 800 * 3], vec![0u16; 640 * 400]);
//! let frames = TickFrames {
//!     color: Some(ColorFrameView { width: 1280, height: 800, data: &color_data }),
//!     depth: Some(DepthFrameView { width: 640, height: 400, data: &depth_data }),
//! };
//! if let Some(hit) = selector.check_hit(&frames) {
//!     println!("impact at ({}, {}) depth {:.2}m", hit.x, hit.y, hit.depth_m);
//! }
//! ```
//!
//! ## API map
//! - `impact_track::core`: frame views, depth sampling, masks, geometry.
//! - `impact_track::color`: HSV segmentation of the tracked ball.
//! - `impact_track::motion`: depth-delta motion candidates.
//! - `impact_track::collision`: the hit state machine.
//! - `impact_track::detect` (feature `image`): helpers from `image` buffers.

pub use impact_track_collision as collision;
pub use impact_track_color as color;
pub use impact_track_core as core;
pub use impact_track_motion as motion;

pub use impact_track_collision::{CollisionDetector, CollisionParams, CollisionState};
pub use impact_track_color::{ColorDetector, ColorParams, ColorPreset, ColorSpecError};
pub use impact_track_core::{ColorFrameView, DepthFrameView, Detection, ScreenArea};
pub use impact_track_motion::{MotionDetector, MotionParams};

mod config;
mod interfaces;
mod paths;
mod selector;

pub use config::{
    load_screen_area, load_tracked_color, save_screen_area, save_tracked_color, ConfigError,
    TrackedColorConfig,
};
pub use interfaces::{DetectionInfo, HitTracker, TickFrames};
pub use paths::{ColorPath, MotionPath};
pub use selector::{TrackerMode, TrackerSelector, TrackerStatistics};

#[cfg(feature = "image")]
pub mod detect;
