//! Core types and utilities for ball-to-screen impact tracking.
//!
//! This crate holds the pieces every detector needs: lightweight frame
//! views, binary-mask utilities (connected regions, morphological opening),
//! polygon geometry for the screen area, and the [`DepthSampler`] that turns
//! noisy millimeter depth maps into validated meter values.

mod depth;
mod frame;
mod geom;
mod logger;
mod mask;
mod screen;

pub use depth::{DepthConfig, DepthError, DepthSampler, RegionStat, SamplerStats};
pub use frame::{
    depth_sample_valid, ColorFrameView, DepthFrame, DepthFrameView, DEPTH_INVALID_FAR,
    DEPTH_INVALID_NEAR,
};
pub use geom::{distance_to_polygon, point_in_polygon, turn_angle_deg};
pub use mask::{connected_regions, morph_open, BinaryMask, Region};
pub use screen::{Detection, ScreenArea};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
