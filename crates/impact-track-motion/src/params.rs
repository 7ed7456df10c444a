use serde::{Deserialize, Serialize};

/// Parameters for the motion detector.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct MotionParams {
    /// Per-pixel depth change below which a pixel counts as approaching,
    /// in millimeters. Negative: the object moved closer.
    pub depth_change_threshold_mm: f64,

    /// Accepted region area range in pixels. Filters both speckle noise
    /// and oversized blobs (a walking person, a sweeping hand).
    pub min_motion_area: usize,
    pub max_motion_area: usize,

    /// Candidates below this approach confidence are discarded.
    pub approach_confidence_threshold: f64,

    /// Intra-region depth spread (mm) at which the variance score bottoms
    /// out; a consistent surface scores high.
    pub depth_variance_threshold_mm: f64,

    /// Disk radius for the morphological opening that cleans the motion
    /// mask.
    pub opening_radius: usize,

    /// Nominal color-frame dimensions used to report detections in
    /// color-pixel space when no color frame accompanies the tick.
    pub color_frame_dims: (usize, usize),
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            depth_change_threshold_mm: -50.0,
            min_motion_area: 50,
            max_motion_area: 10_000,
            approach_confidence_threshold: 0.5,
            depth_variance_threshold_mm: 200.0,
            opening_radius: 2,
            color_frame_dims: (1280, 800),
        }
    }
}
