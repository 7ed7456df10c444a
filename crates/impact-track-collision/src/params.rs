use serde::{Deserialize, Serialize};

/// Parameters for the collision decision.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct CollisionParams {
    /// Maximum depth (meters) at which an in-polygon detection still counts
    /// as touching the screen plane.
    pub depth_threshold_m: f64,

    /// Also accept near-boundary detections whose trajectory bent sharply
    /// (a ball glancing off the screen edge). Off by default.
    pub angle_check: bool,
    pub angle_threshold_deg: f64,
    pub edge_tolerance_px: f64,
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            depth_threshold_m: 2.0,
            angle_check: false,
            angle_threshold_deg: 45.0,
            edge_tolerance_px: 5.0,
        }
    }
}
