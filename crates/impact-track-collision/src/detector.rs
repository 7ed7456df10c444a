use log::debug;

use impact_track_core::{turn_angle_deg, Detection, ScreenArea};

use crate::params::CollisionParams;

/// Collision state. A hit is emitted exactly on the Idle -> RecentlyHit
/// transition; a tick that stops qualifying re-arms the detector.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CollisionState {
    Idle,
    RecentlyHit,
}

/// Stateful filter that converts a per-tick `Option<Detection>` into at
/// most one hit event per unbroken approach.
pub struct CollisionDetector {
    params: CollisionParams,
    state: CollisionState,
    prev_center: Option<[i32; 2]>,
    last_center: Option<[i32; 2]>,
    last_reached: Option<Detection>,
}

impl CollisionDetector {
    pub fn new(params: CollisionParams) -> Self {
        Self {
            params,
            state: CollisionState::Idle,
            prev_center: None,
            last_center: None,
            last_reached: None,
        }
    }

    pub fn params(&self) -> &CollisionParams {
        &self.params
    }

    pub fn state(&self) -> CollisionState {
        self.state
    }

    pub fn set_depth_threshold_m(&mut self, threshold_m: f64) {
        self.params.depth_threshold_m = threshold_m;
    }

    /// Most recent emitted hit.
    pub fn last_reached(&self) -> Option<Detection> {
        self.last_reached
    }

    pub fn last_detected_position(&self) -> Option<(i32, i32)> {
        self.last_center.map(|[x, y]| (x, y))
    }

    /// Clear state and trajectory history. `last_reached` is kept; it
    /// records history, not state.
    pub fn reset(&mut self) {
        self.state = CollisionState::Idle;
        self.prev_center = None;
        self.last_center = None;
    }

    /// Feed this tick's detection and decide whether it constitutes a hit.
    ///
    /// A qualifying tick is spatially inside the screen polygon (or passes
    /// the optional angle gate) with a depth at or below the collision
    /// threshold. The first qualifying tick of an approach emits a hit;
    /// later qualifying ticks of the same approach do not. Any
    /// non-qualifying tick (no detection, outside, too far, invalid depth)
    /// re-arms the detector.
    pub fn update_and_check(
        &mut self,
        screen: &ScreenArea,
        detected: Option<Detection>,
    ) -> Option<Detection> {
        let Some(detection) = detected else {
            // Tracking gap: shift the history so a stale trajectory is not
            // reused once the object reappears.
            self.state = CollisionState::Idle;
            self.prev_center = self.last_center.take();
            return None;
        };

        // Spatial gate, evaluated against the history from before this tick.
        let spatial_hit = self.spatial_hit(screen, &detection);

        self.prev_center = self.last_center;
        self.last_center = Some([detection.x, detection.y]);

        if !detection.has_depth() {
            // Invalid depth never collides.
            self.state = CollisionState::Idle;
            return None;
        }

        if spatial_hit && detection.depth_m <= self.params.depth_threshold_m {
            if self.state == CollisionState::Idle {
                self.state = CollisionState::RecentlyHit;
                self.last_reached = Some(detection);
                debug!(
                    "hit at ({}, {}), depth {:.3}m",
                    detection.x, detection.y, detection.depth_m
                );
                return Some(detection);
            }
            // Same unbroken approach; already reported.
            None
        } else {
            self.state = CollisionState::Idle;
            None
        }
    }

    fn spatial_hit(&self, screen: &ScreenArea, detection: &Detection) -> bool {
        if !screen.is_usable() {
            return false;
        }
        if screen.contains(detection.x, detection.y) {
            return true;
        }
        if !self.params.angle_check {
            return false;
        }
        // Edge-glance: a sharp trajectory bend right at the polygon
        // boundary counts as a touch.
        let (Some(prev), Some(last)) = (self.prev_center, self.last_center) else {
            return false;
        };
        let Some(angle) = turn_angle_deg(prev, last, [detection.x, detection.y]) else {
            return false;
        };
        let Some(edge_dist) = screen.distance_to_edge(detection.x, detection.y) else {
            return false;
        };
        angle > self.params.angle_threshold_deg && edge_dist <= self.params.edge_tolerance_px
    }
}
