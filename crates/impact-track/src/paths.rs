use log::debug;

use impact_track_collision::{CollisionDetector, CollisionParams};
use impact_track_color::{ColorDetector, ColorParams, ColorSpecError};
use impact_track_core::{Detection, SamplerStats, ScreenArea};
use impact_track_motion::{MotionDetector, MotionParams};

use crate::interfaces::{DetectionInfo, HitTracker, TickFrames};

/// Color-segmentation detector composed with its own collision state.
///
/// Each path owns a private [`CollisionDetector`] so the color and motion
/// trajectory histories cannot corrupt each other when both paths run on
/// the same tick.
pub struct ColorPath {
    detector: ColorDetector,
    collision: CollisionDetector,
    screen: ScreenArea,
}

impl ColorPath {
    pub fn new(screen: ScreenArea) -> Self {
        Self {
            detector: ColorDetector::new(ColorParams::default()),
            collision: CollisionDetector::new(CollisionParams::default()),
            screen,
        }
    }

    pub fn detector(&self) -> &ColorDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut ColorDetector {
        &mut self.detector
    }

    pub fn set_screen_area(&mut self, screen: ScreenArea) {
        self.screen = screen;
    }

    pub fn set_collision_depth_threshold_m(&mut self, threshold_m: f64) {
        self.collision.set_depth_threshold_m(threshold_m);
    }

    pub fn sampler_stats(&self) -> SamplerStats {
        self.detector.sampler_stats()
    }
}

impl HitTracker for ColorPath {
    fn check_hit(&mut self, frames: &TickFrames<'_>) -> Option<Detection> {
        let detected = match frames.color {
            Some(color) => {
                self.detector
                    .detect(&color, frames.depth.as_ref(), self.screen.depth_m())
            }
            None => {
                debug!("color frame unavailable; color path idle this tick");
                None
            }
        };
        self.collision.update_and_check(&self.screen, detected)
    }

    fn set_target_color(&mut self, name: &str) -> Result<(), ColorSpecError> {
        self.detector.set_target_color(name)
    }

    fn detection_info(&self) -> DetectionInfo {
        let info = self.detector.detection_info();
        DetectionInfo {
            detected: info.detected,
            position: info.position,
            mask_pixels: info.mask_pixels,
            region_count: info.region_count,
            ..DetectionInfo::default()
        }
    }

    fn last_reached(&self) -> Option<Detection> {
        self.collision.last_reached()
    }
}

/// Depth-delta motion detector composed with its own collision state.
pub struct MotionPath {
    detector: MotionDetector,
    collision: CollisionDetector,
    screen: ScreenArea,
}

impl MotionPath {
    pub fn new(screen: ScreenArea) -> Self {
        Self {
            detector: MotionDetector::new(MotionParams::default()),
            collision: CollisionDetector::new(CollisionParams::default()),
            screen,
        }
    }

    pub fn detector(&self) -> &MotionDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut MotionDetector {
        &mut self.detector
    }

    pub fn set_screen_area(&mut self, screen: ScreenArea) {
        self.screen = screen;
    }

    pub fn set_collision_depth_threshold_m(&mut self, threshold_m: f64) {
        self.collision.set_depth_threshold_m(threshold_m);
    }

    pub fn sampler_stats(&self) -> SamplerStats {
        self.detector.sampler_stats()
    }
}

impl HitTracker for MotionPath {
    fn check_hit(&mut self, frames: &TickFrames<'_>) -> Option<Detection> {
        let detected = match frames.depth {
            Some(depth) => self.detector.detect(&depth, frames.color_dims()),
            None => {
                debug!("depth frame unavailable; motion path idle this tick");
                None
            }
        };
        self.collision.update_and_check(&self.screen, detected)
    }

    fn set_target_color(&mut self, _name: &str) -> Result<(), ColorSpecError> {
        // Motion tracking is color-agnostic.
        Ok(())
    }

    fn detection_info(&self) -> DetectionInfo {
        let info = self.detector.detection_info();
        DetectionInfo {
            detected: info.detected,
            position: info.position,
            moving_pixels: info.moving_pixels,
            candidate_count: info.candidate_count,
            ..DetectionInfo::default()
        }
    }

    fn last_reached(&self) -> Option<Detection> {
        self.collision.last_reached()
    }
}
