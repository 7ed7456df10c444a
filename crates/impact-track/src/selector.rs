use log::{debug, info};
use serde::{Deserialize, Serialize};

use impact_track_color::ColorSpecError;
use impact_track_core::{Detection, SamplerStats, ScreenArea};

use crate::config::TrackedColorConfig;
use crate::interfaces::{DetectionInfo, HitTracker, TickFrames};
use crate::paths::{ColorPath, MotionPath};

/// Which detection path feeds the hit decision.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerMode {
    Color,
    Motion,
    Hybrid,
}

/// Aggregate counters for the selector's lifetime.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct TrackerStatistics {
    pub mode: TrackerMode,
    pub color_hit_count: u64,
    pub motion_hit_count: u64,
    pub hybrid_switch_count: u64,
    pub color_sampler: SamplerStats,
    pub motion_sampler: SamplerStats,
}

/// Runs the color and motion paths and arbitrates between them.
///
/// In hybrid mode both paths run every tick and motion wins whenever it
/// produces a hit; a tick resolved in motion's favor is counted as a
/// hybrid switch.
pub struct TrackerSelector {
    mode: TrackerMode,
    color: ColorPath,
    motion: MotionPath,
    color_hit_count: u64,
    motion_hit_count: u64,
    hybrid_switch_count: u64,
    last_reached: Option<Detection>,
    last_info: DetectionInfo,
}

impl TrackerSelector {
    pub fn new(mode: TrackerMode, screen: ScreenArea) -> Self {
        Self {
            mode,
            color: ColorPath::new(screen.clone()),
            motion: MotionPath::new(screen),
            color_hit_count: 0,
            motion_hit_count: 0,
            hybrid_switch_count: 0,
            last_reached: None,
            last_info: DetectionInfo::default(),
        }
    }

    pub fn mode(&self) -> TrackerMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TrackerMode) {
        if mode != self.mode {
            info!("tracker mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Replace the screen polygon and depth for both paths.
    pub fn set_screen_area(&mut self, screen: ScreenArea) {
        self.color.set_screen_area(screen.clone());
        self.motion.set_screen_area(screen);
    }

    pub fn set_collision_depth_threshold_m(&mut self, threshold_m: f64) {
        self.color.set_collision_depth_threshold_m(threshold_m);
        self.motion.set_collision_depth_threshold_m(threshold_m);
    }

    pub fn set_min_area(&mut self, min_area: u32) {
        self.color.detector_mut().set_min_area(min_area);
    }

    pub fn set_depth_change_threshold_mm(&mut self, threshold_mm: f64) {
        self.motion.detector_mut().set_depth_change_threshold_mm(threshold_mm);
    }

    pub fn set_min_motion_area(&mut self, area: usize) {
        self.motion.detector_mut().set_min_motion_area(area);
    }

    /// Apply a persisted tracked-color configuration to the color path.
    pub fn apply_color_config(&mut self, config: &TrackedColorConfig) {
        self.color.detector_mut().set_preset(config.color);
        self.color.detector_mut().set_min_area(config.min_area);
    }

    pub fn statistics(&self) -> TrackerStatistics {
        TrackerStatistics {
            mode: self.mode,
            color_hit_count: self.color_hit_count,
            motion_hit_count: self.motion_hit_count,
            hybrid_switch_count: self.hybrid_switch_count,
            color_sampler: self.color.sampler_stats(),
            motion_sampler: self.motion.sampler_stats(),
        }
    }

    fn record_color_hit(&mut self, hit: Detection) -> Option<Detection> {
        self.color_hit_count += 1;
        self.last_reached = Some(hit);
        Some(hit)
    }

    fn record_motion_hit(&mut self, hit: Detection, switched: bool) -> Option<Detection> {
        self.motion_hit_count += 1;
        if switched {
            self.hybrid_switch_count += 1;
            debug!("hybrid tick resolved in motion's favor");
        }
        self.last_reached = Some(hit);
        Some(hit)
    }
}

impl HitTracker for TrackerSelector {
    fn check_hit(&mut self, frames: &TickFrames<'_>) -> Option<Detection> {
        let result = match self.mode {
            TrackerMode::Color => {
                let hit = self.color.check_hit(frames);
                self.last_info = self.color.detection_info();
                hit.and_then(|h| self.record_color_hit(h))
            }
            TrackerMode::Motion => {
                let hit = self.motion.check_hit(frames);
                self.last_info = self.motion.detection_info();
                hit.and_then(|h| self.record_motion_hit(h, false))
            }
            TrackerMode::Hybrid => {
                let motion_hit = self.motion.check_hit(frames);
                let color_hit = self.color.check_hit(frames);
                self.last_info = merge_info(
                    self.color.detection_info(),
                    self.motion.detection_info(),
                );
                match (motion_hit, color_hit) {
                    (Some(m), _) => self.record_motion_hit(m, true),
                    (None, Some(c)) => self.record_color_hit(c),
                    (None, None) => None,
                }
            }
        };
        self.last_info.mode = Some(self.mode);
        if let Some(hit) = result {
            info!(
                "impact confirmed at ({}, {}), depth {:.3}m, mode {:?}",
                hit.x, hit.y, hit.depth_m, self.mode
            );
        }
        result
    }

    fn set_target_color(&mut self, name: &str) -> Result<(), ColorSpecError> {
        self.color.set_target_color(name)
    }

    fn detection_info(&self) -> DetectionInfo {
        self.last_info
    }

    fn last_reached(&self) -> Option<Detection> {
        self.last_reached
    }
}

/// Motion wins on the fields both paths report.
fn merge_info(color: DetectionInfo, motion: DetectionInfo) -> DetectionInfo {
    DetectionInfo {
        mode: None,
        detected: motion.detected || color.detected,
        position: motion.position.or(color.position),
        mask_pixels: color.mask_pixels,
        region_count: color.region_count,
        moving_pixels: motion.moving_pixels,
        candidate_count: motion.candidate_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> ScreenArea {
        ScreenArea::new(vec![[0, 0], [64, 0], [64, 48], [0, 48]], 1.5)
    }

    #[test]
    fn mode_round_trips_through_serde() {
        let json = serde_json::to_string(&TrackerMode::Hybrid).unwrap();
        assert_eq!(json, "\"hybrid\"");
        let back: TrackerMode = serde_json::from_str("\"color\"").unwrap();
        assert_eq!(back, TrackerMode::Color);
    }

    #[test]
    fn unknown_color_name_is_rejected() {
        let mut selector = TrackerSelector::new(TrackerMode::Color, screen());
        assert!(selector.set_target_color("chartreuse").is_err());
        assert!(selector.set_target_color("red").is_ok());
    }

    #[test]
    fn missing_frames_yield_no_hit() {
        let mut selector = TrackerSelector::new(TrackerMode::Hybrid, screen());
        selector.set_target_color("red").unwrap();
        let frames = TickFrames::new(None, None);
        assert!(selector.check_hit(&frames).is_none());
        let stats = selector.statistics();
        assert_eq!(stats.color_hit_count, 0);
        assert_eq!(stats.motion_hit_count, 0);
        // The snapshot reports the mode the tick ran under.
        assert_eq!(selector.detection_info().mode, Some(TrackerMode::Hybrid));
    }

    #[test]
    fn merged_info_prefers_motion_position() {
        let color = DetectionInfo {
            detected: true,
            position: Some((10, 10)),
            mask_pixels: 40,
            region_count: 1,
            ..DetectionInfo::default()
        };
        let motion = DetectionInfo {
            detected: true,
            position: Some((20, 20)),
            moving_pixels: 90,
            candidate_count: 2,
            ..DetectionInfo::default()
        };
        let merged = merge_info(color, motion);
        assert_eq!(merged.position, Some((20, 20)));
        assert_eq!(merged.mask_pixels, 40);
        assert_eq!(merged.moving_pixels, 90);
    }
}
