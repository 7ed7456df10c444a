use std::collections::VecDeque;

use log::debug;
use serde::Serialize;

use impact_track_core::{
    DepthConfig, DepthFrame, DepthFrameView, DepthSampler, Detection, SamplerStats,
};

use crate::candidates::{collect_candidates, select_best};
use crate::change_map::compute_change_map;
use crate::params::MotionParams;

/// Diagnostic snapshot of the most recent detection attempt. Display only.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct MotionDetectionInfo {
    pub detected: bool,
    pub moving_pixels: usize,
    pub candidate_count: usize,
    pub position: Option<(i32, i32)>,
}

/// Detects an object approaching the sensor from consecutive depth frames.
pub struct MotionDetector {
    params: MotionParams,
    buffer: VecDeque<DepthFrame>,
    sampler: DepthSampler,
    last_position: Option<(i32, i32)>,
    info: MotionDetectionInfo,
}

impl MotionDetector {
    pub fn new(params: MotionParams) -> Self {
        Self {
            params,
            buffer: VecDeque::with_capacity(2),
            sampler: DepthSampler::new(DepthConfig::default()),
            last_position: None,
            info: MotionDetectionInfo::default(),
        }
    }

    pub fn with_depth_config(mut self, config: DepthConfig) -> Self {
        self.sampler = DepthSampler::new(config);
        self
    }

    pub fn params(&self) -> &MotionParams {
        &self.params
    }

    pub fn set_depth_change_threshold_mm(&mut self, threshold_mm: f64) {
        debug!("depth change threshold: {threshold_mm}mm");
        self.params.depth_change_threshold_mm = threshold_mm;
    }

    pub fn set_min_motion_area(&mut self, area: usize) {
        debug!("minimum motion area: {area}px");
        self.params.min_motion_area = area;
    }

    pub fn detection_info(&self) -> MotionDetectionInfo {
        self.info
    }

    pub fn sampler_stats(&self) -> SamplerStats {
        self.sampler.stats()
    }

    /// Run one tick: buffer the depth frame, diff it against the previous
    /// one, score moving regions and return the best approaching candidate
    /// in color-frame pixel space.
    ///
    /// `color_dims` is the color frame's (width, height) when one
    /// accompanies the tick; otherwise the configured nominal dimensions
    /// are used to scale the reported position.
    pub fn detect(
        &mut self,
        depth: &DepthFrameView<'_>,
        color_dims: Option<(usize, usize)>,
    ) -> Option<Detection> {
        self.info = MotionDetectionInfo::default();

        // The sensor can renegotiate resolution between ticks; a stale
        // frame of different size cannot be diffed.
        if self
            .buffer
            .back()
            .is_some_and(|f| f.width != depth.width || f.height != depth.height)
        {
            debug!(
                "depth resolution changed to {}x{}; resetting frame buffer",
                depth.width, depth.height
            );
            self.buffer.clear();
        }

        if self.buffer.len() == 2 {
            self.buffer.pop_front();
        }
        self.buffer.push_back(DepthFrame::from_view(depth));
        if self.buffer.len() < 2 {
            return None;
        }

        let older = self.buffer[0].view();
        let newer = self.buffer[1].view();
        let map = compute_change_map(
            &older,
            &newer,
            self.params.depth_change_threshold_mm,
            self.params.opening_radius,
        );
        self.info.moving_pixels = map.mask.count_set();
        if self.info.moving_pixels == 0 {
            self.last_position = None;
            return None;
        }

        let mut candidates = collect_candidates(&map, &self.params);
        self.info.candidate_count = candidates.len();
        if candidates.is_empty() {
            self.last_position = None;
            return None;
        }

        let best_idx = select_best(&mut candidates, self.last_position, &self.params)?;
        let best = &candidates[best_idx];
        if best.approach_confidence < self.params.approach_confidence_threshold {
            debug!(
                "best candidate at {:?} rejected: confidence {:.2} below {:.2}",
                best.center, best.approach_confidence, self.params.approach_confidence_threshold
            );
            return None;
        }

        let color_dims = color_dims.unwrap_or(self.params.color_frame_dims);
        let (cx, cy) = scale_to_color(best.center, (depth.width, depth.height), color_dims);
        let depth_m = self.sampler.measure_or_cached(&newer, color_dims, cx, cy);

        debug!(
            "motion detection at ({cx}, {cy}), depth {depth_m:.3}m, confidence {:.2}",
            best.approach_confidence
        );
        self.last_position = Some(best.center);
        self.info.detected = true;
        self.info.position = Some((cx, cy));
        Some(Detection::new(cx, cy, depth_m))
    }
}

/// Map a depth-frame pixel into color-frame pixel space using the ratio of
/// the two resolutions.
fn scale_to_color(
    center: (i32, i32),
    depth_dims: (usize, usize),
    color_dims: (usize, usize),
) -> (i32, i32) {
    let x = f64::from(center.0) * color_dims.0 as f64 / depth_dims.0.max(1) as f64;
    let y = f64::from(center.1) * color_dims.1 as f64 / depth_dims.1.max(1) as f64;
    (x as i32, y as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(width: usize, height: usize, data: &[u16]) -> DepthFrameView<'_> {
        DepthFrameView {
            width,
            height,
            data,
        }
    }

    fn flat(width: usize, height: usize, mm: u16) -> Vec<u16> {
        vec![mm; width * height]
    }

    /// Paint a square blob of the given depth onto a flat frame.
    fn with_blob(mut frame: Vec<u16>, width: usize, at: (usize, usize), size: usize, mm: u16) -> Vec<u16> {
        for y in at.1..at.1 + size {
            for x in at.0..at.0 + size {
                frame[y * width + x] = mm;
            }
        }
        frame
    }

    #[test]
    fn first_frame_yields_nothing() {
        let w = 64;
        let frame = flat(w, w, 2000);
        let mut det = MotionDetector::new(MotionParams::default());
        assert!(det.detect(&view(w, w, &frame), Some((w, w))).is_none());
    }

    #[test]
    fn approaching_blob_is_detected() {
        let w = 64;
        let older = flat(w, w, 2000);
        // 12x12 blob moved 300mm closer: area 144, strong approach.
        let newer = with_blob(flat(w, w, 2000), w, (20, 20), 12, 1700);
        let mut det = MotionDetector::new(MotionParams::default());
        assert!(det.detect(&view(w, w, &older), Some((w, w))).is_none());
        let d = det.detect(&view(w, w, &newer), Some((w, w))).unwrap();
        // Blob center (26, 26), same-resolution color frame.
        assert_eq!((d.x, d.y), (26, 26));
        assert!((d.depth_m - 1.7).abs() < 1e-6);
        assert!(det.detection_info().detected);
    }

    #[test]
    fn weak_approach_fails_the_confidence_gate() {
        let w = 64;
        let older = flat(w, w, 2000);
        // 60mm closer: depth score 0.3 < 0.5 threshold.
        let newer = with_blob(flat(w, w, 2000), w, (20, 20), 12, 1940);
        let mut det = MotionDetector::new(MotionParams::default());
        det.detect(&view(w, w, &older), Some((w, w)));
        assert!(det.detect(&view(w, w, &newer), Some((w, w))).is_none());
    }

    #[test]
    fn static_scene_yields_nothing() {
        let w = 64;
        let frame = flat(w, w, 2000);
        let mut det = MotionDetector::new(MotionParams::default());
        det.detect(&view(w, w, &frame), Some((w, w)));
        assert!(det.detect(&view(w, w, &frame), Some((w, w))).is_none());
        assert_eq!(det.detection_info().moving_pixels, 0);
    }

    #[test]
    fn oversized_blob_is_filtered_by_area() {
        let w = 128;
        let older = flat(w, w, 2000);
        // 110x110 = 12100px > max_motion_area.
        let newer = with_blob(flat(w, w, 2000), w, (5, 5), 110, 1600);
        let mut det = MotionDetector::new(MotionParams::default());
        det.detect(&view(w, w, &older), Some((w, w)));
        assert!(det.detect(&view(w, w, &newer), Some((w, w))).is_none());
    }

    #[test]
    fn resolution_change_resets_the_buffer() {
        let older = flat(64, 64, 2000);
        let smaller = flat(32, 32, 1500);
        let mut det = MotionDetector::new(MotionParams::default());
        det.detect(&view(64, 64, &older), Some((64, 64)));
        // New resolution: buffer restarts, so no diff is possible yet.
        assert!(det.detect(&view(32, 32, &smaller), Some((32, 32))).is_none());
        assert!(det.detect(&view(32, 32, &smaller), Some((32, 32))).is_none());
    }

    #[test]
    fn position_is_scaled_into_color_space() {
        let w = 64;
        let older = flat(w, w, 2000);
        let newer = with_blob(flat(w, w, 2000), w, (20, 20), 12, 1700);
        let mut det = MotionDetector::new(MotionParams::default());
        det.detect(&view(w, w, &older), Some((128, 128)));
        let d = det.detect(&view(w, w, &newer), Some((128, 128))).unwrap();
        assert_eq!((d.x, d.y), (52, 52)); // 26 * 128/64
    }
}
