use log::debug;
use serde::Serialize;

use impact_track_core::{
    connected_regions, BinaryMask, ColorFrameView, DepthConfig, DepthFrameView, DepthSampler,
    Detection, Region, SamplerStats,
};

use crate::hsv::rgb_to_hsv;
use crate::params::{ColorParams, ColorPreset, ColorSpecError, HsvBand};

/// Diagnostic snapshot of the most recent detection attempt. Display only.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct ColorDetectionInfo {
    pub detected: bool,
    pub mask_pixels: usize,
    pub region_count: usize,
    pub position: Option<(i32, i32)>,
}

/// Locates a single color-defined object in a color frame.
pub struct ColorDetector {
    params: ColorParams,
    bands: Option<Vec<HsvBand>>,
    sampler: DepthSampler,
    info: ColorDetectionInfo,
}

impl ColorDetector {
    pub fn new(params: ColorParams) -> Self {
        Self {
            params,
            bands: None,
            sampler: DepthSampler::new(DepthConfig::default()),
            info: ColorDetectionInfo::default(),
        }
    }

    pub fn with_depth_config(mut self, config: DepthConfig) -> Self {
        self.sampler = DepthSampler::new(config);
        self
    }

    pub fn with_preset(mut self, preset: ColorPreset) -> Self {
        self.set_preset(preset);
        self
    }

    pub fn has_target(&self) -> bool {
        self.bands.is_some()
    }

    pub fn set_preset(&mut self, preset: ColorPreset) {
        debug!("target color preset: {}", preset.name());
        self.bands = Some(preset.bands());
    }

    /// Set custom HSV bands; each band is clamped into valid HSV range.
    /// Takes effect on the next detection call.
    pub fn set_bands(&mut self, bands: Vec<HsvBand>) {
        self.bands = Some(bands.into_iter().map(HsvBand::clamped).collect());
    }

    /// Set the target color by name. Unknown names fail fast.
    pub fn set_target_color(&mut self, name: &str) -> Result<(), ColorSpecError> {
        let preset: ColorPreset = name.parse()?;
        self.set_preset(preset);
        Ok(())
    }

    pub fn set_min_area(&mut self, min_area: u32) {
        self.params.min_area = min_area;
    }

    pub fn min_area(&self) -> u32 {
        self.params.min_area
    }

    pub fn detection_info(&self) -> ColorDetectionInfo {
        self.info
    }

    pub fn sampler_stats(&self) -> SamplerStats {
        self.sampler.stats()
    }

    /// Detect the target object: segment by HSV bands, keep regions at or
    /// above the minimum area, pick the largest, return its bounding-box
    /// center with a sampled depth.
    ///
    /// `screen_depth_m` is the fallback depth when no depth frame is
    /// available this tick.
    pub fn detect(
        &mut self,
        color: &ColorFrameView<'_>,
        depth: Option<&DepthFrameView<'_>>,
        screen_depth_m: f64,
    ) -> Option<Detection> {
        self.info = ColorDetectionInfo::default();
        let bands = self.bands.as_ref()?;

        let mask = segment(color, bands);
        self.info.mask_pixels = mask.count_set();

        let regions: Vec<Region> = connected_regions(&mask)
            .into_iter()
            .filter(|r| r.area >= self.params.min_area as usize)
            .collect();
        self.info.region_count = regions.len();
        let largest = regions.into_iter().max_by_key(|r| r.area)?;

        let (cx, cy) = largest.center();
        let depth_m = match depth {
            Some(frame) => self.sampler.measure_or_cached(frame, (color.width, color.height), cx, cy),
            None if screen_depth_m > 0.0 => screen_depth_m,
            None => 1.0,
        };

        self.info.detected = true;
        self.info.position = Some((cx, cy));
        debug!("color detection at ({cx}, {cy}), depth {depth_m:.3}m");
        Some(Detection::new(cx, cy, depth_m))
    }
}

fn segment(color: &ColorFrameView<'_>, bands: &[HsvBand]) -> BinaryMask {
    let mut mask = BinaryMask::new(color.width, color.height);
    for y in 0..color.height {
        for x in 0..color.width {
            let [r, g, b] = color.rgb(x, y);
            let (h, s, v) = rgb_to_hsv(r, g, b);
            if bands.iter().any(|band| band.contains(h, s, v)) {
                mask.set(x, y, true);
            }
        }
    }
    mask
}
