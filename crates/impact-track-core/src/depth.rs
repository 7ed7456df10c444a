//! Validated depth sampling at color-frame coordinates.
//!
//! Depth sensors report 0 / 65535 for "no measurement", and small objects
//! near their own edges frequently land on such pixels. [`DepthSampler`]
//! recovers a usable value by inverse-distance-weighted interpolation over a
//! square neighborhood, with a step-detection pass that strips background
//! pixels before the weighted average is recomputed. A naive mean would wash
//! a small foreground ball out toward the distant screen behind it.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::frame::{depth_sample_valid, DepthFrameView};

/// Settings for depth validation and interpolation.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct DepthConfig {
    /// Valid measurement range in meters.
    pub min_valid_depth_m: f64,
    pub max_valid_depth_m: f64,

    /// Neighbor search radius in depth pixels. Doubled in small-object mode.
    pub interpolation_radius: i32,

    /// Seed for the cached-fallback value and reference for confidence.
    pub reference_depth_m: f64,

    /// Neighbor sample range above which two depth layers are assumed mixed
    /// (object + background) and the far layer is filtered out.
    pub background_step_mm: f64,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            min_valid_depth_m: 0.5,
            max_valid_depth_m: 5.0,
            interpolation_radius: 10,
            reference_depth_m: 2.0,
            background_step_mm: 200.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum DepthError {
    /// Raw sample was a sensor-reserved invalid marker and interpolation
    /// could not recover a valid value either.
    #[error("invalid depth sample at depth pixel ({x}, {y})")]
    InvalidSample { x: usize, y: usize },

    /// Interpolation found no valid neighbor at all.
    #[error("no valid depth neighbor within {radius}px of ({x}, {y})")]
    InsufficientNeighbors { x: usize, y: usize, radius: i32 },

    /// Interpolated value fell outside the configured valid range.
    #[error("depth {depth_m:.3}m outside valid range {min_m:.2}..{max_m:.2}m")]
    OutOfRange { depth_m: f64, min_m: f64, max_m: f64 },
}

/// Measurement counters, exposed for diagnostics.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SamplerStats {
    pub measurements: u64,
    pub fallbacks: u64,
    pub last_valid_depth_m: f64,
}

/// Statistic applied by [`DepthSampler::measure_region`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegionStat {
    Mean,
    Median,
    Max,
    Min,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ScaleCache {
    color_w: usize,
    color_h: usize,
    depth_w: usize,
    depth_h: usize,
}

/// Extracts a validated, interpolated depth value (meters) at a color-frame
/// coordinate. Caches the color-to-depth scaling factors per resolution pair
/// and the last successful measurement for fallback.
#[derive(Debug)]
pub struct DepthSampler {
    config: DepthConfig,
    scale: Option<ScaleCache>,
    last_valid_m: f64,
    measurements: u64,
    fallbacks: u64,
}

impl DepthSampler {
    pub fn new(config: DepthConfig) -> Self {
        Self {
            last_valid_m: config.reference_depth_m,
            config,
            scale: None,
            measurements: 0,
            fallbacks: 0,
        }
    }

    pub fn config(&self) -> &DepthConfig {
        &self.config
    }

    pub fn stats(&self) -> SamplerStats {
        SamplerStats {
            measurements: self.measurements,
            fallbacks: self.fallbacks,
            last_valid_depth_m: self.last_valid_m,
        }
    }

    /// Whether a meter value lies within the configured valid range.
    pub fn is_valid_depth(&self, depth_m: f64) -> bool {
        depth_m >= self.config.min_valid_depth_m && depth_m <= self.config.max_valid_depth_m
    }

    /// Measure the depth at a color-frame coordinate.
    ///
    /// `color_dims` is the (width, height) of the color frame the coordinate
    /// lives in; the mapping to depth pixels is re-derived whenever either
    /// resolution changes.
    pub fn measure(
        &mut self,
        depth: &DepthFrameView<'_>,
        color_dims: (usize, usize),
        x: i32,
        y: i32,
    ) -> Result<f64, DepthError> {
        self.measurements += 1;
        let (dx, dy) = self.map_to_depth(depth, color_dims, x, y);
        let raw = depth.sample(dx, dy);

        let depth_m = if !depth_sample_valid(raw) {
            // Small-object mode: the ball is often thinner than the invalid
            // band around object edges, so search twice as far.
            self.interpolate(depth, dx, dy, true)
                .map_err(|e| match e {
                    DepthError::InsufficientNeighbors { .. } => e,
                    _ => DepthError::InvalidSample { x: dx, y: dy },
                })?
        } else {
            let direct = f64::from(raw) / 1000.0;
            if self.is_valid_depth(direct) {
                direct
            } else {
                self.interpolate(depth, dx, dy, false)?
            }
        };

        self.last_valid_m = depth_m;
        Ok(depth_m)
    }

    /// Like [`measure`](Self::measure), but a failed tick falls back to the
    /// last successful value instead of surfacing an error. Single-frame
    /// dropouts must not suppress tracking.
    pub fn measure_or_cached(
        &mut self,
        depth: &DepthFrameView<'_>,
        color_dims: (usize, usize),
        x: i32,
        y: i32,
    ) -> f64 {
        match self.measure(depth, color_dims, x, y) {
            Ok(m) => m,
            Err(e) => {
                self.fallbacks += 1;
                debug!(
                    "depth measure at ({x}, {y}) failed ({e}); using cached {:.3}m",
                    self.last_valid_m
                );
                self.last_valid_m
            }
        }
    }

    /// Statistical depth over a rectangular color-frame region, sampled on a
    /// grid of at most 5x5 points. `None` when the rectangle is degenerate
    /// or no sample is valid.
    pub fn measure_region(
        &mut self,
        depth: &DepthFrameView<'_>,
        color_dims: (usize, usize),
        rect: (i32, i32, i32, i32),
        stat: RegionStat,
    ) -> Option<f64> {
        let (x1, y1, x2, y2) = rect;
        if x1 >= x2 || y1 >= y2 {
            warn!("degenerate region ({x1}, {y1})-({x2}, {y2})");
            return None;
        }
        let step = ((x2 - x1) / 5).max(1);
        let mut values = Vec::new();
        let mut y = y1;
        while y < y2 {
            let mut x = x1;
            while x < x2 {
                if let Ok(m) = self.measure(depth, color_dims, x, y) {
                    values.push(m);
                }
                x += step;
            }
            y += step;
        }
        if values.is_empty() {
            return None;
        }
        Some(match stat {
            RegionStat::Mean => values.iter().sum::<f64>() / values.len() as f64,
            RegionStat::Median => {
                values.sort_by(|a, b| a.total_cmp(b));
                values[values.len() / 2]
            }
            RegionStat::Max => values.iter().cloned().fold(f64::MIN, f64::max),
            RegionStat::Min => values.iter().cloned().fold(f64::MAX, f64::min),
        })
    }

    /// Confidence in [0, 1] for the measurement at a coordinate: half from
    /// the deviation against the reference depth, half from agreement with
    /// the surrounding region mean. Advisory only; collision logic does not
    /// consume it.
    pub fn confidence(
        &mut self,
        depth: &DepthFrameView<'_>,
        color_dims: (usize, usize),
        x: i32,
        y: i32,
    ) -> f64 {
        let Ok(depth_m) = self.measure(depth, color_dims, x, y) else {
            return 0.0;
        };

        let base_score = if self.config.reference_depth_m > 0.0 {
            let deviation =
                (depth_m - self.config.reference_depth_m).abs() / self.config.reference_depth_m;
            (1.0 - deviation).max(0.0)
        } else {
            0.5
        };

        let region = self.measure_region(
            depth,
            color_dims,
            (x - 10, y - 10, x + 10, y + 10),
            RegionStat::Mean,
        );
        let score = match region {
            Some(region_m) if region_m > 0.0 => {
                let region_score = (1.0 - (depth_m - region_m).abs() / region_m).max(0.0);
                0.5 * base_score + 0.5 * region_score
            }
            _ => base_score,
        };
        score.clamp(0.0, 1.0)
    }

    fn map_to_depth(
        &mut self,
        depth: &DepthFrameView<'_>,
        color_dims: (usize, usize),
        x: i32,
        y: i32,
    ) -> (usize, usize) {
        let cache = ScaleCache {
            color_w: color_dims.0.max(1),
            color_h: color_dims.1.max(1),
            depth_w: depth.width,
            depth_h: depth.height,
        };
        if self.scale != Some(cache) {
            debug!(
                "depth scale map updated: color {}x{} -> depth {}x{}",
                cache.color_w, cache.color_h, cache.depth_w, cache.depth_h
            );
            self.scale = Some(cache);
        }
        let dx = (x as f64 * cache.depth_w as f64 / cache.color_w as f64) as i64;
        let dy = (y as f64 * cache.depth_h as f64 / cache.color_h as f64) as i64;
        let dx = dx.clamp(0, cache.depth_w as i64 - 1) as usize;
        let dy = dy.clamp(0, cache.depth_h as i64 - 1) as usize;
        (dx, dy)
    }

    /// Inverse-distance-weighted interpolation around a depth pixel, with
    /// background-step filtering.
    fn interpolate(
        &self,
        depth: &DepthFrameView<'_>,
        x: usize,
        y: usize,
        small_object: bool,
    ) -> Result<f64, DepthError> {
        let radius = if small_object {
            self.config.interpolation_radius * 2
        } else {
            self.config.interpolation_radius
        };

        let mut samples: Vec<(f64, f64)> = Vec::new(); // (mm, pixel distance)
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || ny < 0 || nx >= depth.width as i32 || ny >= depth.height as i32 {
                    continue;
                }
                let raw = depth.sample(nx as usize, ny as usize);
                if depth_sample_valid(raw) {
                    let distance = f64::from(dx * dx + dy * dy).sqrt();
                    samples.push((f64::from(raw), distance));
                }
            }
        }

        if samples.is_empty() {
            return Err(DepthError::InsufficientNeighbors { x, y, radius });
        }

        let weighted_mm = weighted_average_mm(&samples);
        let filtered = filter_background(&samples, self.config.background_step_mm);
        let filtered_mm = weighted_average_mm(&filtered);

        let filtered_m = filtered_mm / 1000.0;
        if self.is_valid_depth(filtered_m) {
            return Ok(filtered_m);
        }
        let weighted_m = weighted_mm / 1000.0;
        if self.is_valid_depth(weighted_m) {
            return Ok(weighted_m);
        }
        Err(DepthError::OutOfRange {
            depth_m: filtered_m,
            min_m: self.config.min_valid_depth_m,
            max_m: self.config.max_valid_depth_m,
        })
    }
}

/// Inverse-distance weights `1 / (d + 1)`: near pixels are likely the same
/// object, far pixels likely background.
fn weighted_average_mm(samples: &[(f64, f64)]) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for &(mm, distance) in samples {
        let weight = 1.0 / (distance + 1.0);
        weighted_sum += mm * weight;
        total_weight += weight;
    }
    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    }
}

/// Step detection: when the sample range exceeds `step_mm`, two depth layers
/// are mixed. Keep samples near the minimum (the object side), dropping the
/// background. Retries with a looser threshold before giving up on
/// filtering entirely.
fn filter_background(samples: &[(f64, f64)], step_mm: f64) -> Vec<(f64, f64)> {
    if samples.len() < 3 {
        return samples.to_vec();
    }
    let min = samples.iter().map(|&(d, _)| d).fold(f64::MAX, f64::min);
    let max = samples.iter().map(|&(d, _)| d).fold(f64::MIN, f64::max);
    let range = max - min;
    if range <= step_mm {
        return samples.to_vec();
    }

    for frac in [0.2, 0.5] {
        let threshold = min + range * frac;
        let kept: Vec<(f64, f64)> = samples
            .iter()
            .copied()
            .filter(|&(d, _)| d <= threshold)
            .collect();
        if !kept.is_empty() {
            debug!(
                "background step {range:.0}mm detected: kept {}/{} samples below {threshold:.0}mm",
                kept.len(),
                samples.len()
            );
            return kept;
        }
    }
    samples.to_vec()
}
