use impact_track_core::connected_regions;

use crate::change_map::ChangeMap;
use crate::params::MotionParams;

/// One moving-region candidate, in depth-frame pixel space. Ephemeral,
/// recomputed every tick.
#[derive(Clone, Debug)]
pub struct MotionCandidate {
    pub center: (i32, i32),
    pub area: usize,
    pub avg_delta_mm: f64,
    pub delta_std_mm: f64,
    pub score: f64,
    pub approach_confidence: f64,
}

/// Extract candidates from the change map: connected mask regions within
/// the accepted area range, annotated with the mean and spread of the depth
/// delta over their own pixels.
pub fn collect_candidates(map: &ChangeMap, params: &MotionParams) -> Vec<MotionCandidate> {
    let mut candidates = Vec::new();
    for region in connected_regions(&map.mask) {
        if region.area < params.min_motion_area || region.area > params.max_motion_area {
            continue;
        }
        let deltas: Vec<f64> = region
            .pixels
            .iter()
            .map(|&idx| f64::from(map.delta_mm[idx]))
            .collect();
        if deltas.is_empty() {
            continue;
        }
        let mean = deltas.iter().sum::<f64>() / deltas.len() as f64;
        let var = deltas.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / deltas.len() as f64;
        candidates.push(MotionCandidate {
            center: region.center(),
            area: region.area,
            avg_delta_mm: mean,
            delta_std_mm: var.sqrt(),
            score: 0.0,
            approach_confidence: 0.0,
        });
    }
    candidates
}

/// Score every candidate and return the index of the best one.
///
/// Weights sum to 1.0: approach strength 0.4, frame-to-frame continuity
/// 0.3, depth consistency 0.2, area plausibility 0.1. Approach confidence
/// is the depth score when the region actually moved closer, zero
/// otherwise.
pub fn select_best(
    candidates: &mut [MotionCandidate],
    last_position: Option<(i32, i32)>,
    params: &MotionParams,
) -> Option<usize> {
    const OPTIMAL_AREA: f64 = 500.0;

    let mut best: Option<(usize, f64)> = None;
    for (i, candidate) in candidates.iter_mut().enumerate() {
        let depth_score = (candidate.avg_delta_mm.abs() / 200.0).min(1.0);

        let continuity_score = match last_position {
            Some((lx, ly)) => {
                let dx = f64::from(candidate.center.0 - lx);
                let dy = f64::from(candidate.center.1 - ly);
                (1.0 - (dx * dx + dy * dy).sqrt() / 200.0).max(0.0)
            }
            None => 1.0,
        };

        let variance_score =
            (1.0 - candidate.delta_std_mm / params.depth_variance_threshold_mm).max(0.0);

        let area_score = (1.0 - (candidate.area as f64 - OPTIMAL_AREA).abs() / 2000.0).max(0.0);

        candidate.score = depth_score * 0.4
            + continuity_score * 0.3
            + variance_score * 0.2
            + area_score * 0.1;
        candidate.approach_confidence = if candidate.avg_delta_mm < 0.0 {
            depth_score
        } else {
            0.0
        };

        if best.map(|(_, s)| candidate.score > s).unwrap_or(true) {
            best = Some((i, candidate.score));
        }
    }
    best.map(|(i, _)| i)
}
