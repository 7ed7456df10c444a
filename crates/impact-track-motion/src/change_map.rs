use impact_track_core::{depth_sample_valid, morph_open, BinaryMask, DepthFrameView};

/// Per-pixel depth difference between two consecutive frames plus the
/// binary mask of approaching pixels.
pub struct ChangeMap {
    pub width: usize,
    pub height: usize,
    /// newer - older, millimeters. Negative: moving toward the sensor.
    pub delta_mm: Vec<f32>,
    pub mask: BinaryMask,
}

/// Build the change map. Pixels invalid in either frame are excluded from
/// the mask; the mask is then cleaned with a morphological opening.
///
/// Both frames must share dimensions (the caller resets its buffer when the
/// sensor renegotiates resolution).
pub fn compute_change_map(
    older: &DepthFrameView<'_>,
    newer: &DepthFrameView<'_>,
    threshold_mm: f64,
    opening_radius: usize,
) -> ChangeMap {
    debug_assert_eq!(older.width, newer.width);
    debug_assert_eq!(older.height, newer.height);

    let (w, h) = (newer.width, newer.height);
    let mut delta_mm = vec![0.0f32; w * h];
    let mut mask = BinaryMask::new(w, h);

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let prev = older.data[idx];
            let curr = newer.data[idx];
            let delta = f32::from(curr) - f32::from(prev);
            delta_mm[idx] = delta;
            if depth_sample_valid(prev)
                && depth_sample_valid(curr)
                && f64::from(delta) < threshold_mm
            {
                mask.set(x, y, true);
            }
        }
    }

    let mask = morph_open(&mask, opening_radius);
    ChangeMap {
        width: w,
        height: h,
        delta_mm,
        mask,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impact_track_core::DEPTH_INVALID_NEAR;

    fn view(width: usize, height: usize, data: &[u16]) -> DepthFrameView<'_> {
        DepthFrameView {
            width,
            height,
            data,
        }
    }

    #[test]
    fn approaching_block_sets_mask() {
        let w = 20;
        let older = vec![2000u16; w * w];
        let mut newer = vec![2000u16; w * w];
        for y in 5..15 {
            for x in 5..15 {
                newer[y * w + x] = 1800; // 200mm closer
            }
        }
        let map = compute_change_map(&view(w, w, &older), &view(w, w, &newer), -50.0, 2);
        assert!(map.mask.get(10, 10));
        assert!(!map.mask.get(2, 2));
        assert!((map.delta_mm[10 * w + 10] + 200.0).abs() < 1e-3);
    }

    #[test]
    fn receding_block_is_not_motion() {
        let w = 20;
        let older = vec![1800u16; w * w];
        let newer = vec![2000u16; w * w];
        let map = compute_change_map(&view(w, w, &older), &view(w, w, &newer), -50.0, 0);
        assert_eq!(map.mask.count_set(), 0);
    }

    #[test]
    fn invalid_pixels_are_excluded() {
        let w = 20;
        let older = vec![DEPTH_INVALID_NEAR; w * w];
        let newer = vec![1000u16; w * w];
        let map = compute_change_map(&view(w, w, &older), &view(w, w, &newer), -50.0, 0);
        assert_eq!(map.mask.count_set(), 0);
    }

    #[test]
    fn opening_suppresses_single_pixel_noise() {
        let w = 20;
        let older = vec![2000u16; w * w];
        let mut newer = vec![2000u16; w * w];
        newer[3 * w + 3] = 1500; // lone noisy pixel
        let map = compute_change_map(&view(w, w, &older), &view(w, w, &newer), -50.0, 2);
        assert_eq!(map.mask.count_set(), 0);
    }
}
