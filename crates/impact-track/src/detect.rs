//! End-to-end helpers over `image` buffers.
//!
//! The core pipeline works on borrowed frame views; these helpers adapt the
//! common `image` buffer types so callers holding decoded frames can run a
//! tick without building views by hand.

use image::{ImageBuffer, Luma, RgbImage};

use impact_track_core::{ColorFrameView, Detection, DepthFrameView};

use crate::interfaces::{HitTracker, TickFrames};
use crate::selector::TrackerSelector;

/// A 16-bit single-channel depth image, one millimeter per unit.
pub type DepthImage = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Convert an `image::RgbImage` into the lightweight `impact-track-core` view type.
pub fn color_view(img: &RgbImage) -> ColorFrameView<'_> {
    ColorFrameView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Convert a 16-bit depth image into the lightweight `impact-track-core` view type.
pub fn depth_view(img: &DepthImage) -> DepthFrameView<'_> {
    DepthFrameView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Run one selector tick straight from `image` buffers.
pub fn check_hit_images(
    selector: &mut TrackerSelector,
    color: Option<&RgbImage>,
    depth: Option<&DepthImage>,
) -> Option<Detection> {
    let frames = TickFrames::new(color.map(color_view), depth.map(depth_view));
    selector.check_hit(&frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_preserve_dimensions_and_pixels() {
        let mut rgb = RgbImage::new(4, 3);
        rgb.put_pixel(2, 1, image::Rgb([255, 0, 0]));
        let view = color_view(&rgb);
        assert_eq!((view.width, view.height), (4, 3));
        assert_eq!(view.rgb(2, 1), [255, 0, 0]);

        let mut depth = DepthImage::new(4, 3);
        depth.put_pixel(3, 2, Luma([1234u16]));
        let view = depth_view(&depth);
        assert_eq!(view.sample(3, 2), 1234);
    }
}
