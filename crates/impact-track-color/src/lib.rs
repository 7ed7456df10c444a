//! Color-segmentation ball detector.
//!
//! Finds the centroid of the largest qualifying region within an HSV color
//! range in a color frame. Red wraps around the 0-degree hue boundary, so
//! the red preset applies two hue bands OR'd together; losing either band
//! silently drops half the red gamut.
//!
//! ## Quickstart
//!
//! ```
//! use impact_track_color::{ColorDetector, ColorParams, ColorPreset};
//!
//! let mut detector = ColorDetector::new(ColorParams::default()).with_preset(ColorPreset::Red);
//! assert!(detector.has_target());
//! ```

mod detector;
mod hsv;
mod params;

pub use detector::{ColorDetectionInfo, ColorDetector};
pub use hsv::rgb_to_hsv;
pub use params::{ColorParams, ColorPreset, ColorSpecError, HsvBand};
