//! Depth-delta motion detector.
//!
//! Compares consecutive depth frames to find regions moving toward the
//! sensor, scores candidate regions on approach strength, frame-to-frame
//! continuity, depth consistency and area, and reports the best candidate.
//! Color-independent, so robust to lighting changes.
//!
//! A naive "largest moving blob" heuristic is fooled by shadows, hands and
//! sensor noise; the weighted score folds kinematic, physical and shape
//! plausibility into one decision.

mod candidates;
mod change_map;
mod detector;
mod params;

pub use candidates::{collect_candidates, select_best, MotionCandidate};
pub use change_map::{compute_change_map, ChangeMap};
pub use detector::{MotionDetectionInfo, MotionDetector};
pub use params::MotionParams;
