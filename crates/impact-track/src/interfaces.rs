use impact_track_color::ColorSpecError;
use impact_track_core::{ColorFrameView, DepthFrameView, Detection};

use crate::selector::TrackerMode;

/// The frames available for one pipeline tick. Either frame may be absent;
/// trackers run whatever their inputs allow and report `None` otherwise.
#[derive(Clone, Copy, Debug)]
pub struct TickFrames<'a> {
    pub color: Option<ColorFrameView<'a>>,
    pub depth: Option<DepthFrameView<'a>>,
}

impl<'a> TickFrames<'a> {
    pub fn new(
        color: Option<ColorFrameView<'a>>,
        depth: Option<DepthFrameView<'a>>,
    ) -> Self {
        Self { color, depth }
    }

    /// Color frame dimensions when a color frame accompanies this tick.
    pub fn color_dims(&self) -> Option<(usize, usize)> {
        self.color.map(|c| (c.width, c.height))
    }
}

/// Merged diagnostic snapshot of the most recent tick. Color-path and
/// motion-path fields coexist; `detected` and `position` reflect whichever
/// path produced a detection, motion winning when both did. `mode` is
/// filled in by the selector; a bare path reports `None`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetectionInfo {
    pub mode: Option<TrackerMode>,
    pub detected: bool,
    pub position: Option<(i32, i32)>,
    pub mask_pixels: usize,
    pub region_count: usize,
    pub moving_pixels: usize,
    pub candidate_count: usize,
}

/// Common surface of anything that can turn per-tick frames into hit
/// events: the two concrete paths and the selector that arbitrates them.
pub trait HitTracker {
    /// Run one tick and report a hit if this tick produced one.
    fn check_hit(&mut self, frames: &TickFrames<'_>) -> Option<Detection>;

    /// Select the tracked color by preset name. Trackers that do not use
    /// color accept any name and ignore it.
    fn set_target_color(&mut self, name: &str) -> Result<(), ColorSpecError>;

    /// Diagnostic snapshot of the most recent tick.
    fn detection_info(&self) -> DetectionInfo;

    /// Most recent hit this tracker emitted.
    fn last_reached(&self) -> Option<Detection>;
}
