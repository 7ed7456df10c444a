/// Sensor-reserved marker for "no measurement" on the near side.
pub const DEPTH_INVALID_NEAR: u16 = 0;

/// Sensor-reserved marker for "no measurement / saturated" on the far side.
pub const DEPTH_INVALID_FAR: u16 = u16::MAX;

/// Whether a raw depth sample carries an actual measurement.
#[inline]
pub fn depth_sample_valid(raw: u16) -> bool {
    raw != DEPTH_INVALID_NEAR && raw != DEPTH_INVALID_FAR
}

/// Borrowed RGB8 color frame, row-major, 3 bytes per pixel.
#[derive(Clone, Copy, Debug)]
pub struct ColorFrameView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // len = w*h*3
}

impl ColorFrameView<'_> {
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Borrowed depth frame in millimeters, row-major, one u16 per pixel.
#[derive(Clone, Copy, Debug)]
pub struct DepthFrameView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u16], // len = w*h
}

impl DepthFrameView<'_> {
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> u16 {
        self.data[y * self.width + x]
    }
}

/// Owned depth frame, used where a frame must outlive its producer
/// (the motion detector's two-slot ring buffer).
#[derive(Clone, Debug)]
pub struct DepthFrame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u16>,
}

impl DepthFrame {
    pub fn from_view(view: &DepthFrameView<'_>) -> Self {
        Self {
            width: view.width,
            height: view.height,
            data: view.data.to_vec(),
        }
    }

    pub fn view(&self) -> DepthFrameView<'_> {
        DepthFrameView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}
