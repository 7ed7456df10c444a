use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One inclusive HSV band, OpenCV convention (H in 0..=179, S/V in 0..=255).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct HsvBand {
    pub hue: [u8; 2],
    pub saturation: [u8; 2],
    pub value: [u8; 2],
}

impl HsvBand {
    pub fn new(hue: [u8; 2], saturation: [u8; 2], value: [u8; 2]) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
        .clamped()
    }

    /// Clamp hue into the 0..=179 half-degree scale.
    pub fn clamped(mut self) -> Self {
        self.hue = [self.hue[0].min(179), self.hue[1].min(179)];
        self
    }

    #[inline]
    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        (self.hue[0]..=self.hue[1]).contains(&h)
            && (self.saturation[0]..=self.saturation[1]).contains(&s)
            && (self.value[0]..=self.value[1]).contains(&v)
    }
}

/// Built-in target color presets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPreset {
    Red,
    Pink,
}

impl ColorPreset {
    /// HSV bands for the preset. Red needs two bands because its hue wraps
    /// around 0 degrees.
    pub fn bands(self) -> Vec<HsvBand> {
        match self {
            ColorPreset::Red => vec![
                HsvBand::new([0, 10], [100, 255], [100, 255]),
                HsvBand::new([160, 179], [100, 255], [100, 255]),
            ],
            ColorPreset::Pink => vec![HsvBand::new([140, 170], [100, 255], [100, 255])],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorPreset::Red => "red",
            ColorPreset::Pink => "pink",
        }
    }
}

/// Unsupported target-color name. Configuration misuse, reported
/// synchronously rather than silently defaulting.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unsupported target color {0:?} (expected \"red\" or \"pink\")")]
pub struct ColorSpecError(pub String);

impl FromStr for ColorPreset {
    type Err = ColorSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(ColorPreset::Red),
            "pink" => Ok(ColorPreset::Pink),
            other => Err(ColorSpecError(other.to_owned())),
        }
    }
}

/// Parameters for the color detector.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ColorParams {
    /// Regions below this pixel area are treated as noise.
    pub min_area: u32,
}

impl Default for ColorParams {
    fn default() -> Self {
        Self { min_area: 30 }
    }
}
