use serde::{Deserialize, Serialize};

use crate::geom::{distance_to_polygon, point_in_polygon};

/// A single candidate object location in color-frame pixel space with a
/// verified depth in meters. `depth_m <= 0` means "no usable depth".
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub x: i32,
    pub y: i32,
    pub depth_m: f64,
}

impl Detection {
    pub fn new(x: i32, y: i32, depth_m: f64) -> Self {
        Self { x, y, depth_m }
    }

    pub fn has_depth(&self) -> bool {
        self.depth_m > 0.0
    }
}

/// The projected screen surface: a polygon in color-frame pixel space plus
/// the sensor-to-screen distance. Owned by the hosting application and
/// reloadable between ticks; the tracking core only reads it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenArea {
    points: Vec<[i32; 2]>,
    depth_m: f64,
}

impl ScreenArea {
    pub fn new(points: Vec<[i32; 2]>, depth_m: f64) -> Self {
        Self { points, depth_m }
    }

    pub fn points(&self) -> &[[i32; 2]] {
        &self.points
    }

    pub fn set_points(&mut self, points: Vec<[i32; 2]>) {
        self.points = points;
    }

    pub fn depth_m(&self) -> f64 {
        self.depth_m
    }

    pub fn set_depth_m(&mut self, depth_m: f64) {
        self.depth_m = depth_m;
    }

    /// Polygon tests need at least 3 vertices; anything less treats every
    /// point as outside.
    pub fn is_usable(&self) -> bool {
        self.points.len() >= 3
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        point_in_polygon(&self.points, x, y)
    }

    /// Distance from a point to the polygon boundary, `None` when the
    /// polygon is degenerate.
    pub fn distance_to_edge(&self, x: i32, y: i32) -> Option<f64> {
        distance_to_polygon(&self.points, x, y)
    }
}
