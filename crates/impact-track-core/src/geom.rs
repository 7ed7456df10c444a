//! Polygon tests in color-frame pixel space.
//!
//! Containment is boundary-inclusive to match the convention that a ball
//! sitting exactly on the screen edge still counts as inside.

use nalgebra::Vector2;

/// Boundary-inclusive point-in-polygon test (even-odd rule).
///
/// Fewer than 3 vertices never contain anything.
pub fn point_in_polygon(points: &[[i32; 2]], x: i32, y: i32) -> bool {
    if points.len() < 3 {
        return false;
    }

    for (a, b) in edges(points) {
        if on_segment(a, b, [x, y]) {
            return true;
        }
    }

    let mut inside = false;
    for (a, b) in edges(points) {
        let (ax, ay) = (a[0] as f64, a[1] as f64);
        let (bx, by) = (b[0] as f64, b[1] as f64);
        let (px, py) = (x as f64, y as f64);
        if (ay > py) != (by > py) {
            let x_cross = ax + (py - ay) / (by - ay) * (bx - ax);
            if px < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Minimal distance from a point to the polygon boundary, in pixels.
///
/// Returns `None` for degenerate polygons (< 3 vertices).
pub fn distance_to_polygon(points: &[[i32; 2]], x: i32, y: i32) -> Option<f64> {
    if points.len() < 3 {
        return None;
    }
    let p = Vector2::new(x as f64, y as f64);
    let mut best = f64::INFINITY;
    for (a, b) in edges(points) {
        let a = Vector2::new(a[0] as f64, a[1] as f64);
        let b = Vector2::new(b[0] as f64, b[1] as f64);
        best = best.min(point_segment_distance(p, a, b));
    }
    Some(best)
}

/// Turn angle in degrees between the segments `prev -> last` and
/// `last -> cur`. `None` when either segment has zero length.
pub fn turn_angle_deg(prev: [i32; 2], last: [i32; 2], cur: [i32; 2]) -> Option<f64> {
    let v_prev = Vector2::new((last[0] - prev[0]) as f64, (last[1] - prev[1]) as f64);
    let v_curr = Vector2::new((cur[0] - last[0]) as f64, (cur[1] - last[1]) as f64);
    let n_prev = v_prev.norm();
    let n_curr = v_curr.norm();
    if n_prev == 0.0 || n_curr == 0.0 {
        return None;
    }
    let cos_theta = (v_prev.dot(&v_curr) / (n_prev * n_curr)).clamp(-1.0, 1.0);
    Some(cos_theta.acos().to_degrees())
}

fn edges(points: &[[i32; 2]]) -> impl Iterator<Item = ([i32; 2], [i32; 2])> + '_ {
    (0..points.len()).map(move |i| (points[i], points[(i + 1) % points.len()]))
}

fn on_segment(a: [i32; 2], b: [i32; 2], p: [i32; 2]) -> bool {
    let cross =
        (b[0] - a[0]) as i64 * (p[1] - a[1]) as i64 - (b[1] - a[1]) as i64 * (p[0] - a[0]) as i64;
    if cross != 0 {
        return false;
    }
    p[0] >= a[0].min(b[0]) && p[0] <= a[0].max(b[0]) && p[1] >= a[1].min(b[1]) && p[1] <= a[1].max(b[1])
}

fn point_segment_distance(p: Vector2<f64>, a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SQUARE: [[i32; 2]; 4] = [[0, 0], [10, 0], [10, 10], [0, 10]];

    #[test]
    fn containment_interior_exterior_boundary() {
        assert!(point_in_polygon(&SQUARE, 5, 5));
        assert!(!point_in_polygon(&SQUARE, 15, 5));
        assert!(!point_in_polygon(&SQUARE, -1, 5));
        // boundary counts as inside
        assert!(point_in_polygon(&SQUARE, 0, 5));
        assert!(point_in_polygon(&SQUARE, 10, 10));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let line = [[0, 0], [10, 0]];
        assert!(!point_in_polygon(&line, 5, 0));
        assert!(distance_to_polygon(&line, 5, 0).is_none());
    }

    #[test]
    fn distance_to_square_edge() {
        let d = distance_to_polygon(&SQUARE, 5, 12).unwrap();
        assert_relative_eq!(d, 2.0, epsilon = 1e-9);
        let d = distance_to_polygon(&SQUARE, 5, 5).unwrap();
        assert_relative_eq!(d, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn turn_angle_of_straight_path_is_zero() {
        let a = turn_angle_deg([0, 0], [10, 0], [20, 0]).unwrap();
        assert_relative_eq!(a, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn turn_angle_of_right_angle_turn() {
        let a = turn_angle_deg([0, 0], [10, 0], [10, 10]).unwrap();
        assert_relative_eq!(a, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_length_segment_has_no_angle() {
        assert!(turn_angle_deg([5, 5], [5, 5], [10, 10]).is_none());
    }
}
