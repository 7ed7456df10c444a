//! End-to-end pipeline tests over synthetic frames.

use impact_track::core::{ColorFrameView, DepthFrameView, ScreenArea};
use impact_track::{
    ColorPreset, HitTracker, TickFrames, TrackedColorConfig, TrackerMode, TrackerSelector,
};

const COLOR_W: usize = 64;
const COLOR_H: usize = 48;
const DEPTH_W: usize = 32;
const DEPTH_H: usize = 24;

fn full_screen(depth_m: f64) -> ScreenArea {
    ScreenArea::new(
        vec![[0, 0], [COLOR_W as i32, 0], [COLOR_W as i32, COLOR_H as i32], [0, COLOR_H as i32]],
        depth_m,
    )
}

/// Black color frame with a solid rectangle of the given RGB value.
fn color_frame(rect: (usize, usize, usize, usize), rgb: [u8; 3]) -> Vec<u8> {
    let (x0, y0, w, h) = rect;
    let mut data = vec![0u8; COLOR_W * COLOR_H * 3];
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            let i = (y * COLOR_W + x) * 3;
            data[i..i + 3].copy_from_slice(&rgb);
        }
    }
    data
}

fn blank_color_frame() -> Vec<u8> {
    vec![0u8; COLOR_W * COLOR_H * 3]
}

/// Flat depth frame with an optional rectangle at a different depth.
fn depth_frame(background_mm: u16, rect: Option<(usize, usize, usize, usize, u16)>) -> Vec<u16> {
    let mut data = vec![background_mm; DEPTH_W * DEPTH_H];
    if let Some((x0, y0, w, h, mm)) = rect {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                data[y * DEPTH_W + x] = mm;
            }
        }
    }
    data
}

fn frames<'a>(color: &'a [u8], depth: &'a [u16]) -> TickFrames<'a> {
    TickFrames::new(
        Some(ColorFrameView {
            width: COLOR_W,
            height: COLOR_H,
            data: color,
        }),
        Some(DepthFrameView {
            width: DEPTH_W,
            height: DEPTH_H,
            data: depth,
        }),
    )
}

#[test]
fn color_mode_emits_exactly_one_hit_for_a_steady_ball() {
    let mut selector = TrackerSelector::new(TrackerMode::Color, full_screen(1.5));
    selector.set_target_color("red").unwrap();

    let color = color_frame((20, 10, 10, 10), [220, 20, 20]);
    let depth = depth_frame(1000, None);

    let hit = selector.check_hit(&frames(&color, &depth));
    let hit = hit.expect("first qualifying tick should hit");
    assert_eq!((hit.x, hit.y), (25, 15));
    assert!((hit.depth_m - 1.0).abs() < 1e-9);

    // Identical second tick: same unbroken approach, no second hit.
    assert!(selector.check_hit(&frames(&color, &depth)).is_none());

    let stats = selector.statistics();
    assert_eq!(stats.color_hit_count, 1);
    assert_eq!(stats.motion_hit_count, 0);
    assert_eq!(stats.hybrid_switch_count, 0);
    assert_eq!(selector.last_reached().map(|h| (h.x, h.y)), Some((25, 15)));
}

#[test]
fn depth_gate_rejects_far_ball_then_accepts_close_one() {
    let mut selector = TrackerSelector::new(TrackerMode::Color, full_screen(1.5));
    selector.set_target_color("red").unwrap();

    let color = color_frame((20, 10, 10, 10), [220, 20, 20]);
    let far = depth_frame(2500, None);
    assert!(selector.check_hit(&frames(&color, &far)).is_none());
    // Still tracked, just out of reach.
    assert_eq!(selector.detection_info().position, Some((25, 15)));

    let close = depth_frame(1500, None);
    let hit = selector.check_hit(&frames(&color, &close));
    assert!(hit.is_some(), "1.5m is within the 2.0m collision threshold");
}

#[test]
fn hybrid_mode_prefers_motion_and_counts_the_switch() {
    let mut selector = TrackerSelector::new(TrackerMode::Hybrid, full_screen(1.5));
    selector.set_target_color("red").unwrap();

    // Tick 1: empty scene; seeds the motion frame buffer.
    let blank = blank_color_frame();
    let still = depth_frame(3000, None);
    assert!(selector.check_hit(&frames(&blank, &still)).is_none());

    // Tick 2: a red ball appears and a 12x12 depth region jumps 1000mm
    // closer. Both paths detect; motion must win the arbitration.
    let color = color_frame((40, 20, 10, 10), [220, 20, 20]);
    let moving = depth_frame(3000, Some((8, 6, 12, 12, 2000)));
    let hit = selector
        .check_hit(&frames(&color, &moving))
        .expect("approaching region should hit");

    // The motion candidate lives in depth space and is reported scaled to
    // color-frame pixels.
    assert_eq!((hit.x, hit.y), (28, 24));
    assert!((hit.depth_m - 2.0).abs() < 1e-9);

    let stats = selector.statistics();
    assert_eq!(stats.motion_hit_count, 1);
    assert_eq!(stats.hybrid_switch_count, 1);
    assert_eq!(stats.color_hit_count, 0);

    // Merged diagnostics carry both paths' fields, motion winning position.
    let info = selector.detection_info();
    assert_eq!(info.mode, Some(TrackerMode::Hybrid));
    assert!(info.detected);
    assert_eq!(info.position, Some((28, 24)));
    assert!(info.mask_pixels > 0, "color path still segmented the ball");
    assert!(info.moving_pixels > 0);
}

#[test]
fn hybrid_mode_returns_motion_value_when_both_paths_hit() {
    let mut selector = TrackerSelector::new(TrackerMode::Hybrid, full_screen(1.5));
    selector.set_target_color("red").unwrap();

    let blank = blank_color_frame();
    let still = depth_frame(3000, None);
    assert!(selector.check_hit(&frames(&blank, &still)).is_none());

    // The red ball sits over the approaching depth region, so its sampled
    // depth is 2.0m and the color path hits too. The two paths report
    // different centers; arbitration must return motion's.
    let color = color_frame((20, 16, 10, 10), [220, 20, 20]);
    let moving = depth_frame(3000, Some((8, 6, 12, 12, 2000)));
    let hit = selector
        .check_hit(&frames(&color, &moving))
        .expect("both paths qualify; a hit must be reported");

    // Color would have reported (25, 21); motion's (28, 24) wins.
    assert_eq!((hit.x, hit.y), (28, 24));
    assert!((hit.depth_m - 2.0).abs() < 1e-9);

    let stats = selector.statistics();
    assert_eq!(stats.motion_hit_count, 1);
    assert_eq!(stats.hybrid_switch_count, 1);
    assert_eq!(stats.color_hit_count, 0);
}

#[test]
fn color_only_tick_falls_back_to_screen_depth() {
    let mut selector = TrackerSelector::new(TrackerMode::Hybrid, full_screen(1.5));
    selector.set_target_color("red").unwrap();

    let color = color_frame((20, 10, 10, 10), [220, 20, 20]);
    let frames = TickFrames::new(
        Some(ColorFrameView {
            width: COLOR_W,
            height: COLOR_H,
            data: &color,
        }),
        None,
    );
    let hit = selector.check_hit(&frames).expect("screen depth stands in");
    assert!((hit.depth_m - 1.5).abs() < 1e-9);

    let stats = selector.statistics();
    assert_eq!(stats.color_hit_count, 1);
    assert_eq!(stats.hybrid_switch_count, 0);
}

#[test]
fn persisted_color_config_switches_the_tracked_preset() {
    let mut selector = TrackerSelector::new(TrackerMode::Color, full_screen(1.5));
    selector.apply_color_config(&TrackedColorConfig {
        color: ColorPreset::Pink,
        min_area: 30,
    });

    // Hot pink, not red: only the pink preset should segment it.
    let color = color_frame((20, 10, 10, 10), [255, 0, 150]);
    let depth = depth_frame(1000, None);
    assert!(selector.check_hit(&frames(&color, &depth)).is_some());

    selector.set_target_color("red").unwrap();
    selector.check_hit(&frames(&blank_color_frame(), &depth)); // re-arm
    assert!(selector.check_hit(&frames(&color, &depth)).is_none());
}

#[test]
fn unusable_screen_area_blocks_every_hit() {
    let degenerate = ScreenArea::new(vec![[0, 0], [64, 0]], 1.5);
    let mut selector = TrackerSelector::new(TrackerMode::Color, degenerate);
    selector.set_target_color("red").unwrap();

    let color = color_frame((20, 10, 10, 10), [220, 20, 20]);
    let depth = depth_frame(1000, None);
    assert!(selector.check_hit(&frames(&color, &depth)).is_none());
    // The detector still tracked the ball; only the collision gate refused.
    assert_eq!(selector.detection_info().position, Some((25, 15)));
}
