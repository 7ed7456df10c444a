//! Offline simulation driver.
//!
//! Replays a synthetic approach sequence (a red ball flying toward the
//! screen plane) through the full pipeline and prints every tick's outcome.
//! Useful for eyeballing detector behavior without camera hardware.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use impact_track::core::{init_with_level, ColorFrameView, DepthFrameView, ScreenArea};
use impact_track::{
    load_screen_area, load_tracked_color, HitTracker, TickFrames, TrackerMode, TrackerSelector,
};

#[derive(Parser)]
#[command(name = "impact-track", about = "Replay a synthetic ball approach through the tracker")]
struct Args {
    /// Tracking mode: color, motion or hybrid.
    #[arg(long, default_value = "hybrid")]
    mode: String,

    /// Number of simulated ticks.
    #[arg(long, default_value_t = 12)]
    ticks: usize,

    /// Color frame width in pixels; the depth frame runs at half resolution.
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Color frame height in pixels.
    #[arg(long, default_value_t = 480)]
    height: usize,

    /// Optional screen-area JSON file; a full-frame screen at 1.5 m is used
    /// when absent.
    #[arg(long)]
    screen: Option<PathBuf>,

    /// Optional tracked-color JSON file.
    #[arg(long)]
    color_config: Option<PathBuf>,

    /// Log at debug level instead of info.
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if init_with_level(level).is_err() {
        eprintln!("logger already installed");
    }

    let mode = match serde_json::from_value(serde_json::Value::String(args.mode.clone())) {
        Ok(mode) => mode,
        Err(_) => {
            eprintln!("unknown mode {:?} (expected color, motion or hybrid)", args.mode);
            return ExitCode::FAILURE;
        }
    };

    let screen = match &args.screen {
        Some(path) => load_screen_area(path),
        None => full_frame_screen(args.width, args.height),
    };
    let screen = if screen.is_usable() {
        screen
    } else {
        log::warn!("screen area unusable; falling back to full frame");
        full_frame_screen(args.width, args.height)
    };

    let mut selector = TrackerSelector::new(mode, screen);
    if let Some(path) = &args.color_config {
        selector.apply_color_config(&load_tracked_color(path));
    } else if let Err(err) = selector.set_target_color("red") {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    run_simulation(&mut selector, mode, args.ticks, args.width, args.height);
    ExitCode::SUCCESS
}

fn full_frame_screen(width: usize, height: usize) -> ScreenArea {
    let (w, h) = (width as i32, height as i32);
    ScreenArea::new(vec![[0, 0], [w, 0], [w, h], [0, h]], 1.5)
}

fn run_simulation(
    selector: &mut TrackerSelector,
    mode: TrackerMode,
    ticks: usize,
    width: usize,
    height: usize,
) {
    let (dw, dh) = (width / 2, height / 2);
    let ball_radius = width / 32;
    let mut hits = 0usize;

    log::info!("simulating {ticks} ticks in {mode:?} mode ({width}x{height})");
    for tick in 0..ticks {
        // Ball sweeps toward the frame center while closing from 3.2 m
        // down to 0.8 m.
        let progress = tick as f64 / ticks.max(1) as f64;
        let cx = width / 4 + (progress * (width / 4) as f64) as usize;
        let cy = height / 2;
        let ball_depth_mm = (3200.0 - progress * 2400.0) as u16;

        let color_data = render_color(width, height, cx, cy, ball_radius);
        let depth_data = render_depth(dw, dh, cx / 2, cy / 2, ball_radius / 2, ball_depth_mm);

        let frames = TickFrames::new(
            Some(ColorFrameView {
                width,
                height,
                data: &color_data,
            }),
            Some(DepthFrameView {
                width: dw,
                height: dh,
                data: &depth_data,
            }),
        );

        match selector.check_hit(&frames) {
            Some(hit) => {
                hits += 1;
                println!(
                    "tick {tick:3}: HIT at ({}, {}) depth {:.2}m",
                    hit.x, hit.y, hit.depth_m
                );
            }
            None => {
                let info = selector.detection_info();
                match info.position {
                    Some((x, y)) => println!("tick {tick:3}: tracked at ({x}, {y})"),
                    None => println!("tick {tick:3}: no detection"),
                }
            }
        }
    }

    println!("{hits} hit(s) in {ticks} ticks");
    match serde_json::to_string_pretty(&selector.statistics()) {
        Ok(json) => println!("{json}"),
        Err(err) => log::warn!("could not serialize statistics: {err}"),
    }
}

/// Black frame with a red disk at (cx, cy).
fn render_color(width: usize, height: usize, cx: usize, cy: usize, radius: usize) -> Vec<u8> {
    let mut data = vec![0u8; width * height * 3];
    let r2 = (radius * radius) as i64;
    for y in cy.saturating_sub(radius)..(cy + radius + 1).min(height) {
        for x in cx.saturating_sub(radius)..(cx + radius + 1).min(width) {
            let dx = x as i64 - cx as i64;
            let dy = y as i64 - cy as i64;
            if dx * dx + dy * dy <= r2 {
                let i = (y * width + x) * 3;
                data[i] = 220;
                data[i + 1] = 20;
                data[i + 2] = 20;
            }
        }
    }
    data
}

/// Flat far background with a disk of foreground depth at (cx, cy).
fn render_depth(
    width: usize,
    height: usize,
    cx: usize,
    cy: usize,
    radius: usize,
    ball_depth_mm: u16,
) -> Vec<u16> {
    let mut data = vec![4200u16; width * height];
    let r2 = (radius * radius) as i64;
    for y in cy.saturating_sub(radius)..(cy + radius + 1).min(height) {
        for x in cx.saturating_sub(radius)..(cx + radius + 1).min(width) {
            let dx = x as i64 - cx as i64;
            let dy = y as i64 - cy as i64;
            if dx * dx + dy * dy <= r2 {
                data[y * width + x] = ball_depth_mm;
            }
        }
    }
    data
}
