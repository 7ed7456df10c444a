//! Stateful screen-collision decision.
//!
//! Polygon containment alone fires as soon as the object's 2D projection
//! overlaps the screen region, well before the object physically touches
//! the surface. Gating on depth turns the 2D overlap test into an
//! approximate 3D arrival test, and the Idle/RecentlyHit state machine
//! turns a stream of per-tick detections into at most one hit per
//! approach.

mod detector;
mod params;

pub use detector::{CollisionDetector, CollisionState};
pub use params::CollisionParams;
