//! Boundary response and pointer hit-testing
//!
//! The viewport is an axis-aligned box with its origin at the top-left.
//! A bubble of radius `r` is in bounds when its center lies in
//! `[r, extent - r]` on both axes.

use glam::Vec2;

use super::state::Viewport;

/// Which edges were touched during a boundary check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundaryHit {
    pub x: bool,
    pub y: bool,
}

impl BoundaryHit {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Result of a boundary check
#[derive(Debug, Clone, Copy)]
pub struct BoundaryResult {
    /// Position clamped back inside the viewport
    pub pos: Vec2,
    /// Velocity after reflection
    pub vel: Vec2,
    pub hit: BoundaryHit,
}

/// Clamp a circle back inside the viewport and reflect the velocity
/// components that point out of it.
///
/// Components already pointing inward are left alone, so a bubble stranded
/// outside after a resize drifts back in instead of jittering on the edge.
/// On an axis narrower than the diameter the center is pinned to the middle.
pub fn viewport_bounce(
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    viewport: &Viewport,
    damping: f32,
) -> BoundaryResult {
    let (x, vx, hit_x) = bounce_axis(pos.x, vel.x, radius, viewport.width, damping);
    let (y, vy, hit_y) = bounce_axis(pos.y, vel.y, radius, viewport.height, damping);
    BoundaryResult {
        pos: Vec2::new(x, y),
        vel: Vec2::new(vx, vy),
        hit: BoundaryHit { x: hit_x, y: hit_y },
    }
}

fn bounce_axis(pos: f32, vel: f32, radius: f32, extent: f32, damping: f32) -> (f32, f32, bool) {
    if extent < 2.0 * radius {
        return (extent * 0.5, vel, false);
    }

    let lo = radius;
    let hi = extent - radius;
    if pos < lo {
        let vel = if vel < 0.0 { -vel * damping } else { vel };
        (lo, vel, true)
    } else if pos > hi {
        let vel = if vel > 0.0 { -vel * damping } else { vel };
        (hi, vel, true)
    } else {
        (pos, vel, false)
    }
}

/// Point-in-circle test with an inflated radius for small targets
#[inline]
pub fn circle_contains(center: Vec2, radius: f32, point: Vec2, tolerance: f32) -> bool {
    let r = radius * tolerance;
    center.distance_squared(point) <= r * r
}
