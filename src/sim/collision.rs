//! Overlap tests for every entity class
//!
//! Obstacles are axis-aligned vertical spans with a fly-through gap;
//! everything else is circles. The ordered hit-resolution policy built on
//! top of these predicates lives in `tick`.

use glam::Vec2;

use super::state::Obstacle;
use crate::consts::*;

/// Actor-vs-obstacle test: the horizontal spans must overlap AND the
/// actor's vertical extent must poke outside the gap.
pub fn actor_hits_obstacle(pos: Vec2, radius: f32, obstacle: &Obstacle) -> bool {
    let in_span =
        pos.x + radius > obstacle.x && pos.x - radius < obstacle.x + obstacle.width;
    if !in_span {
        return false;
    }
    pos.y - radius < obstacle.gap_top || pos.y + radius > obstacle.gap_bottom
}

/// Circle-circle overlap
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Circle-vs-rect overlap via closest-point clamping
fn circle_rect_overlap(center: Vec2, radius: f32, min: Vec2, max: Vec2) -> bool {
    let closest = center.clamp(min, max);
    center.distance_squared(closest) < radius * radius
}

/// Would a collectible at `pos` sit inside an obstacle's solid region
/// (the pipe bodies above and below its gap)? Used by the spawner's
/// rejection test, which must run before insertion.
pub fn collectible_blocked(pos: Vec2, radius: f32, obstacle: &Obstacle) -> bool {
    let min_x = obstacle.x;
    let max_x = obstacle.x + obstacle.width;
    circle_rect_overlap(
        pos,
        radius,
        Vec2::new(min_x, 0.0),
        Vec2::new(max_x, obstacle.gap_top),
    ) || circle_rect_overlap(
        pos,
        radius,
        Vec2::new(min_x, obstacle.gap_bottom),
        Vec2::new(max_x, GROUND_Y),
    )
}

/// Top or bottom world-boundary contact
pub fn actor_hits_boundary(pos: Vec2, radius: f32) -> bool {
    pos.y - radius < 0.0 || pos.y + radius > GROUND_Y
}
