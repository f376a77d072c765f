use bevy::math::DVec2;

use crate::error::{ProximityError, Result};

/// Point on segment `a`-`b` closest to `p`. The projection is clamped to the
/// segment, and a zero-length segment yields `a`.
pub fn closest_point_on_segment(p: DVec2, a: DVec2, b: DVec2) -> DVec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Distance from `p` to segment `a`-`b`.
pub fn point_to_segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    p.distance(closest_point_on_segment(p, a, b))
}

/// Point on the circumference closest to `p`.
///
/// Fails when `p` is the center, where the direction is undefined.
pub fn closest_point_on_circle(center: DVec2, radius: f64, p: DVec2) -> Result<DVec2> {
    let direction = (p - center).try_normalize().ok_or_else(|| {
        ProximityError::DegenerateInput(format!(
            "query point ({}, {}) coincides with the circle center",
            p.x, p.y
        ))
    })?;
    Ok(center + direction * radius)
}
