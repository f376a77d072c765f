use super::{Coord, Shape};

/// Closest point found on a single shape.
///
/// `distance` is measured in pixels at the map's current zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestResult {
    pub point: Coord,
    pub distance: f64,
}

/// Closest point found across a collection of shapes, with the shape it lies on.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub shape: Shape,
    pub point: Coord,
    pub distance: f64,
}

impl SnapResult {
    pub fn new(shape: Shape, closest: ClosestResult) -> Self {
        Self {
            shape,
            point: closest.point,
            distance: closest.distance,
        }
    }
}
