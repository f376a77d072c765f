use bevy::log::warn;

use crate::{
    error::Result,
    projection::{MapProjector, Plane},
    types::{Coord, Shape, SnapResult},
};

use super::{closest_in_collection, closest_on_shape};

/// Snaps `point` onto the closest of `shapes` if it lies within `tolerance` pixels.
///
/// With `with_vertices`, a line or polygon winner is refined onto its nearest
/// vertex (searched from the snapped point) when that vertex is also closer
/// than `tolerance`; the reported distance is then measured from `point` again.
///
/// Only an invalid `point` is an error. Shapes that fail individually are
/// skipped by the collection search.
pub fn snap<'s, P, I>(
    projector: &P,
    shapes: I,
    point: Coord,
    tolerance: f64,
    with_vertices: bool,
) -> Result<Option<SnapResult>>
where
    P: MapProjector + ?Sized,
    I: IntoIterator<Item = &'s Shape>,
{
    let point = point.validated()?;
    let Some(mut result) = closest_in_collection(projector, shapes, point) else {
        return Ok(None);
    };
    if result.distance > tolerance {
        return Ok(None);
    }

    if with_vertices && result.shape.path().is_some() {
        match closest_on_shape(projector, &result.shape, result.point, true) {
            Ok(Some(vertex)) if vertex.distance < tolerance => {
                result.distance = Plane::new(projector).distance(point, vertex.point);
                result.point = vertex.point;
            }
            Ok(_) => {}
            Err(err) => warn!("Vertex snap on {} failed: {}", result.shape.id(), err),
        }
    }
    Ok(Some(result))
}
