use bevy::log::warn;

use crate::{
    error::{ProximityError, Result},
    projection::{MapProjector, Plane},
    types::{ClosestResult, Coord, Geometry, Shape, SnapResult},
};

use super::{closest_on_shape, planar::closest_point_on_circle};

/// Point on the circumference of a circle (radius in metres) closest to `point`.
pub fn closest_on_circle<P: MapProjector + ?Sized>(
    projector: &P,
    center: Coord,
    radius: f64,
    point: Coord,
) -> Result<ClosestResult> {
    let plane = Plane::new(projector);
    let center = center.validated()?;
    if !radius.is_finite() || radius < 0.0 {
        return Err(ProximityError::MalformedShape(format!(
            "circle at {:?} has radius {radius}",
            center.to_tuple()
        )));
    }
    let on_circle = closest_point_on_circle(
        plane.project(center),
        plane.radius(center, radius),
        plane.project(point.validated()?),
    )?;
    let coord = plane.unproject(on_circle);
    Ok(ClosestResult {
        point: coord,
        distance: plane.distance(point, coord),
    })
}

fn closest_on_member<P: MapProjector + ?Sized>(
    projector: &P,
    shape: &Shape,
    point: Coord,
) -> Result<Option<ClosestResult>> {
    match shape.geometry() {
        Geometry::Circle { center, radius } => {
            closest_on_circle(projector, *center, *radius, point).map(Some)
        }
        Geometry::Point(location) => {
            let location = location.validated()?;
            Ok(Some(ClosestResult {
                point: location,
                distance: Plane::new(projector).distance(point, location),
            }))
        }
        _ => closest_on_shape(projector, shape, point, false),
    }
}

/// The shape of `shapes` closest to `point`, with the closest point on it.
///
/// The first of several equally close shapes wins. A shape the query fails on
/// (a circle centered on the query point, a malformed outline) is logged and
/// skipped rather than failing the whole search.
pub fn closest_in_collection<'s, P, I>(projector: &P, shapes: I, point: Coord) -> Option<SnapResult>
where
    P: MapProjector + ?Sized,
    I: IntoIterator<Item = &'s Shape>,
{
    let mut best: Option<SnapResult> = None;
    for shape in shapes {
        let closest = match closest_on_member(projector, shape, point) {
            Ok(Some(closest)) => closest,
            Ok(None) => continue,
            Err(err) => {
                warn!("Skipping {} {}: {}", shape.kind(), shape.id(), err);
                continue;
            }
        };
        if !closest.distance.is_finite() {
            warn!("Skipping {} {}: distance is {}", shape.kind(), shape.id(), closest.distance);
            continue;
        }
        if best
            .as_ref()
            .is_none_or(|best| closest.distance < best.distance)
        {
            best = Some(SnapResult::new(shape.clone(), closest));
        }
    }
    best
}
