use crate::{
    error::{ProximityError, Result},
    projection::{MapProjector, Plane},
    types::{ClosestResult, Coord, Geometry, Path, Shape},
};

use super::planar::{closest_point_on_segment, point_to_segment_distance};

/// Closest point of `shape` to `point`.
///
/// Groups and nested paths are searched member by member and the first of
/// several equally close members wins. Within a flat path, segments are
/// scanned in order and the *last* of several equally close segments wins,
/// while vertex search (`vertex_only`) keeps the first equally close vertex.
///
/// Returns `Ok(None)` when the shape has fewer than two points to form a
/// segment (or no vertex at all in vertex mode). Circles cannot be decomposed
/// into points and are rejected.
pub fn closest_on_shape<P: MapProjector + ?Sized>(
    projector: &P,
    shape: &Shape,
    point: Coord,
    vertex_only: bool,
) -> Result<Option<ClosestResult>> {
    let point = point.validated()?;
    let plane = Plane::new(projector);
    search_shape(&plane, shape, point, vertex_only)
}

fn search_shape<P: MapProjector + ?Sized>(
    plane: &Plane<'_, P>,
    shape: &Shape,
    point: Coord,
    vertex_only: bool,
) -> Result<Option<ClosestResult>> {
    match shape.geometry() {
        Geometry::Circle { .. } => Err(ProximityError::UnsupportedShape {
            id: shape.id(),
            kind: shape.kind(),
        }),
        Geometry::Point(location) => {
            if !vertex_only {
                return Ok(None);
            }
            let location = location.validated()?;
            Ok(Some(ClosestResult {
                point: location,
                distance: plane.distance(point, location),
            }))
        }
        Geometry::Polyline(_) | Geometry::Polygon(_) => match shape.path() {
            Some(path) => search_path(plane, &path, point, vertex_only),
            None => Ok(None),
        },
        Geometry::Group(_) => {
            let mut best = None;
            for leaf in shape.leaves() {
                let candidate = search_shape(plane, &leaf, point, vertex_only)?;
                best = strictly_closer(best, candidate);
            }
            Ok(best)
        }
    }
}

fn search_path<P: MapProjector + ?Sized>(
    plane: &Plane<'_, P>,
    path: &Path,
    point: Coord,
    vertex_only: bool,
) -> Result<Option<ClosestResult>> {
    let points = match path {
        Path::Nested(paths) => {
            let mut best = None;
            for sub_path in paths {
                let candidate = search_path(plane, sub_path, point, vertex_only)?;
                best = strictly_closer(best, candidate);
            }
            return Ok(best);
        }
        Path::Line(points) => points,
    };

    let query = plane.project(point);
    let projected = points
        .iter()
        .map(|c| c.validated().map(|c| plane.project(c)))
        .collect::<Result<Vec<_>>>()?;

    if vertex_only {
        let mut min_distance = f64::INFINITY;
        let mut closest = None;
        for (vertex, projected) in points.iter().zip(&projected) {
            let distance = query.distance(*projected);
            if distance < min_distance {
                min_distance = distance;
                closest = Some(*vertex);
            }
        }
        return Ok(closest.map(|vertex| ClosestResult {
            point: vertex,
            distance: plane.distance(point, vertex),
        }));
    }

    let mut min_distance = f64::INFINITY;
    let mut closest_segment = None;
    for (i, segment) in projected.windows(2).enumerate() {
        let distance = point_to_segment_distance(query, segment[0], segment[1]);
        if distance <= min_distance {
            min_distance = distance;
            closest_segment = Some(i);
        }
    }

    Ok(closest_segment.map(|i| {
        let on_segment = closest_point_on_segment(query, projected[i], projected[i + 1]);
        let coord = plane.unproject(on_segment);
        ClosestResult {
            point: coord,
            distance: plane.distance(point, coord),
        }
    }))
}

fn strictly_closer(
    best: Option<ClosestResult>,
    candidate: Option<ClosestResult>,
) -> Option<ClosestResult> {
    match (best, candidate) {
        (Some(best), Some(candidate)) if candidate.distance < best.distance => Some(candidate),
        (None, candidate) => candidate,
        (best, _) => best,
    }
}
