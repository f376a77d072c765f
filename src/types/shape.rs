use std::{collections::HashSet, fmt, sync::Arc};

use geo::BoundingRect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Coord;
use crate::error::{ProximityError, Result};

/// Identity of a shape. Clones of a [`Shape`] handle share it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered point sequence, or a nesting of them (multi lines, polygon rings, multi polygons).
#[derive(Clone, Debug, PartialEq)]
pub enum Path {
    Line(Vec<Coord>),
    Nested(Vec<Path>),
}

impl Path {
    /// Copy of the path with every flat ring closed back onto its first vertex.
    /// Rings that are already closed, or have fewer than two points, are left as is.
    pub fn closed(&self) -> Path {
        match self {
            Path::Line(points) => {
                let mut points = points.clone();
                if let [first, .., last] = points[..] {
                    if first != last {
                        points.push(first);
                    }
                }
                Path::Line(points)
            }
            Path::Nested(paths) => Path::Nested(paths.iter().map(Path::closed).collect()),
        }
    }

    /// Every vertex, depth first.
    pub fn coords(&self) -> Vec<Coord> {
        let mut out = Vec::new();
        let mut pending = vec![self];
        while let Some(path) = pending.pop() {
            match path {
                Path::Line(points) => out.extend_from_slice(points),
                Path::Nested(paths) => pending.extend(paths.iter().rev()),
            }
        }
        out
    }
}

impl From<Vec<Coord>> for Path {
    fn from(points: Vec<Coord>) -> Self {
        Path::Line(points)
    }
}

impl From<Vec<Vec<Coord>>> for Path {
    fn from(lines: Vec<Vec<Coord>>) -> Self {
        Path::Nested(lines.into_iter().map(Path::Line).collect())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// `radius` is in metres.
    Circle { center: Coord, radius: f64 },
    Point(Coord),
    Polyline(Path),
    /// Rings are implicitly closed.
    Polygon(Path),
    Group(Vec<Shape>),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Circle { .. } => "circle",
            Geometry::Point(_) => "point",
            Geometry::Polyline(_) => "polyline",
            Geometry::Polygon(_) => "polygon",
            Geometry::Group(_) => "group",
        }
    }
}

#[derive(Debug)]
struct ShapeData {
    geometry: Geometry,
    properties: serde_json::Value,
}

/// A vector shape drawn on the map.
///
/// `Shape` is a handle: cloning it is cheap and keeps the same [`ShapeId`].
/// Two shapes are "the same" when their ids match, regardless of geometry.
#[derive(Clone, Debug)]
pub struct Shape {
    id: ShapeId,
    data: Arc<ShapeData>,
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Shape {}

impl Shape {
    pub fn new(geometry: Geometry) -> Self {
        Self::with_properties(geometry, serde_json::Value::Null)
    }

    pub fn with_properties(geometry: Geometry, properties: serde_json::Value) -> Self {
        Self {
            id: ShapeId::new(),
            data: Arc::new(ShapeData {
                geometry,
                properties,
            }),
        }
    }

    pub fn circle(center: Coord, radius: f64) -> Self {
        Self::new(Geometry::Circle { center, radius })
    }

    pub fn point(location: Coord) -> Self {
        Self::new(Geometry::Point(location))
    }

    pub fn polyline(path: impl Into<Path>) -> Self {
        Self::new(Geometry::Polyline(path.into()))
    }

    pub fn polygon(path: impl Into<Path>) -> Self {
        Self::new(Geometry::Polygon(path.into()))
    }

    pub fn group(children: Vec<Shape>) -> Self {
        Self::new(Geometry::Group(children))
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn geometry(&self) -> &Geometry {
        &self.data.geometry
    }

    pub fn properties(&self) -> &serde_json::Value {
        &self.data.properties
    }

    pub fn kind(&self) -> &'static str {
        self.geometry().kind()
    }

    pub fn is_group(&self) -> bool {
        matches!(self.geometry(), Geometry::Group(_))
    }

    pub fn is_same(&self, other: &Shape) -> bool {
        self.id == other.id
    }

    /// Direct children of a group, empty for anything else.
    pub fn children(&self) -> &[Shape] {
        match self.geometry() {
            Geometry::Group(children) => children,
            _ => &[],
        }
    }

    /// Single representative location for point shapes.
    pub fn location(&self) -> Option<Coord> {
        match self.geometry() {
            Geometry::Point(location) => Some(*location),
            _ => None,
        }
    }

    /// The vertex structure of lines and polygons, as searched by the closest-point code.
    /// Polygon rings are returned closed.
    pub fn path(&self) -> Option<Path> {
        match self.geometry() {
            Geometry::Polyline(path) => Some(path.clone()),
            Geometry::Polygon(path) => Some(path.closed()),
            _ => None,
        }
    }

    /// Leaf shapes below this one in document order; a leaf yields itself.
    ///
    /// Walks with an explicit work list and skips any id it has already seen,
    /// so repeated members are reported once.
    pub fn leaves(&self) -> Vec<Shape> {
        let mut leaves = Vec::new();
        let mut visited = HashSet::new();
        let mut pending = vec![self.clone()];
        while let Some(shape) = pending.pop() {
            if !visited.insert(shape.id) {
                continue;
            }
            if shape.is_group() {
                pending.extend(shape.children().iter().rev().cloned());
            } else {
                leaves.push(shape);
            }
        }
        leaves
    }

    /// Checks every coordinate of the shape for finiteness.
    pub fn validate(&self) -> Result<()> {
        match self.geometry() {
            Geometry::Circle { center, radius } => {
                center.validated()?;
                if !radius.is_finite() || *radius < 0.0 {
                    return Err(ProximityError::MalformedShape(format!(
                        "circle {} has radius {radius}",
                        self.id
                    )));
                }
                Ok(())
            }
            Geometry::Point(location) => location.validated().map(|_| ()),
            Geometry::Polyline(path) | Geometry::Polygon(path) => {
                path.coords().into_iter().try_for_each(|c| c.validated().map(|_| ()))
            }
            Geometry::Group(_) => self.leaves().iter().try_for_each(Shape::validate),
        }
    }

    /// Bounding box in (lon, lat) degrees. Circles have a metric radius and no
    /// geographic box without a projection, so they return `None`, as do groups.
    pub fn bounding_rect(&self) -> Option<geo::Rect<f64>> {
        match self.geometry() {
            Geometry::Point(location) => {
                let c: geo::Coord<f64> = (*location).into();
                Some(geo::Rect::new(c, c))
            }
            Geometry::Polyline(path) | Geometry::Polygon(path) => {
                let points: Vec<geo::Point<f64>> = path
                    .coords()
                    .into_iter()
                    .map(|c| geo::Point::from(geo::Coord::from(c)))
                    .collect();
                geo::MultiPoint::new(points).bounding_rect()
            }
            Geometry::Circle { .. } | Geometry::Group(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[(f64, f64)]) -> Shape {
        Shape::polyline(
            points
                .iter()
                .map(|&(lat, long)| Coord::new(lat, long))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn clones_share_identity() {
        let a = Shape::point(Coord::new(1.0, 1.0));
        let b = a.clone();
        let c = Shape::point(Coord::new(1.0, 1.0));
        assert!(a.is_same(&b));
        assert!(!a.is_same(&c));
    }

    #[test]
    fn leaves_flatten_nested_groups_in_order() {
        let a = line(&[(0.0, 0.0), (1.0, 1.0)]);
        let b = Shape::point(Coord::new(2.0, 2.0));
        let c = Shape::circle(Coord::new(3.0, 3.0), 10.0);
        let inner = Shape::group(vec![b.clone(), c.clone()]);
        let outer = Shape::group(vec![a.clone(), inner]);

        let ids: Vec<_> = outer.leaves().iter().map(Shape::id).collect();
        assert_eq!(ids, vec![a.id(), b.id(), c.id()]);
    }

    #[test]
    fn leaves_skip_repeated_members() {
        let a = Shape::point(Coord::new(0.0, 0.0));
        let inner = Shape::group(vec![a.clone()]);
        let outer = Shape::group(vec![a.clone(), inner.clone(), inner, a.clone()]);
        assert_eq!(outer.leaves().len(), 1);
    }

    #[test]
    fn leaf_yields_itself() {
        let a = Shape::point(Coord::new(0.0, 0.0));
        let leaves = a.leaves();
        assert_eq!(leaves.len(), 1);
        assert!(leaves[0].is_same(&a));
    }

    #[test]
    fn polygon_path_is_closed_on_a_copy() {
        let ring = vec![
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 10.0),
            Coord::new(10.0, 10.0),
        ];
        let polygon = Shape::polygon(ring.clone());
        let Some(Path::Line(closed)) = polygon.path() else {
            panic!("expected a flat ring");
        };
        assert_eq!(closed.len(), 4);
        assert_eq!(closed[3], ring[0]);
        assert_eq!(polygon.geometry(), &Geometry::Polygon(Path::Line(ring)));
    }

    #[test]
    fn closing_skips_short_and_closed_rings() {
        let single = Path::Line(vec![Coord::new(4.0, 3.0)]);
        assert_eq!(single.closed(), single);

        let closed = Path::Line(vec![
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 10.0),
            Coord::new(10.0, 10.0),
            Coord::new(0.0, 0.0),
        ]);
        assert_eq!(closed.closed(), closed);

        let Path::Line(pair) = Path::Line(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)]).closed() else {
            panic!("expected a flat ring");
        };
        assert_eq!(pair.len(), 3);
    }

    #[test]
    fn validate_catches_nan_in_nested_paths() {
        let shape = Shape::polygon(vec![
            vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)],
            vec![Coord::new(f64::NAN, 0.0)],
        ]);
        assert!(matches!(
            shape.validate(),
            Err(ProximityError::InvalidCoordinate { .. })
        ));
        assert!(Shape::circle(Coord::new(0.0, 0.0), -1.0).validate().is_err());
    }

    #[test]
    fn bounding_rect_uses_lon_lat_axes() {
        let shape = line(&[(1.0, 10.0), (3.0, 20.0)]);
        let rect = shape.bounding_rect().unwrap();
        assert_eq!(rect.min(), geo::Coord { x: 10.0, y: 1.0 });
        assert_eq!(rect.max(), geo::Coord { x: 20.0, y: 3.0 });
        assert!(Shape::circle(Coord::new(0.0, 0.0), 5.0).bounding_rect().is_none());
    }
}
