use std::collections::HashSet;

use rstar::{AABB, RTree, RTreeObject};

use crate::types::{Coord, Shape, ShapeId};

#[derive(Debug, Clone, PartialEq)]
struct IndexedShape {
    id: ShapeId,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedShape {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over the (lon, lat) bounding boxes of registered leaf shapes.
///
/// Shapes without a geographic box (circles, whose radius is metric) are kept
/// aside and returned by every query.
#[derive(Debug, Default)]
pub struct ShapeIndex {
    tree: RTree<IndexedShape>,
    unbounded: Vec<ShapeId>,
}

impl ShapeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(shape: &Shape) -> Option<IndexedShape> {
        let rect = shape.bounding_rect()?;
        Some(IndexedShape {
            id: shape.id(),
            envelope: AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
        })
    }

    pub fn insert(&mut self, shape: &Shape) {
        match Self::entry(shape) {
            Some(entry) => self.tree.insert(entry),
            None => self.unbounded.push(shape.id()),
        }
    }

    pub fn remove(&mut self, shape: &Shape) {
        match Self::entry(shape) {
            Some(entry) => {
                self.tree.remove(&entry);
            }
            None => self.unbounded.retain(|id| *id != shape.id()),
        }
    }

    /// Ids of shapes whose box comes within `buffer` degrees of `point` on both axes.
    pub fn candidates(&self, point: Coord, buffer: f64) -> HashSet<ShapeId> {
        let query = AABB::from_corners(
            [point.long - buffer, point.lat - buffer],
            [point.long + buffer, point.lat + buffer],
        );
        self.tree
            .locate_in_envelope_intersecting(&query)
            .map(|entry| entry.id)
            .chain(self.unbounded.iter().copied())
            .collect()
    }
}
