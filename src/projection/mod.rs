//! # Projection
//!
//! The proximity engine never talks to a map renderer directly. Everything it
//! needs from the host, converting between geographic coordinates and a pixel
//! plane at a given zoom and knowing the current view, goes through
//! [`MapProjector`].
//!
//! - `mercator`: spherical Web Mercator with a tile-sized pixel world
//! - `flat`: identity plane for local coordinate systems and tests

mod flat;
mod mercator;

pub use flat::*;
pub use mercator::*;

use bevy::math::DVec2;

use crate::types::Coord;

/// Host contract for converting between geographic and planar coordinates.
pub trait MapProjector {
    fn project(&self, coord: Coord, zoom: f64) -> DVec2;

    fn unproject(&self, point: DVec2, zoom: f64) -> Coord;

    /// Zoom level of the current view.
    fn zoom(&self) -> f64;

    /// Deepest zoom the map allows; may be infinite.
    fn max_zoom(&self) -> f64;

    /// Converts a circle radius (metres) around `center` into plane units at `zoom`.
    fn radius_to_plane(&self, center: Coord, radius: f64, zoom: f64) -> f64;

    /// Map-unit (degree) span covered by `pixels` at the view origin.
    fn pixel_to_geo_distance_buffer(&self, pixels: f64) -> f64;

    /// Called when the host pans or zooms.
    fn set_view(&mut self, center: Coord, zoom: f64);

    fn current_max_zoom(&self) -> f64 {
        let max = self.max_zoom();
        if max.is_finite() { max } else { self.zoom() }
    }
}

/// The two planes a proximity query works in.
///
/// Closest points are constructed at [`MapProjector::current_max_zoom`] for
/// precision; distances are reported in pixels at the current zoom so they can
/// be compared against an on-screen tolerance.
pub struct Plane<'a, P: MapProjector + ?Sized> {
    projector: &'a P,
    precision_zoom: f64,
    zoom: f64,
}

impl<'a, P: MapProjector + ?Sized> Plane<'a, P> {
    pub fn new(projector: &'a P) -> Self {
        Self {
            projector,
            precision_zoom: projector.current_max_zoom(),
            zoom: projector.zoom(),
        }
    }

    pub fn project(&self, coord: Coord) -> DVec2 {
        self.projector.project(coord, self.precision_zoom)
    }

    pub fn unproject(&self, point: DVec2) -> Coord {
        self.projector.unproject(point, self.precision_zoom)
    }

    pub fn radius(&self, center: Coord, radius: f64) -> f64 {
        self.projector
            .radius_to_plane(center, radius, self.precision_zoom)
    }

    /// On-screen pixel distance between two coordinates.
    pub fn distance(&self, a: Coord, b: Coord) -> f64 {
        self.projector
            .project(a, self.zoom)
            .distance(self.projector.project(b, self.zoom))
    }
}
