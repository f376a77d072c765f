use bevy::math::DVec2;

use super::MapProjector;
use crate::types::Coord;

/// Identity projection for local coordinate systems: `x = long`, `y = lat`
/// at every zoom, and one pixel equals one map unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatProjector {
    pub zoom: f64,
    pub max_zoom: f64,
}

impl Default for FlatProjector {
    fn default() -> Self {
        Self {
            zoom: 0.0,
            max_zoom: f64::INFINITY,
        }
    }
}

impl MapProjector for FlatProjector {
    fn project(&self, coord: Coord, _zoom: f64) -> DVec2 {
        DVec2::new(coord.long, coord.lat)
    }

    fn unproject(&self, point: DVec2, _zoom: f64) -> Coord {
        Coord::new(point.y, point.x)
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    fn radius_to_plane(&self, _center: Coord, radius: f64, _zoom: f64) -> f64 {
        radius
    }

    fn pixel_to_geo_distance_buffer(&self, pixels: f64) -> f64 {
        pixels
    }

    fn set_view(&mut self, _center: Coord, zoom: f64) {
        self.zoom = zoom;
    }
}
