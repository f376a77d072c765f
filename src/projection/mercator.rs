use bevy::math::{DVec2, Vec2};

use super::MapProjector;
use crate::types::{Coord, MERCATOR_HALF_WORLD, MAX_LATITUDE};

// This can be changed, it changes the size of each tile too.
pub const TILE_QUALITY: f64 = 256.0;

/// Web Mercator view of the map: the world is `tile_size * 2^zoom` pixels
/// wide, with y growing southwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MercatorMap {
    pub center: Coord,
    pub zoom: f64,
    pub max_zoom: f64,
    pub tile_size: f64,
    /// Width and height of the visible area in pixels.
    pub viewport: DVec2,
}

impl Default for MercatorMap {
    fn default() -> Self {
        Self::new(Coord::new(52.1951, 0.1313), 14.0)
    }
}

impl MercatorMap {
    pub fn new(center: Coord, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            max_zoom: f64::INFINITY,
            tile_size: TILE_QUALITY,
            viewport: DVec2::new(1280.0, 720.0),
        }
    }

    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = DVec2::new(width, height);
        self
    }

    /// Pixels per Mercator metre at `zoom`.
    pub fn scale(&self, zoom: f64) -> f64 {
        self.tile_size * 2.0_f64.powf(zoom) / (2.0 * MERCATOR_HALF_WORLD)
    }

    /// Pixel position of the top-left corner of the viewport.
    pub fn view_origin(&self) -> DVec2 {
        self.project(self.center, self.zoom) - self.viewport / 2.0
    }

    /// Position relative to the view center with y up, as used by a 2D camera.
    pub fn coord_to_world(&self, coord: Coord) -> Vec2 {
        let offset = self.project(coord, self.zoom) - self.project(self.center, self.zoom);
        Vec2::new(offset.x as f32, -offset.y as f32)
    }

    pub fn world_to_coord(&self, world: Vec2) -> Coord {
        let offset = DVec2::new(world.x as f64, -(world.y as f64));
        self.unproject(self.project(self.center, self.zoom) + offset, self.zoom)
    }
}

impl MapProjector for MercatorMap {
    fn project(&self, coord: Coord, zoom: f64) -> DVec2 {
        let (x, y) = coord.to_mercator();
        let scale = self.scale(zoom);
        DVec2::new(
            (x + MERCATOR_HALF_WORLD) * scale,
            (MERCATOR_HALF_WORLD - y) * scale,
        )
    }

    fn unproject(&self, point: DVec2, zoom: f64) -> Coord {
        let scale = self.scale(zoom);
        Coord::from_mercator(
            point.x / scale - MERCATOR_HALF_WORLD,
            MERCATOR_HALF_WORLD - point.y / scale,
        )
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    fn radius_to_plane(&self, center: Coord, radius: f64, zoom: f64) -> f64 {
        let lat = center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        radius * self.scale(zoom) / lat.to_radians().cos()
    }

    fn pixel_to_geo_distance_buffer(&self, pixels: f64) -> f64 {
        let origin = self.view_origin();
        let a = self.unproject(origin, self.zoom);
        let b = self.unproject(origin + DVec2::splat(pixels), self.zoom);
        (a.lat - b.lat).abs().max((a.long - b.long).abs())
    }

    fn set_view(&mut self, center: Coord, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn null_island_is_world_center() {
        let map = MercatorMap::new(Coord::new(0.0, 0.0), 0.0);
        let p = map.project(Coord::new(0.0, 0.0), 0.0);
        assert!(close(p.x, 128.0, 1e-9));
        assert!(close(p.y, 128.0, 1e-9));
        assert!(map.project(Coord::new(10.0, 0.0), 0.0).y < 128.0);
    }

    #[test]
    fn project_unproject_round_trip() {
        let map = MercatorMap::default();
        for coord in [
            Coord::new(52.1951, 0.1313),
            Coord::new(-33.8688, 151.2093),
            Coord::new(0.0, -179.5),
            Coord::new(84.0, 12.0),
        ] {
            for zoom in [0.0, 7.5, 18.0] {
                let back = map.unproject(map.project(coord, zoom), zoom);
                assert!(close(back.lat, coord.lat, 1e-9), "{coord:?} @ {zoom}");
                assert!(close(back.long, coord.long, 1e-9), "{coord:?} @ {zoom}");
            }
        }
    }

    #[test]
    fn current_max_zoom_falls_back_when_unbounded() {
        let map = MercatorMap::new(Coord::new(0.0, 0.0), 12.0);
        assert_eq!(map.current_max_zoom(), 12.0);
        assert_eq!(map.with_max_zoom(19.0).current_max_zoom(), 19.0);
    }

    #[test]
    fn radius_grows_with_latitude() {
        let map = MercatorMap::default();
        let metres_per_pixel = 2.0 * MERCATOR_HALF_WORLD / 256.0;
        let equator = map.radius_to_plane(Coord::new(0.0, 0.0), metres_per_pixel, 0.0);
        assert!(close(equator, 1.0, 1e-9));
        let north = map.radius_to_plane(Coord::new(60.0, 0.0), metres_per_pixel, 0.0);
        assert!(close(north, 2.0, 1e-9));
    }

    #[test]
    fn world_space_round_trip() {
        let map = MercatorMap::default();
        assert_eq!(map.coord_to_world(map.center), Vec2::ZERO);
        let coord = Coord::new(52.2, 0.14);
        let world = map.coord_to_world(coord);
        assert!(world.x > 0.0 && world.y > 0.0);
        let back = map.world_to_coord(world);
        assert!(close(back.lat, coord.lat, 1e-5));
        assert!(close(back.long, coord.long, 1e-5));
    }

    #[test]
    fn buffer_shrinks_when_zooming_in() {
        let mut map = MercatorMap::default();
        let wide = map.pixel_to_geo_distance_buffer(25.0);
        map.set_view(map.center, map.zoom + 1.0);
        let narrow = map.pixel_to_geo_distance_buffer(25.0);
        assert!(wide > 0.0);
        assert!(close(narrow * 2.0, wide, wide * 1e-3));
    }
}
