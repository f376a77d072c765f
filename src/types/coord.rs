use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{ProximityError, Result};

/// Half of the Web Mercator world width in metres.
pub const MERCATOR_HALF_WORLD: f64 = 20037508.34;
pub const EARTH_RADIUS_KM: f64 = 6378.137;
/// Latitudes beyond this cannot be represented by the spherical Mercator projection.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// A geographic coordinate in degrees.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize, Copy)]
#[serde(rename_all = "camelCase")]
pub struct Coord {
    pub lat: f64,
    #[serde(rename = "lon")]
    pub long: f64,
}

impl Coord {
    pub const fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }

    pub fn to_tuple(&self) -> (f64, f64) {
        (self.lat, self.long)
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.long.is_finite()
    }

    /// Returns the coordinate unchanged, or an error if either ordinate is NaN or infinite.
    pub fn validated(self) -> Result<Self> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(ProximityError::InvalidCoordinate {
                lat: self.lat,
                long: self.long,
            })
        }
    }

    /// Spherical Mercator position in metres, latitude clamped to [`MAX_LATITUDE`].
    pub fn to_mercator(&self) -> (f64, f64) {
        let lat = self.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let x = self.long.to_radians() * MERCATOR_HALF_WORLD / PI;
        let y = lat.to_radians().tan().asinh() * MERCATOR_HALF_WORLD / PI;
        (x, y)
    }

    pub fn from_mercator(x: f64, y: f64) -> Self {
        let long = (x / MERCATOR_HALF_WORLD) * 180.0;
        let lat = (y / MERCATOR_HALF_WORLD * 180.0).to_radians();
        let lat = 2.0 * lat.exp().atan() - std::f64::consts::FRAC_PI_2;
        Coord::new(lat.to_degrees(), normalize_longitude(long))
    }

    /// Great-circle distance in metres.
    // https://stackoverflow.com/questions/639695/how-to-convert-latitude-or-longitude-to-meters
    pub fn distance_meters(&self, other: &Coord) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = (other.long - self.long).to_radians();

        let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin() * (d_lon / 2.0).sin();
        let c = 2.0 * (a.sqrt().atan2((1.0 - a).sqrt()));
        EARTH_RADIUS_KM * c * 1000.0
    }
}

impl From<Coord> for geo::Coord<f64> {
    fn from(coord: Coord) -> Self {
        geo::Coord {
            x: coord.long,
            y: coord.lat,
        }
    }
}

pub fn normalize_longitude(lon: f64) -> f64 {
    let mut lon = lon;
    while lon > 180.0 {
        lon -= 360.0;
    }
    while lon < -180.0 {
        lon += 360.0;
    }
    lon
}
