use std::{fs::File, io::BufReader, path::Path as FsPath};

use ::geojson::{Feature, GeoJson, Value};
use bevy::log::{debug, info};

use crate::{
    error::{ProximityError, Result},
    types::{Coord, Geometry, Path, Shape},
};

/// Parses GeoJSON text into a single group shape holding one member per feature.
pub fn shapes_from_geojson(data: &str) -> Result<Shape> {
    let geojson: GeoJson = data.parse()?;
    shapes_from(geojson)
}

/// Reads a `.geojson` file into a single group shape.
pub fn shapes_from_file(path: impl AsRef<FsPath>) -> Result<Shape> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let shapes = shapes_from(GeoJson::from_reader(reader)?)?;
    info!("Loaded {} shape(s) from {:?}", shapes.children().len(), path.as_ref());
    Ok(shapes)
}

fn shapes_from(geojson: GeoJson) -> Result<Shape> {
    let members = match geojson {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .filter_map(|feature| feature_to_shape(feature).transpose())
            .collect::<Result<Vec<_>>>()?,
        GeoJson::Feature(feature) => feature_to_shape(feature)?.into_iter().collect(),
        GeoJson::Geometry(geometry) => vec![value_to_shape(&geometry.value, serde_json::Value::Null)?],
    };
    Ok(Shape::group(members))
}

fn feature_to_shape(feature: Feature) -> Result<Option<Shape>> {
    let Some(geometry) = feature.geometry else {
        debug!("Skipping feature {:?} without geometry", feature.id);
        return Ok(None);
    };
    let properties = feature
        .properties
        .map(serde_json::Value::Object)
        .unwrap_or_default();
    value_to_shape(&geometry.value, properties).map(Some)
}

fn value_to_shape(value: &Value, properties: serde_json::Value) -> Result<Shape> {
    let geometry = match value {
        Value::Point(position) => {
            let center = position_to_coord(position)?;
            match properties.get("radius").and_then(serde_json::Value::as_f64) {
                Some(radius) => Geometry::Circle { center, radius },
                None => Geometry::Point(center),
            }
        }
        Value::MultiPoint(positions) => Geometry::Group(
            positions
                .iter()
                .map(|position| Ok(Shape::point(position_to_coord(position)?)))
                .collect::<Result<_>>()?,
        ),
        Value::LineString(line) => Geometry::Polyline(Path::Line(line_to_coords(line)?)),
        Value::MultiLineString(lines) => Geometry::Polyline(Path::Nested(
            lines
                .iter()
                .map(|line| line_to_coords(line).map(Path::Line))
                .collect::<Result<_>>()?,
        )),
        Value::Polygon(rings) => Geometry::Polygon(rings_to_path(rings)?),
        Value::MultiPolygon(polygons) => Geometry::Polygon(Path::Nested(
            polygons
                .iter()
                .map(|rings| rings_to_path(rings))
                .collect::<Result<_>>()?,
        )),
        Value::GeometryCollection(geometries) => Geometry::Group(
            geometries
                .iter()
                .map(|geometry| value_to_shape(&geometry.value, serde_json::Value::Null))
                .collect::<Result<_>>()?,
        ),
    };
    Ok(Shape::with_properties(geometry, properties))
}

/// GeoJSON positions are `[lon, lat, ..]`.
fn position_to_coord(position: &[f64]) -> Result<Coord> {
    match position {
        [long, lat, ..] => Coord::new(*lat, *long).validated(),
        _ => Err(ProximityError::MalformedShape(format!(
            "position {position:?} needs at least two ordinates"
        ))),
    }
}

fn line_to_coords<P: AsRef<[f64]>>(line: &[P]) -> Result<Vec<Coord>> {
    line.iter().map(|position| position_to_coord(position.as_ref())).collect()
}

/// Rings are closed implicitly, so a repeated closing vertex is dropped.
fn rings_to_path<P: AsRef<[f64]>>(rings: &[Vec<P>]) -> Result<Path> {
    let rings = rings
        .iter()
        .map(|ring| {
            let mut coords = line_to_coords(ring)?;
            if coords.len() > 1 && coords.first() == coords.last() {
                coords.pop();
            }
            Ok(Path::Line(coords))
        })
        .collect::<Result<_>>()?;
    Ok(Path::Nested(rings))
}
