use thiserror::Error;

use crate::types::ShapeId;

/// Errors raised by proximity queries and shape import.
///
/// Query failures are local to a single query. The collection search and the
/// state machine downgrade them to "no match" for that event.
#[derive(Debug, Error)]
pub enum ProximityError {
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("shape {id} is a {kind} and cannot be decomposed into points")]
    UnsupportedShape { id: ShapeId, kind: &'static str },

    #[error("invalid coordinate (lat: {lat}, lon: {long})")]
    InvalidCoordinate { lat: f64, long: f64 },

    #[error("malformed shape: {0}")]
    MalformedShape(String),

    #[error("failed to read shapes: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProximityError>;
