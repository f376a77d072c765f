//! Proximity tracking for vector shapes on a slippy map.
//!
//! Given the shapes drawn on a map and a pointer position, the crate works out
//! which shape the pointer is "almost over" (within a pixel tolerance), where
//! on that shape the closest point lies, and turns a stream of pointer samples
//! into `almost:over`, `almost:move`, `almost:out`, `almost:click` and
//! `almost:dblclick` notifications.
//!
//! - [`types`]: coordinates and shapes
//! - [`projection`]: the [`projection::MapProjector`] contract and a Web Mercator view
//! - [`geometry`]: closest-point and snapping queries
//! - [`proximity`]: the tracker, its state machine and throttle
//! - [`geojson`]: shape import
//! - [`interaction`]: bevy plugins wiring the tracker into an app

pub mod error;
pub mod geojson;
pub mod geometry;
pub mod interaction;
pub mod projection;
pub mod proximity;
pub mod types;

pub use error::{ProximityError, Result};
