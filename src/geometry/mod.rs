//! # Proximity geometry
//!
//! Pure functions that answer "which shape is closest to this point, and
//! where". Everything is computed in the pixel plane of a [`MapProjector`].
//!
//! - `planar`: segment and circle primitives over `DVec2`
//! - `flatten`: closest point on one shape, walking groups and nested paths
//! - `collection`: closest shape among many
//! - `resolver`: collection search with a tolerance cutoff and vertex refinement
//!
//! [`MapProjector`]: crate::projection::MapProjector

mod collection;
mod flatten;
pub mod planar;
mod resolver;

pub use collection::*;
pub use flatten::*;
pub use resolver::*;
