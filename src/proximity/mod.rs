//! # Proximity tracking
//!
//! Turns a stream of host [`MapEvent`]s into `almost:*` [`ProximityEvent`]s.
//!
//! [`ProximitySession`] owns the registered shapes and the over/out state
//! machine. [`ProximityTracker`] wraps a session with a projector, the
//! settings, a trailing-edge [`Throttle`] on pointer samples and the
//! subscriber list.

mod events;
mod index;
mod session;
mod settings;
mod throttle;
mod tracker;

pub use events::*;
pub use index::*;
pub use session::*;
pub use settings::*;
pub use throttle::*;
pub use tracker::*;
