mod coord;
mod results;
mod shape;

pub use coord::*;
pub use results::*;
pub use shape::*;
