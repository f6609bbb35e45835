//! Geometry types, outline builders, and the polygon area engine.

pub mod area;
pub mod outline;
pub mod types;

pub use area::*;
pub use outline::*;
pub use types::*;
