//! Prime Wheel math utilities.

pub mod math;

pub use math::density::*;
pub use math::gaps::*;
