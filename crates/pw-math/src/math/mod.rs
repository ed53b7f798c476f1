//! Core math modules.

pub mod density;
pub mod gaps;
