//! Report section data structures.

pub mod gaps;
pub mod pairs;
pub mod parameters;
pub mod residues;
pub mod summary;

pub use gaps::GapsSection;
pub use pairs::{PairStats, SpecialPairsSection};
pub use parameters::ParametersSection;
pub use residues::ResidueDistribution;
pub use summary::SummarySection;
