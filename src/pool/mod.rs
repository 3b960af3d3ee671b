//! The candidate pool pipeline: fetch, normalize, gate, aggregate.

pub mod aggregator;
pub mod fetch;
pub mod gate;
pub mod normalize;

pub use aggregator::Aggregator;
pub use fetch::{FetchBudget, FetchStrategy};
pub use gate::QualityProfile;
