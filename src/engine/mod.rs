pub mod filter;
pub mod merge;
pub mod normalizer;
pub mod offers;
pub mod pipeline;
pub mod rank;
pub mod scoring;
pub mod weights;

pub use filter::{FilterState, PhaseFilter, ScoutStatusFilter};
pub use offers::OfferExclusionIndex;
pub use pipeline::CandidateEngine;
pub use rank::SortKey;
