//! Candidate-search helpers for PDSCH/PUSCH allocation (§4.O): lazy
//! iterators over HARQ x SearchSpace x TimeDomainResource tuples that only
//! validate the candidates actually consumed.

pub mod pdsch_candidate_searcher;
pub mod pusch_candidate_searcher;
pub mod resources;

pub use pdsch_candidate_searcher::{DlHarqProcess, PdschCandidate, PdschCandidateSearcher};
pub use pusch_candidate_searcher::{PuschCandidate, PuschCandidateSearcher};
pub use resources::{SearchSpace, TimeDomainResource};
