//! Geogif Extract: from raw post batch to filtered place candidates
//!
//! Three steps, all order-preserving:
//! - scrub the batch down to plain words (`normalizer`)
//! - ask the entity service for names and keep the plausible places
//!   (`extractor`)
//! - reject anything already used or too generic (`filter`)

pub mod extractor;
pub mod filter;
pub mod normalizer;

pub use extractor::CandidateExtractor;
pub use filter::{CandidateFilter, STOPLIST};
