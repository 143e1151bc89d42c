//! Transport and caching for the campusfeed pipeline.
//!
//! [`CampusClient`] fetches the scheduling service's XML feeds through a
//! short-lived [`FetchCache`] and runs them through the normalization
//! pipeline in `campusfeed-core`.

pub mod cache;
pub mod client;

pub use cache::FetchCache;
pub use client::{
    CampusClient, EnrichmentFailure, DEFAULT_BASE_URL, DEFAULT_BASIC_BASE_URL,
    ORG_UNIT_INFORMATICS, ORG_UNIT_MATHEMATICS, ORG_UNIT_PHYSICS,
};
