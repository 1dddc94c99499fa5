//! # kpkg-registry — Remote Content Retrieval
//!
//! Implements the model layer's [`ContentFetcher`](kpkg_model::ContentFetcher)
//! seam with a blocking HTTP client. The concurrency model is synchronous
//! throughout; callers wanting retry or cancellation wrap the trait.

pub mod fetcher;

pub use fetcher::{fetch_index, HttpFetcher};
