//! # kpkg-core — Foundational Types
//!
//! Shared primitives for the kpkg packaging toolchain: the structured error
//! hierarchy, content-addressed digests, UTC timestamps, and the on-disk
//! package naming convention.
//!
//! ## Crate Policy
//!
//! - No I/O beyond what `std::io::Error` conversion requires.
//! - Every error carries enough context to render a structured payload
//!   (`{code, message, details}`) without re-deriving state at the call site.
//! - Digests are pure functions of their input bytes; no caching lives here.

pub mod digest;
pub mod error;
pub mod naming;
pub mod temporal;

pub use digest::ContentDigest;
pub use error::KpkgError;
pub use naming::package_filename;
pub use temporal::Timestamp;

/// Convenience alias used across the kpkg crates.
pub type Result<T> = std::result::Result<T, KpkgError>;
