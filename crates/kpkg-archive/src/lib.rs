//! # kpkg-archive — Package Archive Layer
//!
//! Turns a source tree into a content-addressed gzip tar archive and back:
//!
//! - [`ignore`] — gitignore-style filtering of the source tree.
//! - [`tarball`] — gzip tar construction, in-memory extraction, disk unpack.
//! - [`bundle`] — [`ContentBundle`], the immutable archive blob with its
//!   base64 form, manifest lookup, and memoized SHA-256 digest.
//!
//! ## Crate Policy
//!
//! Archives are small package bundles, so the reader fully materializes
//! entries in memory. Nothing in this crate streams.

pub mod bundle;
pub mod ignore;
pub mod tarball;

pub use bundle::{decode, encode, ContentBundle};
pub use ignore::{collect_files, IgnoreRules};
