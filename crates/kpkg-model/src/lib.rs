//! # kpkg-model — Document Model and Pipeline
//!
//! The descriptor/package data-model pipeline: a shared document envelope,
//! two tagged document variants ([`DescriptorDoc`], [`PackageDoc`]),
//! transform/validate/render as free functions dispatched per variant,
//! content attachment and lazy resolution, best-effort release-index
//! import, and the thin cluster query pass-throughs.
//!
//! ## Pipeline Contract
//!
//! A document moves `Constructed → Transformed → Validated → Rendered`.
//! [`render`](render::render_package) always runs transform then validate,
//! in that order, and is the only sanctioned path to a persistable
//! document.

pub mod descriptor;
pub mod envelope;
pub mod index;
pub mod ops;
pub mod package;
pub mod render;

pub use descriptor::DescriptorDoc;
pub use envelope::{Envelope, Metadata};
pub use index::{from_release_index, ChartRelease, IndexImport, ReleaseIndex};
pub use ops::{ClusterOps, ContentFetcher, ListOutput, ListResult};
pub use package::PackageDoc;
