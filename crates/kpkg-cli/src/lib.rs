//! # kpkg-cli — Command-Line Interface
//!
//! Subcommand handlers for the `kpkg` binary. Argument parsing lives in
//! the `*Args` structs; each `run_*` handler delegates to the domain
//! crates and returns a process exit code.
//!
//! ## Crate Policy
//!
//! - No business logic here: handlers wire arguments to `kpkg-model`,
//!   `kpkg-cluster`, and `kpkg-registry` operations.
//! - Errors bubble up as [`kpkg_core::KpkgError`]; `main` renders the
//!   structured payload in the selected output format and derives the
//!   exit status from the error kind.

pub mod extract;
pub mod helm;
pub mod import_index;
pub mod inspect;
pub mod output;
pub mod package;
pub mod query;
pub mod version;

use std::path::Path;

use kpkg_core::Result;
use kpkg_model::PackageDoc;

/// Load a package document from a local YAML or JSON file.
pub fn load_package_file(path: &Path) -> Result<PackageDoc> {
    let content = std::fs::read_to_string(path)?;
    let resource: serde_json::Value = serde_yaml::from_str(&content)?;
    PackageDoc::load(&resource)
}
