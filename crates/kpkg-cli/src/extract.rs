//! # Extract Subcommand
//!
//! Resolves a package document's content — from the cluster by resource
//! name or from a local document file — and either unpacks the archive
//! under the destination directory or materializes the packed
//! `{filename}.tar.gz` there.

use std::path::PathBuf;

use clap::Args;

use kpkg_core::{KpkgError, Result};
use kpkg_model::{ops, ClusterOps, ContentFetcher, PackageDoc};

use crate::output::{render_value, OutputFormat};

/// Arguments for `kpkg extract`.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Persisted resource name (`{packageName}.{packageVersion}`).
    #[arg(value_name = "RESOURCE", conflicts_with = "from_file")]
    pub resource: Option<String>,

    /// Read the package document from a local file instead of the cluster.
    #[arg(long)]
    pub from_file: Option<PathBuf>,

    /// Directory to extract into.
    #[arg(long, default_value = ".")]
    pub dest: PathBuf,

    /// Write the packed `.tar.gz` instead of unpacking the tree.
    #[arg(long)]
    pub tarball: bool,

    /// Kubernetes namespace.
    #[arg(short = 'n', long, default_value = "default")]
    pub namespace: String,
}

/// Load the package document named by the arguments.
pub fn load_package(args: &ExtractArgs, ops: &dyn ClusterOps) -> Result<PackageDoc> {
    match (&args.from_file, &args.resource) {
        (Some(path), _) => crate::load_package_file(path),
        (None, Some(resource)) => ops::get(ops, resource, &args.namespace),
        (None, None) => Err(KpkgError::Construction(
            "a resource name or --from-file is required".to_string(),
        )),
    }
}

/// Execute `kpkg extract`. Returns the path that was written.
pub fn run_extract(
    args: &ExtractArgs,
    ops: &dyn ClusterOps,
    fetcher: &dyn ContentFetcher,
    format: OutputFormat,
) -> Result<u8> {
    let package = load_package(args, ops)?;
    let path = package.extract(fetcher, &args.dest, args.tarball)?;
    render_value(format, &serde_json::json!({ "path": path }));
    Ok(0)
}
