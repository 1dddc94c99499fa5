//! # Inspect Subcommand
//!
//! Looks inside a package's archive without extracting it: the manifest,
//! one named file, or the file tree (optionally filtered to a directory
//! prefix).

use std::path::PathBuf;

use clap::Args;

use kpkg_core::Result;
use kpkg_model::{ops, ClusterOps, ContentFetcher, PackageDoc};

use crate::output::{render_value, OutputFormat};

/// Arguments for `kpkg inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Persisted resource name (`{packageName}.{packageVersion}`).
    #[arg(value_name = "RESOURCE", conflicts_with = "from_file")]
    pub resource: Option<String>,

    /// Read the package document from a local file instead of the cluster.
    #[arg(long)]
    pub from_file: Option<PathBuf>,

    /// Print one archive file.
    #[arg(long, conflicts_with = "tree")]
    pub file: Option<String>,

    /// List archive paths, optionally under a directory prefix.
    #[arg(long, value_name = "PREFIX", num_args = 0..=1, default_missing_value = "")]
    pub tree: Option<String>,

    /// Kubernetes namespace.
    #[arg(short = 'n', long, default_value = "default")]
    pub namespace: String,
}

/// Execute `kpkg inspect`. Without `--file` or `--tree`, prints the
/// package manifest.
pub fn run_inspect(
    args: &InspectArgs,
    ops: &dyn ClusterOps,
    fetcher: &dyn ContentFetcher,
    format: OutputFormat,
) -> Result<u8> {
    let package = load_package(args, ops)?;
    let bundle = package.resolve_content(fetcher)?;

    if let Some(tree) = &args.tree {
        let prefix = if tree.is_empty() { None } else { Some(tree.as_str()) };
        let files = bundle.list_files(prefix);
        match format {
            OutputFormat::None => {}
            OutputFormat::Text => {
                for file in files {
                    println!("{file}");
                }
            }
            _ => render_value(format, &serde_json::json!(files)),
        }
        return Ok(0);
    }

    let content = match &args.file {
        Some(file) => bundle.file(file)?,
        None => bundle.manifest()?,
    };
    print!("{}", String::from_utf8_lossy(content));
    Ok(0)
}

fn load_package(args: &InspectArgs, ops: &dyn ClusterOps) -> Result<PackageDoc> {
    match (&args.from_file, &args.resource) {
        (Some(path), _) => crate::load_package_file(path),
        (None, Some(resource)) => ops::get(ops, resource, &args.namespace),
        (None, None) => Err(kpkg_core::KpkgError::Construction(
            "a resource name or --from-file is required".to_string(),
        )),
    }
}
