//! # Package Subcommand
//!
//! Builds a package document from a local source tree: ignore-filtered
//! archive, content digest, inline blob embedding, then render and either
//! write `{filename}.yaml` to a directory or apply it to the cluster.

use std::path::PathBuf;

use clap::Args;

use kpkg_core::Result;
use kpkg_model::{ClusterOps, PackageDoc};

use crate::output::{render_value, OutputFormat};

/// Arguments for `kpkg package`.
#[derive(Args, Debug)]
pub struct PackageArgs {
    /// Source directory to archive.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Package name (may contain slashes: registry/org/app).
    #[arg(long)]
    pub name: String,

    /// Package version.
    #[arg(long)]
    pub version: String,

    /// Package format.
    #[arg(short = 't', long, default_value = "helm")]
    pub media_type: String,

    /// Re-root archive entries under this prefix.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Directory to write the rendered document to.
    #[arg(long, conflicts_with = "apply")]
    pub dest: Option<PathBuf>,

    /// Apply the rendered document to the cluster instead of writing a file.
    #[arg(long)]
    pub apply: bool,

    /// Overwrite an existing document file.
    #[arg(long)]
    pub force: bool,

    /// Kubernetes namespace.
    #[arg(short = 'n', long, default_value = "default")]
    pub namespace: String,
}

/// Execute `kpkg package`.
pub fn run_package(args: &PackageArgs, ops: &dyn ClusterOps, format: OutputFormat) -> Result<u8> {
    let mut package = PackageDoc::new(
        Some(&args.name),
        Some(&args.version),
        Some(&args.media_type),
        None,
    )?;
    package.add_blob(&args.path, args.prefix.as_deref())?;

    if args.apply {
        let rendered = package.render()?;
        let manifest = serde_json::to_string(&rendered)?;
        let output = ops.apply(&manifest, &args.namespace)?;
        tracing::info!("{}", output.trim_end());
        render_value(format, &rendered);
    } else {
        let dest = args.dest.clone().unwrap_or_else(|| PathBuf::from("."));
        let path = package.write_to_file(&dest, args.force)?;
        tracing::info!(path = %path.display(), "package document written");
        render_value(format, &serde_json::json!({ "path": path }));
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct NoCluster;
    impl ClusterOps for NoCluster {
        fn get(&self, _: &str, _: &str, _: &str, _: &[String]) -> Result<String> {
            unreachable!("package --dest must not touch the cluster")
        }
        fn list(&self, _: &str, _: &str, _: &[String]) -> Result<String> {
            unreachable!()
        }
        fn delete(&self, _: &str, _: &str, _: &str) -> Result<String> {
            unreachable!()
        }
        fn apply(&self, _: &str, _: &str) -> Result<String> {
            unreachable!()
        }
    }

    #[test]
    fn test_package_to_file() {
        let src = tempfile::tempdir().unwrap();
        fs::write(src.path().join("Chart.yaml"), b"name: demo\n").unwrap();
        let dest = tempfile::tempdir().unwrap();

        let args = PackageArgs {
            path: src.path().to_path_buf(),
            name: "demo".to_string(),
            version: "1.0".to_string(),
            media_type: "helm".to_string(),
            prefix: None,
            dest: Some(dest.path().to_path_buf()),
            apply: false,
            force: false,
            namespace: "default".to_string(),
        };
        let code = run_package(&args, &NoCluster, OutputFormat::None).unwrap();
        assert_eq!(code, 0);
        assert!(dest.path().join("demo_1.0_helm.yaml").is_file());
    }
}
