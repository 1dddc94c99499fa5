//! # Import-Index Subcommand
//!
//! Batch import of a helm-style repository index: every release becomes a
//! rendered package document, content embedded (`--offline`) or referenced
//! by URL. Unreachable releases land in the missed summary; the batch
//! never aborts on a single failure.

use std::path::PathBuf;

use clap::Args;

use kpkg_core::Result;
use kpkg_model::{from_release_index, ContentFetcher, ReleaseIndex};
use kpkg_registry::fetch_index;

use crate::output::{render_value, OutputFormat};

/// Arguments for `kpkg import-index`.
#[derive(Args, Debug)]
pub struct ImportIndexArgs {
    /// Index location: a local `index.yaml` path or an http(s) URL.
    #[arg(value_name = "INDEX")]
    pub index: String,

    /// Embed every archive as an inline blob instead of a URL reference.
    #[arg(long)]
    pub offline: bool,

    /// Write the rendered list document to this file instead of stdout.
    #[arg(long)]
    pub dest: Option<PathBuf>,
}

/// Execute `kpkg import-index`.
pub fn run_import_index(
    args: &ImportIndexArgs,
    fetcher: &dyn ContentFetcher,
    format: OutputFormat,
) -> Result<u8> {
    let index = if args.index.starts_with("http://") || args.index.starts_with("https://") {
        fetch_index(fetcher, &args.index)?
    } else {
        ReleaseIndex::from_yaml(&std::fs::read_to_string(&args.index)?)?
    };

    let import = from_release_index(&index, args.offline, fetcher)?;

    if let Some(dest) = &args.dest {
        std::fs::write(dest, serde_json::to_string_pretty(&import.list)?)?;
        tracing::info!(path = %dest.display(), "package list written");
    } else {
        render_value(format, &import.list);
    }

    for (name, version) in &import.missed {
        tracing::warn!("missed: {name}.{version}");
    }
    if !import.missed.is_empty() {
        eprintln!("{} release(s) could not be fetched", import.missed.len());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpkg_core::KpkgError;
    use std::fs;

    struct NoFetch;
    impl ContentFetcher for NoFetch {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            Err(KpkgError::ContentResolution {
                url: url.to_string(),
                reason: "offline test".to_string(),
            })
        }
    }

    #[test]
    fn test_import_local_index_all_missed() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("index.yaml");
        fs::write(
            &index_path,
            "entries:\n  app:\n    - name: app\n      version: '1.0'\n      urls: [\"https://example.com/app.tgz\"]\n",
        )
        .unwrap();
        let dest = dir.path().join("list.json");

        let args = ImportIndexArgs {
            index: index_path.display().to_string(),
            offline: false,
            dest: Some(dest.clone()),
        };
        let code = run_import_index(&args, &NoFetch, OutputFormat::None).unwrap();
        assert_eq!(code, 0);

        let list: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
        assert_eq!(list["kind"], "List");
        assert!(list["items"].as_array().unwrap().is_empty());
    }
}
