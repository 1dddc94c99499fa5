//! # Release-Index Import
//!
//! Best-effort batch construction of packages from a helm-style repository
//! index (`entries: name -> [release...]`). One unreachable release never
//! aborts the batch: it lands in the `missed` set and the import continues.
//! A digest that disagrees with the index's declared digest is logged as a
//! warning and tolerated.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use kpkg_core::Result;

use crate::descriptor::DescriptorDoc;
use crate::ops::ContentFetcher;
use crate::package::PackageDoc;

/// A helm-style repository index: package name → ordered release list.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseIndex {
    /// Releases per package name.
    #[serde(default)]
    pub entries: BTreeMap<String, Vec<ChartRelease>>,
}

impl ReleaseIndex {
    /// Parse an index from its YAML form.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// One release record: chart metadata plus version, urls, and the digest
/// the index declares for the archive.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ChartRelease(pub serde_json::Map<String, Value>);

impl ChartRelease {
    /// Declared release version.
    pub fn version(&self) -> &str {
        self.0.get("version").and_then(Value::as_str).unwrap_or("")
    }

    /// Archive URLs, first element authoritative.
    pub fn urls(&self) -> Vec<&str> {
        self.0
            .get("urls")
            .and_then(Value::as_array)
            .map(|urls| urls.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// The digest the index declares for the archive, when present.
    pub fn declared_digest(&self) -> Option<&str> {
        self.0.get("digest").and_then(Value::as_str)
    }
}

/// Outcome of a release-index import.
#[derive(Debug)]
pub struct IndexImport {
    /// The rendered `{apiVersion: v1, kind: List, items, metadata}` envelope.
    pub list: Value,
    /// `(name, version)` of every release whose fetch failed.
    pub missed: Vec<(String, String)>,
}

/// Build a rendered package list from a release index.
///
/// Per release: a descriptor via `from_chart`, a package bound to it, and
/// content attached from the release's first URL — embedded when `offline`,
/// referenced otherwise. Fetch failures are collected in `missed`; digest
/// mismatches are warned and tolerated.
pub fn from_release_index(
    index: &ReleaseIndex,
    offline: bool,
    fetcher: &dyn ContentFetcher,
) -> Result<IndexImport> {
    let mut items = Vec::new();
    let mut missed = Vec::new();

    for (name, releases) in &index.entries {
        for release in releases {
            let version = release.version();
            tracing::info!("- {name}.{version}");

            let rendered_descriptor = DescriptorDoc::from_chart(&release.0).render()?;
            let mut package = PackageDoc::new(
                Some(name),
                Some(version),
                Some("helm"),
                Some(&rendered_descriptor),
            )?;

            let attached = match release.urls().first() {
                Some(url) => package.add_url(fetcher, url, offline),
                None => Err(kpkg_core::KpkgError::ContentResolution {
                    url: String::new(),
                    reason: "release has no urls".to_string(),
                }),
            };
            if let Err(error) = attached {
                tracing::warn!("skipping {name}.{version}: {error}");
                missed.push((name.clone(), version.to_string()));
                continue;
            }

            let computed = package.content_digest().unwrap_or("").to_string();
            items.push(package.render()?);

            if let Some(declared) = release.declared_digest() {
                if computed != declared {
                    tracing::warn!(
                        "digest mismatch for {name}.{version}: {computed} != {declared}"
                    );
                }
            }
        }
    }

    let list = serde_json::json!({
        "apiVersion": "v1",
        "kind": "List",
        "items": items,
        "metadata": { "resourceVersion": "", "selfLink": "" },
    });
    Ok(IndexImport { list, missed })
}
