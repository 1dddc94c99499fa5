//! # Package Document
//!
//! A [`PackageDoc`] binds a name + version + media type to archive content:
//! an inline base64 blob or a remote URL reference. It owns its in-memory
//! [`ContentBundle`] once content is attached or resolved.
//!
//! ## Content Resolution
//!
//! A document built from a remote reference has no local content until
//! [`PackageDoc::resolve_content`] runs. Resolution is explicit and
//! once-per-instance: the bundle lives in a guarded cell that is populated
//! exactly once — blob sources decode without network access, URL sources
//! fetch the first URL.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde_json::Value;

use kpkg_archive::{collect_files, tarball, ContentBundle};
use kpkg_core::{package_filename, KpkgError, Result, Timestamp};
use kpkg_schema::DocKind;

use crate::envelope::Envelope;
use crate::ops::ContentFetcher;
use crate::render;

/// A named, versioned release bound to archive content (kind `Package`).
pub struct PackageDoc {
    envelope: Envelope,
    /// Resolved content, populated at most once per instance.
    resolved: OnceCell<ContentBundle>,
}

impl PackageDoc {
    /// Construct a package, optionally merging a rendered descriptor.
    ///
    /// The descriptor's spec, labels, and annotations are merged first;
    /// explicit `name`/`version`/`media_type` arguments then override.
    /// Any of the three still missing after the merge is a construction
    /// error.
    pub fn new(
        name: Option<&str>,
        version: Option<&str>,
        media_type: Option<&str>,
        descriptor: Option<&Value>,
    ) -> Result<Self> {
        let mut envelope = Envelope::new(DocKind::Package, "");

        let mut name = name.map(str::to_string);
        let mut version = version.map(str::to_string);
        let mut media_type = media_type.map(str::to_string);

        if let Some(descriptor) = descriptor {
            if let Some(spec) = descriptor.get("spec").and_then(Value::as_object) {
                for (key, value) in spec {
                    envelope.spec.insert(key.clone(), value.clone());
                }
            }
            if let Some(metadata) = descriptor.get("metadata") {
                merge_string_map(metadata.get("labels"), &mut envelope.metadata.labels);
                merge_string_map(metadata.get("annotations"), &mut envelope.metadata.annotations);
                if name.is_none() {
                    name = metadata
                        .get("name")
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string);
                }
            }
            if version.is_none() {
                version = envelope.field_str("packageVersion").map(str::to_string);
            }
            if media_type.is_none() {
                media_type = envelope.field_str("mediaType").map(str::to_string);
            }
        }

        let (name, version, media_type) = match (name, version, media_type) {
            (Some(name), Some(version), Some(media_type)) => (name, version, media_type),
            (name, version, media_type) => {
                return Err(KpkgError::Construction(format!(
                    "name, version and media_type are required: {name:?}, {version:?}, {media_type:?}"
                )))
            }
        };

        envelope.set_field("packageName", Value::String(name));
        envelope.set_field("packageVersion", Value::String(version));
        envelope.set_field("mediaType", Value::String(media_type));
        envelope.set_field(
            "created",
            Value::String(Timestamp::now().to_iso8601()),
        );

        Ok(Self {
            envelope,
            resolved: OnceCell::new(),
        })
    }

    /// Rebuild a package from a persisted document. The spec is checked
    /// against the Package CRD schema before any field is trusted.
    pub fn load(resource: &Value) -> Result<Self> {
        if let Some(spec) = resource.get("spec") {
            kpkg_schema::validate_spec(DocKind::Package, spec).map_err(|e| {
                KpkgError::SchemaViolation {
                    field: "spec".to_string(),
                    message: e.to_string(),
                }
            })?;
        }
        let name = resource
            .pointer("/spec/packageName")
            .and_then(Value::as_str);
        let version = resource
            .pointer("/spec/packageVersion")
            .and_then(Value::as_str);
        Self::new(name, version, None, Some(resource))
    }

    /// The document envelope.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// `spec.packageName`.
    pub fn package_name(&self) -> &str {
        self.envelope.field_str("packageName").unwrap_or("")
    }

    /// `spec.packageVersion`.
    pub fn version(&self) -> &str {
        self.envelope.field_str("packageVersion").unwrap_or("")
    }

    /// `spec.mediaType`.
    pub fn media_type(&self) -> &str {
        self.envelope.field_str("mediaType").unwrap_or("")
    }

    /// Base filename for this package's on-disk artifacts.
    pub fn filename(&self) -> String {
        package_filename(self.package_name(), self.version(), self.media_type())
    }

    /// The `spec.content` block, when present.
    pub fn content(&self) -> Option<&Value> {
        self.envelope.field("content")
    }

    /// The `spec.content.source` object, when present.
    pub fn content_source(&self) -> Option<&Value> {
        self.content().and_then(|c| c.get("source"))
    }

    /// The `spec.content.digest` hex string, when present.
    pub fn content_digest(&self) -> Option<&str> {
        self.content()
            .and_then(|c| c.get("digest"))
            .and_then(Value::as_str)
    }

    /// Archive a local directory and embed it as an inline blob source.
    ///
    /// The tree is filtered through the active ignore rules, packed into a
    /// gzip tar (optionally re-rooted under `prefix`), hashed, and stored
    /// as `content.source = {blob: <base64>}`.
    pub fn add_blob(&mut self, src: &Path, prefix: Option<&str>) -> Result<()> {
        let files = collect_files(src)?;
        let bytes = tarball::build(src, &files, prefix)?;
        let bundle = ContentBundle::from_bytes(bytes)?;
        let source = serde_json::json!({ "blob": bundle.encoded() });
        self.set_content(bundle, source);
        Ok(())
    }

    /// Fetch a remote archive and attach it: embedded as a blob when
    /// `offline`, otherwise recorded as a `{urls: [url]}` reference.
    pub fn add_url(&mut self, fetcher: &dyn ContentFetcher, url: &str, offline: bool) -> Result<()> {
        let bytes = fetcher.fetch(url)?;
        let bundle = ContentBundle::from_bytes(bytes)?;
        let source = if offline {
            serde_json::json!({ "blob": bundle.encoded() })
        } else {
            serde_json::json!({ "urls": [url] })
        };
        self.set_content(bundle, source);
        Ok(())
    }

    /// Write the content block and take ownership of the bundle. The
    /// resolved cell is reset first: size and digest always describe the
    /// current blob, never a previous one.
    fn set_content(&mut self, bundle: ContentBundle, source: Value) {
        self.envelope.set_field(
            "content",
            serde_json::json!({
                "source": source,
                "size": bundle.size(),
                "digest": bundle.digest().to_hex(),
            }),
        );
        self.resolved = OnceCell::new();
        let _ = self.resolved.set(bundle);
    }

    /// Materialize the content bundle, at most once per instance.
    ///
    /// Blob sources decode locally; URL sources fetch the first URL through
    /// `fetcher` and cache the result. A document without a content source
    /// cannot resolve.
    pub fn resolve_content(&self, fetcher: &dyn ContentFetcher) -> Result<&ContentBundle> {
        self.resolved.get_or_try_init(|| {
            let source = self
                .content_source()
                .ok_or_else(|| KpkgError::Construction("missing content".to_string()))?;
            if let Some(blob) = source.get("blob").and_then(Value::as_str) {
                return ContentBundle::from_encoded(blob);
            }
            if let Some(url) = source
                .get("urls")
                .and_then(Value::as_array)
                .and_then(|urls| urls.first())
                .and_then(Value::as_str)
            {
                let bytes = fetcher.fetch(url)?;
                return ContentBundle::from_bytes(bytes);
            }
            Err(KpkgError::Construction("missing content".to_string()))
        })
    }

    /// Resolve content, then unpack it under `dest` (`as_tarball = false`)
    /// or write the packed `{filename}.tar.gz` under `dest`
    /// (`as_tarball = true`). Returns the path written.
    pub fn extract(
        &self,
        fetcher: &dyn ContentFetcher,
        dest: &Path,
        as_tarball: bool,
    ) -> Result<PathBuf> {
        let bundle = self.resolve_content(fetcher)?;
        if as_tarball {
            std::fs::create_dir_all(dest)?;
            let path = dest.join(format!("{}.tar.gz", self.filename()));
            bundle.write_to(&path)?;
            Ok(path)
        } else {
            bundle.extract(dest)?;
            Ok(dest.to_path_buf())
        }
    }

    /// Transform then validate, emitting the persistable document.
    pub fn render(&mut self) -> Result<Value> {
        render::render_package(&mut self.envelope)
    }

    /// Render and write `{filename}.yaml` under `dest`. Without `force`,
    /// an existing file is an `AlreadyExists` error.
    pub fn write_to_file(&mut self, dest: &Path, force: bool) -> Result<PathBuf> {
        let path = dest.join(format!("{}.yaml", self.filename()));
        if !force && path.is_file() {
            return Err(KpkgError::AlreadyExists {
                path: path.display().to_string(),
            });
        }
        let rendered = self.render()?;
        std::fs::write(&path, serde_yaml::to_string(&rendered)?)?;
        Ok(path)
    }
}

fn merge_string_map(
    source: Option<&Value>,
    target: &mut std::collections::BTreeMap<String, String>,
) {
    if let Some(map) = source.and_then(Value::as_object) {
        for (key, value) in map {
            if let Some(value) = value.as_str() {
                target.insert(key.clone(), value.to_string());
            }
        }
    }
}
