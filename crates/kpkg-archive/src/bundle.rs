//! # Content Bundle — Immutable Archive Blob
//!
//! [`ContentBundle`] wraps a package archive blob and exposes its size,
//! SHA-256 digest, manifest lookup, and the text-safe base64 form that the
//! `content.source.blob` document field carries.
//!
//! ## Invariant
//!
//! The blob is immutable after construction. Size and digest are pure
//! functions of the blob; the digest is memoized exactly once per instance
//! lifetime. The raw and base64 forms are kept consistent at construction
//! and round-trip losslessly.

use std::collections::BTreeMap;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use once_cell::sync::OnceCell;

use kpkg_core::{ContentDigest, KpkgError, Result};

use crate::tarball;

/// Conventional manifest filenames, first found wins.
pub const MANIFEST_FILES: &[&str] = &[
    "manifest.yaml",
    "manifest.jsonnet",
    "Chart.yaml",
    "Chart.yml",
];

/// Encode raw bytes into the text-safe base64 form.
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode the text-safe base64 form back into raw bytes.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(encoded.trim())
        .map_err(|e| KpkgError::Encoding(format!("invalid base64 blob: {e}")))
}

/// An immutable package archive blob with its parsed file map.
pub struct ContentBundle {
    blob: Vec<u8>,
    encoded: String,
    files: BTreeMap<String, Vec<u8>>,
    digest: OnceCell<ContentDigest>,
}

impl ContentBundle {
    /// Construct from raw archive bytes.
    pub fn from_bytes(blob: Vec<u8>) -> Result<Self> {
        let files = tarball::read(&blob)?;
        let encoded = encode(&blob);
        Ok(Self {
            blob,
            encoded,
            files,
            digest: OnceCell::new(),
        })
    }

    /// Construct from the base64 text form.
    pub fn from_encoded(encoded: &str) -> Result<Self> {
        let blob = decode(encoded)?;
        let files = tarball::read(&blob)?;
        Ok(Self {
            blob,
            encoded: encoded.trim().to_string(),
            files,
            digest: OnceCell::new(),
        })
    }

    /// The raw archive bytes.
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// The base64 text form of the archive bytes.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Archive size in bytes.
    pub fn size(&self) -> u64 {
        self.blob.len() as u64
    }

    /// SHA-256 digest of the raw blob, computed once per instance.
    pub fn digest(&self) -> &ContentDigest {
        self.digest.get_or_init(|| ContentDigest::compute(&self.blob))
    }

    /// Content of the first conventional manifest file present in the
    /// archive, in [`MANIFEST_FILES`] order.
    pub fn manifest(&self) -> Result<&[u8]> {
        for name in MANIFEST_FILES {
            if let Some(content) = self.files.get(*name) {
                return Ok(content);
            }
        }
        Err(KpkgError::not_found("manifest", MANIFEST_FILES.join(", ")))
    }

    /// Sorted list of file paths, optionally filtered to a directory prefix.
    pub fn list_files(&self, prefix: Option<&str>) -> Vec<String> {
        self.files
            .keys()
            .filter(|path| prefix.map_or(true, |p| path.starts_with(p)))
            .cloned()
            .collect()
    }

    /// Content of one archive entry.
    pub fn file(&self, path: &str) -> Result<&[u8]> {
        self.files
            .get(path)
            .map(Vec::as_slice)
            .ok_or_else(|| KpkgError::not_found("archive entry", path))
    }

    /// Unpack the archive under `dest`.
    pub fn extract(&self, dest: &Path) -> Result<()> {
        tarball::unpack(&self.blob, dest)
    }

    /// Write the packed archive verbatim to `dest_file`.
    pub fn write_to(&self, dest_file: &Path) -> Result<()> {
        tarball::write_file(&self.blob, dest_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn bundle_of(entries: &[(&str, &[u8])]) -> ContentBundle {
        let dir = tempfile::tempdir().unwrap();
        let mut files = Vec::new();
        for (rel, content) in entries {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
            files.push(rel.to_string());
        }
        files.sort();
        let bytes = tarball::build(dir.path(), &files, None).unwrap();
        ContentBundle::from_bytes(bytes).unwrap()
    }

    #[test]
    fn test_raw_and_encoded_forms_consistent() {
        let bundle = bundle_of(&[("Chart.yaml", b"name: demo\n")]);
        let reparsed = ContentBundle::from_encoded(bundle.encoded()).unwrap();
        assert_eq!(reparsed.blob(), bundle.blob());
        assert_eq!(reparsed.digest(), bundle.digest());
    }

    #[test]
    fn test_size_and_digest_match_blob() {
        let bundle = bundle_of(&[("a.txt", b"aaa")]);
        assert_eq!(bundle.size(), bundle.blob().len() as u64);
        assert_eq!(bundle.digest(), &ContentDigest::compute(bundle.blob()));
        // Memoized value is stable across calls.
        assert_eq!(bundle.digest(), bundle.digest());
    }

    #[test]
    fn test_manifest_precedence() {
        let bundle = bundle_of(&[
            ("Chart.yaml", b"chart"),
            ("manifest.yaml", b"manifest"),
        ]);
        assert_eq!(bundle.manifest().unwrap(), b"manifest");

        let chart_only = bundle_of(&[("Chart.yml", b"chart")]);
        assert_eq!(chart_only.manifest().unwrap(), b"chart");
    }

    #[test]
    fn test_manifest_not_found() {
        let bundle = bundle_of(&[("values.yaml", b"x")]);
        assert!(matches!(
            bundle.manifest(),
            Err(KpkgError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_files_sorted_and_filtered() {
        let bundle = bundle_of(&[
            ("templates/b.yaml", b"b"),
            ("templates/a.yaml", b"a"),
            ("Chart.yaml", b"c"),
        ]);
        assert_eq!(
            bundle.list_files(None),
            vec!["Chart.yaml", "templates/a.yaml", "templates/b.yaml"]
        );
        assert_eq!(
            bundle.list_files(Some("templates/")),
            vec!["templates/a.yaml", "templates/b.yaml"]
        );
    }

    #[test]
    fn test_file_lookup() {
        let bundle = bundle_of(&[("values.yaml", b"replicas: 3\n")]);
        assert_eq!(bundle.file("values.yaml").unwrap(), b"replicas: 3\n");
        assert!(matches!(
            bundle.file("missing.yaml"),
            Err(KpkgError::NotFound { .. })
        ));
    }

    #[test]
    fn test_extract_and_write_to() {
        let bundle = bundle_of(&[("dir/file.txt", b"content")]);

        let out = tempfile::tempdir().unwrap();
        bundle.extract(out.path()).unwrap();
        assert_eq!(fs::read(out.path().join("dir/file.txt")).unwrap(), b"content");

        let packed = out.path().join("bundle.tar.gz");
        bundle.write_to(&packed).unwrap();
        assert_eq!(fs::read(&packed).unwrap(), bundle.blob());
    }
}
