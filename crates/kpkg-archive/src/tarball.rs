//! # Tarball — Gzip Tar Build and Read
//!
//! Builds a gzip-compressed POSIX tar archive from a filtered file list and
//! reads one back into memory. Relative paths are preserved verbatim; the
//! only renaming the builder performs is re-rooting under an optional
//! archive prefix.
//!
//! The reader fully materializes every regular entry; directories and
//! symlinks contribute no content entries.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use kpkg_core::{KpkgError, Result};

/// Build a gzip tar archive of `files` (relative paths under `root`),
/// optionally re-rooted under `prefix` inside the archive.
///
/// A missing `root` is a fatal I/O error; the builder does not catch it.
pub fn build(root: &Path, files: &[String], prefix: Option<&str>) -> Result<Vec<u8>> {
    std::fs::metadata(root)?;

    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for relative in files {
        let arcname = match prefix {
            Some(prefix) => format!("{prefix}/{relative}"),
            None => relative.clone(),
        };
        let mut file = std::fs::File::open(root.join(relative))?;
        builder.append_file(arcname, &mut file)?;
    }
    let encoder = builder
        .into_inner()
        .map_err(|e| KpkgError::Archive(format!("tar finalize failed: {e}")))?;
    let bytes = encoder
        .finish()
        .map_err(|e| KpkgError::Archive(format!("gzip finalize failed: {e}")))?;
    Ok(bytes)
}

/// Decompress and extract every regular entry of an in-memory archive into
/// a path → content map. Non-regular entries are skipped.
pub fn read(bytes: &[u8]) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut archive = tar::Archive::new(GzDecoder::new(Cursor::new(bytes)));
    let mut files = BTreeMap::new();
    for entry in archive
        .entries()
        .map_err(|e| KpkgError::Archive(format!("unreadable archive: {e}")))?
    {
        let mut entry = entry.map_err(|e| KpkgError::Archive(format!("bad tar entry: {e}")))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry
            .path()
            .map_err(|e| KpkgError::Archive(format!("bad entry path: {e}")))?
            .to_string_lossy()
            .into_owned();
        let mut content = Vec::new();
        entry.read_to_end(&mut content)?;
        files.insert(path, content);
    }
    Ok(files)
}

/// Extract all entries of an in-memory archive to `dest`, creating the
/// destination directory if absent.
pub fn unpack(bytes: &[u8], dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    let mut archive = tar::Archive::new(GzDecoder::new(Cursor::new(bytes)));
    archive
        .unpack(dest)
        .map_err(|e| KpkgError::Archive(format!("unpack failed: {e}")))?;
    Ok(())
}

/// Write raw archive bytes verbatim to a file (no re-encoding).
pub fn write_file(bytes: &[u8], dest: &Path) -> Result<()> {
    let mut file = std::fs::File::create(dest)?;
    file.write_all(bytes)?;
    Ok(())
}
