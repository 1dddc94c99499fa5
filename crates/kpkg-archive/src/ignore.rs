//! # Ignore Rules — Source Tree Filtering
//!
//! Evaluates gitignore-style patterns ("gitwildmatch" dialect: directory
//! anchors, `**`, `!` negation, `#` comments, last match wins) against
//! candidate paths, and walks a source tree collecting every regular file
//! that survives the rules.
//!
//! ## Rule Sources
//!
//! The built-in default excludes version-control metadata (`.git/`). On top
//! of that, exactly one conventional ignore file is honored — the first
//! found at the source root, in the order of [`IGNORE_FILES`].
//!
//! ## Failure Mode
//!
//! Malformed pattern lines are never fatal: a line the matcher cannot parse
//! degrades to "no match" for that line. A missing walk root, by contrast,
//! is a fatal I/O error surfaced to the caller.

use std::path::Path;

use ::ignore::gitignore::{Gitignore, GitignoreBuilder};

use kpkg_core::{KpkgError, Result};

/// Conventional ignore filenames, checked at the source root in this order.
/// Only the first one found is honored.
pub const IGNORE_FILES: &[&str] = &[
    ".helmignore",
    ".k8spackageignore",
    ".kpmignore",
    ".packageignore",
];

/// Built-in patterns applied to every source tree.
const DEFAULT_PATTERNS: &[&str] = &[".git/"];

/// A compiled ignore rule set for one source tree.
pub struct IgnoreRules {
    matcher: Gitignore,
}

impl IgnoreRules {
    /// Compile the rules for a source tree: built-in defaults plus the
    /// first conventional ignore file found at `root`, if any.
    pub fn for_source_tree(root: &Path) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in DEFAULT_PATTERNS {
            let _ = builder.add_line(None, pattern);
        }
        for name in IGNORE_FILES {
            let path = root.join(name);
            if path.is_file() {
                let content = std::fs::read_to_string(&path)?;
                for line in content.lines() {
                    // Malformed lines degrade to no-match.
                    if builder.add_line(None, line).is_err() {
                        tracing::debug!(line, "skipping malformed ignore pattern");
                    }
                }
                break; // only one ignore file is honored
            }
        }
        let matcher = builder.build().unwrap_or_else(|_| Gitignore::empty());
        Ok(Self { matcher })
    }

    /// Compile a rule set from raw pattern lines (no defaults, no files).
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut builder = GitignoreBuilder::new(".");
        for line in lines {
            let _ = builder.add_line(None, line);
        }
        Self {
            matcher: builder.build().unwrap_or_else(|_| Gitignore::empty()),
        }
    }

    /// Whether a `/`-separated relative path is excluded by the rules.
    /// Last matching pattern wins; a parent directory match excludes the
    /// whole subtree.
    pub fn matched(&self, path: &str) -> bool {
        self.matcher
            .matched_path_or_any_parents(path, false)
            .is_ignore()
    }
}

/// Enumerate every regular file under `root` that survives the active
/// ignore rules, as sorted `/`-normalized relative paths.
///
/// A missing or unreadable `root` is a fatal I/O error.
pub fn collect_files(root: &Path) -> Result<Vec<String>> {
    // Surface a missing root as the caller's error, not an empty walk.
    std::fs::metadata(root)?;

    let rules = IgnoreRules::for_source_tree(root)?;
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            KpkgError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "walk loop detected")
            }))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if !rules.matched(&relative) {
            files.push(relative);
        }
    }
    files.sort();
    Ok(files)
}
