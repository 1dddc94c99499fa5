//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout kpkg. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Validation errors name the violating field so callers never have to
//!   parse a message string.
//! - Every error maps to a stable machine code (`code()`), a CLI exit
//!   status (`exit_code()`), and a structured payload (`payload()`) that
//!   the CLI renders in the requested output format.
//! - Batch operations that tolerate partial failure collect errors on the
//!   side instead of propagating them; that policy lives at the call site,
//!   not here.

use thiserror::Error;

/// Top-level error type for the kpkg toolchain.
#[derive(Error, Debug)]
pub enum KpkgError {
    /// A document failed structural validation.
    #[error("schema violation: {message}")]
    SchemaViolation {
        /// Dotted path of the offending field (e.g. `spec.content.digest`).
        field: String,
        /// Human-readable description of the violation.
        message: String,
    },

    /// A requested artifact does not exist.
    #[error("not found: {what} {name:?}")]
    NotFound {
        /// What kind of thing was looked up (manifest, archive entry, resource).
        what: String,
        /// The name that was looked up.
        name: String,
    },

    /// A write would clobber an existing persisted artifact.
    #[error("already exists: {path}")]
    AlreadyExists {
        /// Path or resource name of the existing artifact.
        path: String,
    },

    /// A remote content fetch failed while resolving a package source.
    #[error("content resolution failed for {url}: {reason}")]
    ContentResolution {
        /// The URL that was being fetched.
        url: String,
        /// Why the fetch failed.
        reason: String,
    },

    /// Insufficient arguments to construct a document.
    #[error("construction error: {0}")]
    Construction(String),

    /// An external cluster command exited non-zero.
    #[error("cluster command failed with status {status}: {stderr}")]
    Cluster {
        /// Exit status of the external binary.
        status: i32,
        /// Captured standard error of the external binary.
        stderr: String,
    },

    /// Text-safe encoding or decoding failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Archive construction or extraction failed.
    #[error("archive error: {0}")]
    Archive(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl KpkgError {
    /// Stable machine code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SchemaViolation { .. } => "schema-violation",
            Self::NotFound { .. } => "resource-not-found",
            Self::AlreadyExists { .. } => "package-exists",
            Self::ContentResolution { .. } => "content-resolution-failed",
            Self::Construction(_) => "invalid-parameters",
            Self::Cluster { .. } => "cluster-error",
            Self::Encoding(_) => "invalid-encoding",
            Self::Archive(_) => "archive-error",
            Self::Io(_) | Self::Json(_) | Self::Yaml(_) => "internal-error",
        }
    }

    /// CLI exit status derived from the error kind.
    ///
    /// Fetch failures exit 2; a failed cluster subprocess propagates the
    /// child's own status; everything else exits 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ContentResolution { .. } => 2,
            Self::Cluster { status, .. } => u8::try_from(*status).unwrap_or(1),
            _ => 1,
        }
    }

    /// Structured `{code, message, details}` payload for error rendering.
    pub fn payload(&self) -> serde_json::Value {
        let details = match self {
            Self::SchemaViolation { field, .. } => serde_json::json!({ "field": field }),
            Self::NotFound { what, name } => serde_json::json!({ "kind": what, "name": name }),
            Self::AlreadyExists { path } => serde_json::json!({ "path": path }),
            Self::ContentResolution { url, .. } => serde_json::json!({ "url": url }),
            Self::Cluster { status, stderr } => {
                serde_json::json!({ "status": status, "stderr": stderr })
            }
            _ => serde_json::json!({}),
        };
        serde_json::json!({
            "code": self.code(),
            "message": self.to_string(),
            "details": details,
        })
    }

    /// Shorthand constructor for schema violations.
    pub fn schema_violation(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::SchemaViolation {
            message: format!("missing {field}"),
            field,
        }
    }

    /// Shorthand constructor for not-found errors.
    pub fn not_found(what: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_violation_code_and_payload() {
        let err = KpkgError::schema_violation("spec.content.digest");
        assert_eq!(err.code(), "schema-violation");
        assert_eq!(err.exit_code(), 1);
        let payload = err.payload();
        assert_eq!(payload["code"], "schema-violation");
        assert_eq!(payload["details"]["field"], "spec.content.digest");
    }

    #[test]
    fn test_content_resolution_exit_code() {
        let err = KpkgError::ContentResolution {
            url: "https://example.com/chart.tgz".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.payload()["details"]["url"], "https://example.com/chart.tgz");
    }

    #[test]
    fn test_cluster_error_propagates_child_status() {
        let err = KpkgError::Cluster {
            status: 3,
            stderr: "no such resource".into(),
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.code(), "cluster-error");
    }

    #[test]
    fn test_carrier_errors_map_to_internal_code() {
        let yaml: KpkgError = serde_yaml::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(yaml.code(), "internal-error");
        let json: KpkgError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(json.code(), "internal-error");
    }

    #[test]
    fn test_not_found_display() {
        let err = KpkgError::not_found("manifest", "Chart.yaml");
        assert!(err.to_string().contains("Chart.yaml"));
        assert_eq!(err.code(), "resource-not-found");
    }
}
