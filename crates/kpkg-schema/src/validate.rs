//! # Schema Validation
//!
//! Validates a document's `spec` object against the openAPIV3Schema of its
//! CRD using the `jsonschema` crate (Draft 2020-12). The two embedded
//! schemas are self-contained — no `$ref` resolution or retriever is
//! needed.
//!
//! This path guards documents loaded back from disk or the cluster; the
//! structural invariants of freshly built documents are enforced by the
//! model layer's own `validate()`.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::spec::{open_api_schema, DocKind};

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document spec did not conform to its CRD schema.
    #[error("validation failed against {kind} schema:\n{violations}")]
    ValidationFailed {
        /// Document kind that was validated.
        kind: DocKind,
        /// Structured list of individual violations.
        violations: Violations,
    },

    /// The compiled validator could not be built.
    #[error("validator build error for {kind} schema: {reason}")]
    ValidatorBuildError {
        /// Document kind whose schema failed to compile.
        kind: DocKind,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// All violations.
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no violations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Validate a document's `spec` object against its kind's CRD schema.
pub fn validate_spec(kind: DocKind, spec: &Value) -> Result<(), SchemaValidationError> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    let validator =
        opts.build(open_api_schema(kind))
            .map_err(|e| SchemaValidationError::ValidatorBuildError {
                kind,
                reason: e.to_string(),
            })?;

    let violations: Vec<Violation> = validator
        .iter_errors(spec)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaValidationError::ValidationFailed {
            kind,
            violations: Violations(violations),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_package_spec() {
        let spec = json!({
            "packageName": "cookieapp",
            "packageVersion": "0.4.5",
            "mediaType": "helm",
            "created": "2021-03-04T05:06:07Z",
            "content": {"source": {"blob": "aGk="}, "size": 2, "digest": "ab"},
        });
        assert!(validate_spec(DocKind::Package, &spec).is_ok());
    }

    #[test]
    fn test_wrong_type_is_violation() {
        let spec = json!({"mediaType": 42});
        let err = validate_spec(DocKind::Descriptor, &spec).unwrap_err();
        match err {
            SchemaValidationError::ValidationFailed { violations, .. } => {
                assert!(!violations.is_empty());
                assert!(violations.violations()[0].instance_path.contains("mediaType"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_array_property_type_enforced() {
        let spec = json!({"keywords": "not-an-array"});
        assert!(validate_spec(DocKind::Descriptor, &spec).is_err());
    }
}
