//! # kpkg-schema — Document Schema Layer
//!
//! Embeds the CustomResourceDefinition manifests for the two kpkg document
//! kinds and derives from them the declared spec-property map that drives
//! `transform()` defaulting, plus jsonschema validation of persisted
//! documents.
//!
//! ## Schema Source
//!
//! The CRDs live in `crd/*.crd.yaml` and are compiled into the binary with
//! `include_str!`. The declared property map is the
//! `spec.validation.openAPIV3Schema.properties` mapping of the CRD.

pub mod spec;
pub mod validate;

pub use spec::{declared_properties, default_value, DocKind, PropertyType};
pub use validate::{validate_spec, SchemaValidationError, Violation};

/// API group of the kpkg document kinds.
pub const API_GROUP: &str = "manifest.k8s.io";

/// API version of the kpkg document kinds.
pub const API_VERSION: &str = "v1alpha1";

/// Full `apiVersion` string carried by every document envelope.
pub const API_GROUP_VERSION: &str = "manifest.k8s.io/v1alpha1";
