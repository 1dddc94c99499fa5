//! # Envelope — Shared Document Shape
//!
//! Every kpkg document shares the fixed top-level shape
//! `{apiVersion, kind, metadata: {name, labels, annotations}, spec}`.
//! The envelope is the common struct behind the two tagged document
//! variants; `kind` is fixed per variant and `metadata.name` and `spec`
//! change only through the accessors here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use kpkg_schema::{DocKind, API_GROUP_VERSION};

/// Document metadata: name plus free-form labels and annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Resource name. For packages, `transform()` forces this to
    /// `{packageName}.{packageVersion}`.
    pub name: String,
    /// Index/search labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Free-form annotations.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// The fixed top-level document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Always `manifest.k8s.io/v1alpha1`.
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    /// Document kind, fixed per concrete variant.
    pub kind: String,
    /// Name, labels, annotations.
    pub metadata: Metadata,
    /// The open spec object; declared properties come from the CRD.
    pub spec: serde_json::Map<String, Value>,
}

impl Envelope {
    /// A fresh envelope of the given kind with an empty spec.
    pub fn new(kind: DocKind, name: &str) -> Self {
        Self {
            api_version: API_GROUP_VERSION.to_string(),
            kind: kind.as_str().to_string(),
            metadata: Metadata {
                name: name.to_string(),
                ..Metadata::default()
            },
            spec: serde_json::Map::new(),
        }
    }

    /// Set one spec property.
    pub fn set_field(&mut self, key: &str, value: Value) {
        self.spec.insert(key.to_string(), value);
    }

    /// Read one spec property.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.spec.get(key)
    }

    /// Read a spec property as a non-empty string.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.field(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Set one metadata label.
    pub fn set_label(&mut self, key: &str, value: &str) {
        self.metadata
            .labels
            .insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_envelope_shape() {
        let env = Envelope::new(DocKind::Package, "cookieapp.0.4.5");
        assert_eq!(env.api_version, "manifest.k8s.io/v1alpha1");
        assert_eq!(env.kind, "Package");
        assert_eq!(env.metadata.name, "cookieapp.0.4.5");
        assert!(env.spec.is_empty());
    }

    #[test]
    fn test_field_str_filters_empty() {
        let mut env = Envelope::new(DocKind::Descriptor, "d");
        env.set_field("mediaType", json!(""));
        assert_eq!(env.field_str("mediaType"), None);
        env.set_field("mediaType", json!("helm"));
        assert_eq!(env.field_str("mediaType"), Some("helm"));
    }

    #[test]
    fn test_serde_wire_shape() {
        let mut env = Envelope::new(DocKind::Descriptor, "demo");
        env.set_label("mediaType", "helm");
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["apiVersion"], "manifest.k8s.io/v1alpha1");
        assert_eq!(value["metadata"]["labels"]["mediaType"], "helm");
        assert!(value["metadata"]["annotations"].is_object());
    }
}
