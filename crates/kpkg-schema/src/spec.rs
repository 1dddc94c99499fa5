//! # CRD Spec — Declared Properties and Defaulting Rules
//!
//! Parses the embedded CRD manifests and exposes, per document kind, the
//! ordered property → type map that `transform()` uses to default every
//! declared-but-absent spec property (`""` for scalars, `[]` for arrays,
//! `{}` for objects).

use once_cell::sync::Lazy;
use serde::Deserialize;

const DESCRIPTOR_CRD: &str = include_str!("../crd/descriptor.crd.yaml");
const PACKAGE_CRD: &str = include_str!("../crd/package.crd.yaml");

/// The two kpkg document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocKind {
    /// Application metadata without content.
    Descriptor,
    /// A named, versioned release bound to archive content.
    Package,
}

impl DocKind {
    /// The `kind` string carried on the document envelope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Descriptor => "Descriptor",
            Self::Package => "Package",
        }
    }

    /// The CRD plural used for cluster queries.
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Descriptor => "descriptors",
            Self::Package => "packages",
        }
    }
}

impl std::fmt::Display for DocKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a spec property, as written in the CRD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Array,
    Object,
}

/// One declared spec property.
#[derive(Debug, Clone)]
pub struct DeclaredProperty {
    /// Property name as it appears in `spec`.
    pub name: String,
    /// Declared type.
    pub property_type: PropertyType,
}

/// Default value for an absent declared property.
pub fn default_value(property_type: PropertyType) -> serde_json::Value {
    match property_type {
        PropertyType::String => serde_json::Value::String(String::new()),
        PropertyType::Array => serde_json::Value::Array(Vec::new()),
        PropertyType::Object => serde_json::Value::Object(serde_json::Map::new()),
    }
}

/// The declared property map of a document kind.
pub fn declared_properties(kind: DocKind) -> &'static [DeclaredProperty] {
    match kind {
        DocKind::Descriptor => &DESCRIPTOR_PROPERTIES,
        DocKind::Package => &PACKAGE_PROPERTIES,
    }
}

/// The openAPIV3Schema of a document kind, as a JSON value ready for
/// jsonschema compilation.
pub fn open_api_schema(kind: DocKind) -> &'static serde_json::Value {
    match kind {
        DocKind::Descriptor => &DESCRIPTOR_SCHEMA,
        DocKind::Package => &PACKAGE_SCHEMA,
    }
}

#[derive(Deserialize)]
struct CrdManifest {
    spec: CrdSpec,
}

#[derive(Deserialize)]
struct CrdSpec {
    validation: CrdValidation,
}

#[derive(Deserialize)]
struct CrdValidation {
    #[serde(rename = "openAPIV3Schema")]
    open_api_v3_schema: serde_yaml::Value,
}

fn parse_crd(manifest: &str) -> (Vec<DeclaredProperty>, serde_json::Value) {
    // The embedded CRDs are compile-time constants; a parse failure here is
    // a build defect, not a runtime condition.
    let crd: CrdManifest = serde_yaml::from_str(manifest).expect("embedded CRD must parse");
    let schema: serde_json::Value = serde_yaml::from_value(crd.spec.validation.open_api_v3_schema)
        .expect("embedded CRD schema must convert to JSON");

    let mut properties = Vec::new();
    if let Some(map) = schema.get("properties").and_then(|p| p.as_object()) {
        for (name, prop) in map {
            let property_type = match prop.get("type").and_then(|t| t.as_str()) {
                Some("array") => PropertyType::Array,
                Some("object") => PropertyType::Object,
                _ => PropertyType::String,
            };
            properties.push(DeclaredProperty {
                name: name.clone(),
                property_type,
            });
        }
    }
    (properties, schema)
}

static DESCRIPTOR_PARSED: Lazy<(Vec<DeclaredProperty>, serde_json::Value)> =
    Lazy::new(|| parse_crd(DESCRIPTOR_CRD));
static PACKAGE_PARSED: Lazy<(Vec<DeclaredProperty>, serde_json::Value)> =
    Lazy::new(|| parse_crd(PACKAGE_CRD));

static DESCRIPTOR_PROPERTIES: Lazy<Vec<DeclaredProperty>> =
    Lazy::new(|| DESCRIPTOR_PARSED.0.clone());
static PACKAGE_PROPERTIES: Lazy<Vec<DeclaredProperty>> = Lazy::new(|| PACKAGE_PARSED.0.clone());
static DESCRIPTOR_SCHEMA: Lazy<serde_json::Value> = Lazy::new(|| DESCRIPTOR_PARSED.1.clone());
static PACKAGE_SCHEMA: Lazy<serde_json::Value> = Lazy::new(|| PACKAGE_PARSED.1.clone());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_declares_media_type() {
        let props = declared_properties(DocKind::Descriptor);
        assert!(props.iter().any(|p| p.name == "mediaType"));
        assert!(props
            .iter()
            .any(|p| p.name == "keywords" && p.property_type == PropertyType::Array));
    }

    #[test]
    fn test_package_declares_content_object() {
        let props = declared_properties(DocKind::Package);
        let content = props.iter().find(|p| p.name == "content").unwrap();
        assert_eq!(content.property_type, PropertyType::Object);
        assert!(props.iter().any(|p| p.name == "packageName"));
        assert!(props.iter().any(|p| p.name == "packageVersion"));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_value(PropertyType::String), serde_json::json!(""));
        assert_eq!(default_value(PropertyType::Array), serde_json::json!([]));
        assert_eq!(default_value(PropertyType::Object), serde_json::json!({}));
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(DocKind::Package.as_str(), "Package");
        assert_eq!(DocKind::Package.plural(), "packages");
        assert_eq!(DocKind::Descriptor.plural(), "descriptors");
    }
}
