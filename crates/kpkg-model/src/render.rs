//! # Render Pipeline — Transform then Validate
//!
//! Transform and validate are free functions dispatched on the document
//! variant, not virtual overrides. `transform` is idempotent and always
//! runs immediately before `validate`; the `render_*` functions are the
//! only sanctioned path to a persistable document.
//!
//! ## Transform Rules
//!
//! - Descriptor: mirror `spec.mediaType` into `labels.mediaType`, then
//!   default every declared-but-absent spec property from the CRD schema
//!   (`""` / `[]` / `{}`).
//! - Package: force `metadata.name = "{packageName}.{packageVersion}"`,
//!   attach the `digest` label (first 10 hex characters of
//!   `content.digest`) when content is present, mirror `packageName` and
//!   `mediaType` labels, then apply the same property defaulting.
//!
//! A transform never fails: a package without content gets its name and
//! the non-digest labels, and `validate` then reports the missing content
//! field instead of the transform crashing.

use serde_json::Value;

use kpkg_core::{KpkgError, Result};
use kpkg_schema::{declared_properties, default_value, DocKind};

use crate::envelope::Envelope;

/// Digest label length, per the wire format.
const DIGEST_LABEL_LEN: usize = 10;

/// Default every declared-but-absent spec property of `kind`.
fn apply_property_defaults(envelope: &mut Envelope, kind: DocKind) {
    for property in declared_properties(kind) {
        if !envelope.spec.contains_key(&property.name) {
            envelope
                .spec
                .insert(property.name.clone(), default_value(property.property_type));
        }
    }
}

/// Transform a descriptor document in place. Idempotent.
pub fn transform_descriptor(envelope: &mut Envelope) {
    if let Some(media_type) = envelope.field_str("mediaType").map(str::to_string) {
        envelope.set_label("mediaType", &media_type);
    }
    apply_property_defaults(envelope, DocKind::Descriptor);
}

/// Validate a descriptor document.
pub fn validate_descriptor(envelope: &Envelope) -> Result<()> {
    if envelope.field_str("mediaType").is_none() {
        return Err(KpkgError::schema_violation("spec.mediaType"));
    }
    Ok(())
}

/// Transform a package document in place. Idempotent.
pub fn transform_package(envelope: &mut Envelope) {
    let package_name = envelope.field_str("packageName").unwrap_or("").to_string();
    let version = envelope.field_str("packageVersion").unwrap_or("").to_string();
    envelope.metadata.name = format!("{package_name}.{version}");

    let digest = envelope
        .field("content")
        .and_then(|c| c.get("digest"))
        .and_then(Value::as_str)
        .map(str::to_string);
    if let Some(digest) = digest {
        // Character-wise: a loaded document may carry a non-hex digest.
        let label: String = digest.chars().take(DIGEST_LABEL_LEN).collect();
        envelope.set_label("digest", &label);
    }
    envelope.set_label("packageName", &package_name);
    if let Some(media_type) = envelope.field_str("mediaType").map(str::to_string) {
        envelope.set_label("mediaType", &media_type);
    }
    apply_property_defaults(envelope, DocKind::Package);
}

/// Validate a package document.
///
/// Every failure is a `SchemaViolation` naming the offending field.
pub fn validate_package(envelope: &Envelope) -> Result<()> {
    let package_name = envelope.field_str("packageName").unwrap_or("");
    let version = envelope.field_str("packageVersion").unwrap_or("");
    let expected = format!("{package_name}.{version}");
    if envelope.metadata.name != expected {
        return Err(KpkgError::SchemaViolation {
            field: "metadata.name".to_string(),
            message: format!(
                "name must be packageName.packageVersion: {:?} != {expected:?}",
                envelope.metadata.name
            ),
        });
    }
    if version.is_empty() {
        return Err(KpkgError::schema_violation("spec.packageVersion"));
    }
    if envelope.field_str("mediaType").is_none() {
        return Err(KpkgError::schema_violation("spec.mediaType"));
    }
    // A defaulted `{}` counts as missing, same as no content at all.
    let content = match envelope
        .field("content")
        .filter(|c| c.as_object().is_some_and(|o| !o.is_empty()))
    {
        Some(content) => content,
        None => return Err(KpkgError::schema_violation("spec.content")),
    };
    // Zero counts as missing, same as an absent size.
    if content
        .get("size")
        .and_then(Value::as_u64)
        .filter(|s| *s > 0)
        .is_none()
    {
        return Err(KpkgError::schema_violation("spec.content.size"));
    }
    if content
        .get("digest")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
        .is_none()
    {
        return Err(KpkgError::schema_violation("spec.content.digest"));
    }
    if content
        .get("source")
        .filter(|s| s.as_object().is_some_and(|o| !o.is_empty()))
        .is_none()
    {
        return Err(KpkgError::schema_violation("spec.content.source"));
    }
    Ok(())
}

/// Transform, validate, and emit a descriptor document.
pub fn render_descriptor(envelope: &mut Envelope) -> Result<Value> {
    transform_descriptor(envelope);
    validate_descriptor(envelope)?;
    Ok(serde_json::to_value(&envelope)?)
}

/// Transform, validate, and emit a package document.
pub fn render_package(envelope: &mut Envelope) -> Result<Value> {
    transform_package(envelope);
    validate_package(envelope)?;
    Ok(serde_json::to_value(&envelope)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn package_envelope() -> Envelope {
        let mut env = Envelope::new(DocKind::Package, "");
        env.set_field("packageName", json!("cookieapp"));
        env.set_field("packageVersion", json!("0.4.5"));
        env.set_field("mediaType", json!("helm"));
        env.set_field(
            "content",
            json!({
                "source": {"blob": "aGVsbG8="},
                "size": 5,
                "digest": "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
            }),
        );
        env
    }

    #[test]
    fn test_package_name_forced_by_transform() {
        let mut env = package_envelope();
        transform_package(&mut env);
        assert_eq!(env.metadata.name, "cookieapp.0.4.5");
    }

    #[test]
    fn test_dotted_names_and_versions() {
        let mut env = package_envelope();
        env.set_field("packageName", json!("quay.io/org/app"));
        env.set_field("packageVersion", json!("1.2.3-rc.1"));
        transform_package(&mut env);
        assert_eq!(env.metadata.name, "quay.io/org/app.1.2.3-rc.1");
        assert!(validate_package(&env).is_ok());
    }

    #[test]
    fn test_digest_label_is_first_ten_hex() {
        let mut env = package_envelope();
        transform_package(&mut env);
        assert_eq!(env.metadata.labels["digest"], "2cf24dba5f");
        assert_eq!(env.metadata.labels["packageName"], "cookieapp");
        assert_eq!(env.metadata.labels["mediaType"], "helm");
    }

    #[test]
    fn test_digest_label_truncates_on_characters() {
        let mut env = package_envelope();
        let mut content = env.field("content").unwrap().clone();
        // Multibyte character spanning the label boundary must not panic.
        content
            .as_object_mut()
            .unwrap()
            .insert("digest".to_string(), json!("aaaaaaaaaébbbb"));
        env.set_field("content", content);
        transform_package(&mut env);
        assert_eq!(env.metadata.labels["digest"], "aaaaaaaaaé");
    }

    #[test]
    fn test_zero_size_content_fails_validate() {
        let mut env = package_envelope();
        let mut content = env.field("content").unwrap().clone();
        content
            .as_object_mut()
            .unwrap()
            .insert("size".to_string(), json!(0));
        env.set_field("content", content);
        transform_package(&mut env);
        assert!(matches!(
            validate_package(&env),
            Err(KpkgError::SchemaViolation { field, .. }) if field == "spec.content.size"
        ));
    }

    #[test]
    fn test_transform_idempotent() {
        let mut env = package_envelope();
        transform_package(&mut env);
        let once = env.clone();
        transform_package(&mut env);
        assert_eq!(env, once);
    }

    #[test]
    fn test_transform_without_content_does_not_panic() {
        let mut env = package_envelope();
        env.spec.remove("content");
        transform_package(&mut env);
        assert!(!env.metadata.labels.contains_key("digest"));
        assert!(matches!(
            validate_package(&env),
            Err(KpkgError::SchemaViolation { field, .. }) if field == "spec.content"
        ));
    }

    #[test]
    fn test_declared_properties_defaulted() {
        let mut env = package_envelope();
        transform_package(&mut env);
        assert_eq!(env.field("keywords"), Some(&json!([])));
        assert_eq!(env.field("description"), Some(&json!("")));
    }

    #[test]
    fn test_each_missing_field_fails_validate() {
        for (field, expected) in [
            ("packageVersion", "spec.packageVersion"),
            ("mediaType", "spec.mediaType"),
            ("content", "spec.content"),
        ] {
            let mut env = package_envelope();
            env.spec.remove(field);
            transform_package(&mut env);
            match validate_package(&env) {
                Err(KpkgError::SchemaViolation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected violation for {field}, got {other:?}"),
            }
        }

        for (subfield, expected) in [
            ("size", "spec.content.size"),
            ("digest", "spec.content.digest"),
            ("source", "spec.content.source"),
        ] {
            let mut env = package_envelope();
            let mut content = env.field("content").unwrap().clone();
            content.as_object_mut().unwrap().remove(subfield);
            env.set_field("content", content);
            transform_package(&mut env);
            match validate_package(&env) {
                Err(KpkgError::SchemaViolation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected violation for {subfield}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_rejects_stale_name() {
        let mut env = package_envelope();
        transform_package(&mut env);
        env.metadata.name = "other.name".to_string();
        assert!(matches!(
            validate_package(&env),
            Err(KpkgError::SchemaViolation { field, .. }) if field == "metadata.name"
        ));
    }

    #[test]
    fn test_descriptor_transform_and_validate() {
        let mut env = Envelope::new(DocKind::Descriptor, "demo");
        env.set_field("mediaType", json!("helm"));
        let rendered = render_descriptor(&mut env).unwrap();
        assert_eq!(rendered["metadata"]["labels"]["mediaType"], "helm");
        assert_eq!(rendered["spec"]["keywords"], json!([]));

        let mut bare = Envelope::new(DocKind::Descriptor, "demo");
        assert!(render_descriptor(&mut bare).is_err());
    }
}
