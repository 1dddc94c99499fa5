//! # Descriptor Document
//!
//! A [`DescriptorDoc`] carries application metadata (name, media type,
//! upstream fields copied from a chart record) without any content
//! binding. It is the base shape a [`crate::PackageDoc`] merges from.

use serde_json::Value;

use kpkg_core::Result;
use kpkg_schema::DocKind;

use crate::envelope::Envelope;
use crate::render;

/// Chart-record fields copied verbatim by [`DescriptorDoc::from_chart`].
/// Absent fields are omitted; defaulting happens in transform.
const CHART_FIELDS: &[&str] = &[
    "sources",
    "maintainers",
    "appVersion",
    "icon",
    "keywords",
    "description",
    "appName",
    "created",
];

/// An application metadata document (kind `Descriptor`).
#[derive(Debug, Clone)]
pub struct DescriptorDoc {
    envelope: Envelope,
}

impl DescriptorDoc {
    /// A new descriptor with an optional media type.
    pub fn new(name: &str, media_type: Option<&str>) -> Self {
        let mut envelope = Envelope::new(DocKind::Descriptor, name);
        if let Some(media_type) = media_type {
            envelope.set_field("mediaType", Value::String(media_type.to_string()));
        }
        Self { envelope }
    }

    /// Build a descriptor from an external chart-style metadata record.
    ///
    /// Copies the fixed [`CHART_FIELDS`] allow-list; the chart's `name`
    /// becomes the descriptor name and the media type is `helm`.
    pub fn from_chart(chart: &serde_json::Map<String, Value>) -> Self {
        let name = chart.get("name").and_then(Value::as_str).unwrap_or("");
        let mut descriptor = Self::new(name, Some("helm"));
        for key in CHART_FIELDS {
            if let Some(value) = chart.get(*key) {
                descriptor.envelope.set_field(key, value.clone());
            }
        }
        descriptor
    }

    /// The document envelope.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Mutable access to the envelope, for controlled field updates.
    pub fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }

    /// The `spec.mediaType` value, when present and non-empty.
    pub fn media_type(&self) -> Option<&str> {
        self.envelope.field_str("mediaType")
    }

    /// Set `spec.mediaType`.
    pub fn set_media_type(&mut self, media_type: &str) {
        self.envelope
            .set_field("mediaType", Value::String(media_type.to_string()));
    }

    /// Transform then validate, emitting the persistable document.
    pub fn render(&mut self) -> Result<Value> {
        render::render_descriptor(&mut self.envelope)
    }
}
