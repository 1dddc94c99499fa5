//! # External Collaborators and Query Pass-Throughs
//!
//! The two seams to the outside world are traits: [`ContentFetcher`]
//! (opaque `fetch(url) -> bytes`) and [`ClusterOps`] (get/list/delete/apply
//! over named resources). The query operations here are thin pass-throughs
//! that only build label selectors and column specs — no local filtering.
//!
//! Both collaborators are blocking calls with no built-in timeout or retry;
//! a caller wanting those properties wraps the trait.

use std::collections::BTreeMap;

use serde_json::Value;

use kpkg_core::{KpkgError, Result};
use kpkg_schema::DocKind;

use crate::package::PackageDoc;

/// Opaque remote content retrieval.
pub trait ContentFetcher {
    /// Fetch the body at `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Opaque cluster store operations over named resources.
pub trait ClusterOps {
    /// Get one resource; `opts` carries output-shape flags.
    fn get(&self, plural: &str, name: &str, namespace: &str, opts: &[String]) -> Result<String>;
    /// List resources; `opts` carries selectors and output-shape flags.
    fn list(&self, plural: &str, namespace: &str, opts: &[String]) -> Result<String>;
    /// Delete one resource.
    fn delete(&self, plural: &str, name: &str, namespace: &str) -> Result<String>;
    /// Apply a rendered manifest.
    fn apply(&self, manifest: &str, namespace: &str) -> Result<String>;
}

/// Output shape requested from a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutput {
    /// Fixed custom-columns text table.
    Text,
    /// Parsed JSON.
    Json,
    /// Parsed YAML.
    Yaml,
}

/// Result of a list query: raw text or a parsed document.
#[derive(Debug)]
pub enum ListResult {
    /// Raw collaborator output (text mode).
    Text(String),
    /// Parsed list document (json/yaml mode).
    Structured(Value),
}

/// Fixed column set for the text-mode package table.
const COLUMNS: &[(&str, &str)] = &[
    ("name", "metadata.name"),
    ("app", "spec.packageName"),
    ("version", "spec.packageVersion"),
    ("mediatype", "spec.mediaType"),
    ("digest", "spec.content.digest"),
];

/// The `custom-columns=` spec for the text-mode table.
fn custom_columns() -> String {
    let columns: Vec<String> = COLUMNS
        .iter()
        .map(|(key, path)| format!("{}:{path}", key.to_uppercase()))
        .collect();
    format!("custom-columns={}", columns.join(","))
}

/// Fetch one persisted package document by name.
pub fn get(ops: &dyn ClusterOps, name: &str, namespace: &str) -> Result<PackageDoc> {
    let raw = ops.get(
        DocKind::Package.plural(),
        name,
        namespace,
        &["-o".to_string(), "json".to_string()],
    )?;
    let resource: Value = serde_json::from_str(&raw)?;
    PackageDoc::load(&resource)
}

/// Delete one persisted package document by name.
pub fn delete(ops: &dyn ClusterOps, name: &str, namespace: &str) -> Result<String> {
    ops.delete(DocKind::Package.plural(), name, namespace)
}

/// List persisted package documents.
///
/// `filters` become a `-l k=v,...` label selector; `name` narrows to one
/// resource; `output` picks the collaborator's output shape.
pub fn list(
    ops: &dyn ClusterOps,
    name: Option<&str>,
    namespace: &str,
    output: ListOutput,
    filters: &BTreeMap<String, String>,
) -> Result<ListResult> {
    let labels: Vec<String> = filters.iter().map(|(k, v)| format!("{k}={v}")).collect();
    let mut opts = vec!["-l".to_string(), labels.join(",")];
    if let Some(name) = name {
        opts.push(name.to_string());
    }
    match output {
        ListOutput::Text => {
            opts.push("-o".to_string());
            opts.push(custom_columns());
        }
        ListOutput::Json => {
            opts.push("-o".to_string());
            opts.push("json".to_string());
        }
        ListOutput::Yaml => {
            opts.push("-o".to_string());
            opts.push("yaml".to_string());
        }
    }
    let raw = ops.list(DocKind::Package.plural(), namespace, &opts)?;
    match output {
        ListOutput::Text => Ok(ListResult::Text(raw)),
        ListOutput::Json => Ok(ListResult::Structured(serde_json::from_str(&raw)?)),
        ListOutput::Yaml => Ok(ListResult::Structured(serde_yaml::from_str(&raw)?)),
    }
}

/// Find the first package matching the label filters, or `None`.
pub fn find(
    ops: &dyn ClusterOps,
    filters: &BTreeMap<String, String>,
    namespace: &str,
) -> Result<Option<PackageDoc>> {
    let result = list(ops, None, namespace, ListOutput::Json, filters)?;
    let document = match result {
        ListResult::Structured(document) => document,
        ListResult::Text(_) => {
            return Err(KpkgError::Construction(
                "find requires structured list output".to_string(),
            ))
        }
    };
    match document.get("items").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => Ok(Some(PackageDoc::load(&items[0])?)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records calls and replays canned responses.
    struct FakeCluster {
        calls: RefCell<Vec<(String, Vec<String>)>>,
        list_response: String,
    }

    impl FakeCluster {
        fn new(list_response: &str) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                list_response: list_response.to_string(),
            }
        }
    }

    impl ClusterOps for FakeCluster {
        fn get(&self, plural: &str, name: &str, _ns: &str, opts: &[String]) -> Result<String> {
            self.calls
                .borrow_mut()
                .push((format!("get {plural} {name}"), opts.to_vec()));
            Ok(self.list_response.clone())
        }
        fn list(&self, plural: &str, _ns: &str, opts: &[String]) -> Result<String> {
            self.calls
                .borrow_mut()
                .push((format!("list {plural}"), opts.to_vec()));
            Ok(self.list_response.clone())
        }
        fn delete(&self, plural: &str, name: &str, _ns: &str) -> Result<String> {
            self.calls
                .borrow_mut()
                .push((format!("delete {plural} {name}"), Vec::new()));
            Ok(format!("{name} deleted"))
        }
        fn apply(&self, _manifest: &str, _ns: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    fn package_resource() -> String {
        serde_json::json!({
            "apiVersion": "manifest.k8s.io/v1alpha1",
            "kind": "Package",
            "metadata": {"name": "cookieapp.0.4.5", "labels": {}, "annotations": {}},
            "spec": {
                "packageName": "cookieapp",
                "packageVersion": "0.4.5",
                "mediaType": "helm",
                "content": {"source": {"urls": ["https://example.com/c.tgz"]},
                            "size": 10, "digest": "abcdef"},
            },
        })
        .to_string()
    }

    #[test]
    fn test_list_builds_selector_and_columns() {
        let cluster = FakeCluster::new("NAME  APP\n");
        let mut filters = BTreeMap::new();
        filters.insert("packageName".to_string(), "cookieapp".to_string());
        filters.insert("mediaType".to_string(), "helm".to_string());

        let result = list(&cluster, None, "default", ListOutput::Text, &filters).unwrap();
        assert!(matches!(result, ListResult::Text(_)));

        let calls = cluster.calls.borrow();
        let opts = &calls[0].1;
        assert_eq!(opts[0], "-l");
        assert_eq!(opts[1], "mediaType=helm,packageName=cookieapp");
        assert!(opts.iter().any(|o| o.starts_with("custom-columns=NAME:metadata.name")));
        assert!(opts.iter().any(|o| o.contains("DIGEST:spec.content.digest")));
    }

    #[test]
    fn test_get_parses_resource() {
        let cluster = FakeCluster::new(&package_resource());
        let doc = get(&cluster, "cookieapp.0.4.5", "default").unwrap();
        assert_eq!(doc.package_name(), "cookieapp");
        assert_eq!(doc.version(), "0.4.5");
    }

    #[test]
    fn test_find_returns_first_item_or_none() {
        let list_doc = format!(r#"{{"items": [{}]}}"#, package_resource());
        let cluster = FakeCluster::new(&list_doc);
        let found = find(&cluster, &BTreeMap::new(), "default").unwrap();
        assert_eq!(found.unwrap().package_name(), "cookieapp");

        let empty = FakeCluster::new(r#"{"items": []}"#);
        assert!(find(&empty, &BTreeMap::new(), "default").unwrap().is_none());
    }

    #[test]
    fn test_delete_passes_through() {
        let cluster = FakeCluster::new("");
        let out = delete(&cluster, "cookieapp.0.4.5", "demo").unwrap();
        assert_eq!(out, "cookieapp.0.4.5 deleted");
    }
}
