//! # Query Subcommands — get / list / delete
//!
//! Thin pass-throughs to the cluster collaborator: no local filtering
//! beyond the label selectors and column spec the model layer builds.

use std::collections::BTreeMap;

use clap::Args;

use kpkg_core::Result;
use kpkg_model::{ops, ClusterOps, ListOutput, ListResult};

use crate::output::{render_value, OutputFormat};

/// Arguments for `kpkg get`.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Resource name (`{packageName}.{packageVersion}`).
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Kubernetes namespace.
    #[arg(short = 'n', long, default_value = "default")]
    pub namespace: String,
}

/// Arguments for `kpkg list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Narrow to one resource name.
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Label filters, as k=v pairs.
    #[arg(long = "filter", value_name = "K=V")]
    pub filters: Vec<String>,

    /// Kubernetes namespace.
    #[arg(short = 'n', long, default_value = "default")]
    pub namespace: String,
}

/// Arguments for `kpkg delete`.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Resource name (`{packageName}.{packageVersion}`).
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Kubernetes namespace.
    #[arg(short = 'n', long, default_value = "default")]
    pub namespace: String,
}

/// Execute `kpkg get`.
pub fn run_get(args: &GetArgs, ops: &dyn ClusterOps, format: OutputFormat) -> Result<u8> {
    let package = ops::get(ops, &args.name, &args.namespace)?;
    render_value(format, &serde_json::to_value(package.envelope())?);
    Ok(0)
}

/// Execute `kpkg list`.
pub fn run_list(args: &ListArgs, ops: &dyn ClusterOps, format: OutputFormat) -> Result<u8> {
    let output = match format {
        OutputFormat::Json => ListOutput::Json,
        OutputFormat::Yaml => ListOutput::Yaml,
        OutputFormat::Text | OutputFormat::None => ListOutput::Text,
    };
    let result = ops::list(
        ops,
        args.name.as_deref(),
        &args.namespace,
        output,
        &parse_filters(&args.filters),
    )?;
    match result {
        ListResult::Text(raw) => {
            if format != OutputFormat::None {
                print!("{raw}");
            }
        }
        ListResult::Structured(value) => render_value(format, &value),
    }
    Ok(0)
}

/// Execute `kpkg delete`.
pub fn run_delete(args: &DeleteArgs, ops: &dyn ClusterOps, format: OutputFormat) -> Result<u8> {
    let output = ops::delete(ops, &args.name, &args.namespace)?;
    render_value(
        format,
        &serde_json::json!({ "deleted": args.name, "result": output.trim_end() }),
    );
    Ok(0)
}

fn parse_filters(filters: &[String]) -> BTreeMap<String, String> {
    filters
        .iter()
        .filter_map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
        })
        .collect()
}
