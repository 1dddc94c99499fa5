//! # Helm Subcommand
//!
//! Fetch-then-deploy: resolves a package to a packed `.tar.gz` under the
//! destination directory, then hands that path to `helm install` or
//! `helm upgrade`. Helm's own options pass through after `--`.

use clap::{Args, Subcommand};

use kpkg_core::Result;
use kpkg_model::{ClusterOps, ContentFetcher};

use crate::extract::{load_package, ExtractArgs};
use crate::output::{render_value, OutputFormat};

/// Arguments for `kpkg helm`.
#[derive(Args, Debug)]
pub struct HelmArgs {
    #[command(subcommand)]
    pub command: HelmCommand,
}

/// Helm deployment actions.
#[derive(Subcommand, Debug)]
pub enum HelmCommand {
    /// Fetch the chart and execute `helm install`.
    Install(HelmActionArgs),
    /// Fetch the chart and execute `helm upgrade`.
    Upgrade(HelmActionArgs),
}

/// Shared arguments of the helm actions.
#[derive(Args, Debug)]
pub struct HelmActionArgs {
    #[command(flatten)]
    pub extract: ExtractArgs,

    /// Options forwarded to the helm binary, after `--`.
    #[arg(last = true)]
    pub helm_opts: Vec<String>,
}

/// Execute `kpkg helm`.
pub fn run_helm(
    args: &HelmArgs,
    ops: &dyn ClusterOps,
    fetcher: &dyn ContentFetcher,
    helm: &kpkg_cluster::Helm,
    format: OutputFormat,
) -> Result<u8> {
    let (cmd, action) = match &args.command {
        HelmCommand::Install(action) => ("install", action),
        HelmCommand::Upgrade(action) => ("upgrade", action),
    };

    let package = load_package(&action.extract, ops)?;
    let path = package.extract(fetcher, &action.extract.dest, true)?;
    let output = helm.action(cmd, &path.display().to_string(), &action.helm_opts)?;

    match format {
        OutputFormat::Text => print!("{output}"),
        OutputFormat::None => {}
        _ => render_value(format, &serde_json::json!({ "result": output })),
    }
    Ok(0)
}
