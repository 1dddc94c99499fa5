//! # kpkg CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! On failure, the structured error payload is rendered in the selected
//! output format and the exit status is derived from the error kind.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kpkg_cli::extract::{run_extract, ExtractArgs};
use kpkg_cli::helm::{run_helm, HelmArgs};
use kpkg_cli::import_index::{run_import_index, ImportIndexArgs};
use kpkg_cli::inspect::{run_inspect, InspectArgs};
use kpkg_cli::output::{render_error, OutputFormat};
use kpkg_cli::package::{run_package, PackageArgs};
use kpkg_cli::query::{run_delete, run_get, run_list, DeleteArgs, GetArgs, ListArgs};
use kpkg_cli::version::{run_version, VersionArgs};
use kpkg_cluster::{Helm, Kubectl};
use kpkg_registry::HttpFetcher;

/// kpkg — content-addressed Kubernetes application packaging.
///
/// Packages application bundles (Helm charts, Kubernetes manifests) into
/// content-addressed archives bound to Descriptor/Package documents, and
/// persists, inspects, and deploys them.
#[derive(Parser, Debug)]
#[command(name = "kpkg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format.
    #[arg(short = 'o', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// kubectl context to use for cluster operations.
    #[arg(long, global = true)]
    context: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Archive a source tree into a rendered package document.
    Package(PackageArgs),

    /// Resolve a package's content and unpack or materialize its archive.
    Extract(ExtractArgs),

    /// Look inside a package archive: manifest, file, or tree.
    Inspect(InspectArgs),

    /// Get one persisted package document.
    Get(GetArgs),

    /// List persisted package documents.
    List(ListArgs),

    /// Delete a persisted package document.
    Delete(DeleteArgs),

    /// Batch-import a helm-style repository index.
    ImportIndex(ImportIndexArgs),

    /// Fetch a chart and deploy it with helm.
    Helm(HelmArgs),

    /// Print the kpkg version.
    Version(VersionArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let kubectl = Kubectl::new("kubectl", cli.context.as_deref());
    let fetcher = HttpFetcher::new();
    let helm = Helm::default();
    let format = cli.output;

    let result = match &cli.command {
        Commands::Package(args) => run_package(args, &kubectl, format),
        Commands::Extract(args) => run_extract(args, &kubectl, &fetcher, format),
        Commands::Inspect(args) => run_inspect(args, &kubectl, &fetcher, format),
        Commands::Get(args) => run_get(args, &kubectl, format),
        Commands::List(args) => run_list(args, &kubectl, format),
        Commands::Delete(args) => run_delete(args, &kubectl, format),
        Commands::ImportIndex(args) => run_import_index(args, &fetcher, format),
        Commands::Helm(args) => run_helm(args, &kubectl, &fetcher, &helm, format),
        Commands::Version(args) => run_version(args, format),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            render_error(format, &error);
            ExitCode::from(error.exit_code())
        }
    }
}
