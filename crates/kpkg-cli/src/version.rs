//! # Version Subcommand

use clap::Args;

use kpkg_core::Result;

use crate::output::{render_value, OutputFormat};

/// Arguments for `kpkg version`.
#[derive(Args, Debug)]
pub struct VersionArgs {}

/// Execute `kpkg version`.
pub fn run_version(_args: &VersionArgs, format: OutputFormat) -> Result<u8> {
    let version = env!("CARGO_PKG_VERSION");
    match format {
        OutputFormat::Text => println!("kpkg {version}"),
        OutputFormat::None => {}
        _ => render_value(format, &serde_json::json!({ "version": version })),
    }
    Ok(0)
}
