//! # Output Rendering
//!
//! The `-o/--output` formats shared by every subcommand, plus the
//! structured error rendering `main` uses on failure.

use clap::ValueEnum;
use serde_json::Value;

use kpkg_core::KpkgError;

/// Output format for subcommand results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
    /// Suppress output.
    None,
}

/// Print a structured value in the selected format. Text mode falls back
/// to YAML, the most readable structured form.
pub fn render_value(format: OutputFormat, value: &Value) {
    match format {
        OutputFormat::None => {}
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => eprintln!("render failed: {e}"),
        },
        OutputFormat::Yaml | OutputFormat::Text => match serde_yaml::to_string(value) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => eprintln!("render failed: {e}"),
        },
    }
}

/// Print an error payload in the selected format, on stderr.
pub fn render_error(format: OutputFormat, error: &KpkgError) {
    let payload = error.payload();
    match format {
        OutputFormat::Json => {
            if let Ok(rendered) = serde_json::to_string_pretty(&payload) {
                eprintln!("{rendered}");
            }
        }
        _ => {
            if let Ok(rendered) = serde_yaml::to_string(&payload) {
                eprint!("{rendered}");
            }
        }
    }
}
