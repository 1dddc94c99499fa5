//! # Kubectl — Cluster Store Operations
//!
//! Invokes the external `kubectl` binary for get/list/delete/apply over
//! named resources. Argument vectors mirror the kubectl CLI directly
//! (`-n`, `-o`, `-l`); a non-zero exit becomes a `Cluster` error carrying
//! the child's status and captured stderr.

use std::io::Write;
use std::process::{Command, Stdio};

use kpkg_core::{KpkgError, Result};
use kpkg_model::ClusterOps;

/// A kubectl invocation wrapper.
pub struct Kubectl {
    binary: String,
    context: Option<String>,
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::new("kubectl", None)
    }
}

impl Kubectl {
    /// A wrapper over `binary`, optionally pinned to a kubeconfig context.
    pub fn new(binary: &str, context: Option<&str>) -> Self {
        Self {
            binary: binary.to_string(),
            context: context.map(str::to_string),
        }
    }

    fn run(&self, args: &[String], stdin: Option<&str>) -> Result<String> {
        let mut command = Command::new(&self.binary);
        if let Some(context) = &self.context {
            command.arg("--context").arg(context);
        }
        command.args(args);
        tracing::debug!(binary = %self.binary, ?args, "invoking kubectl");

        let output = match stdin {
            Some(input) => {
                command.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());
                let mut child = command.spawn()?;
                child
                    .stdin
                    .as_mut()
                    .ok_or_else(|| {
                        KpkgError::Io(std::io::Error::new(
                            std::io::ErrorKind::BrokenPipe,
                            "kubectl stdin unavailable",
                        ))
                    })?
                    .write_all(input.as_bytes())?;
                child.wait_with_output()?
            }
            None => command.output()?,
        };

        if !output.status.success() {
            return Err(KpkgError::Cluster {
                status: output.status.code().unwrap_or(1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ClusterOps for Kubectl {
    fn get(&self, plural: &str, name: &str, namespace: &str, opts: &[String]) -> Result<String> {
        let mut args = vec![
            "get".to_string(),
            plural.to_string(),
            name.to_string(),
            "-n".to_string(),
            namespace.to_string(),
        ];
        args.extend_from_slice(opts);
        self.run(&args, None)
    }

    fn list(&self, plural: &str, namespace: &str, opts: &[String]) -> Result<String> {
        let mut args = vec![
            "get".to_string(),
            plural.to_string(),
            "-n".to_string(),
            namespace.to_string(),
        ];
        args.extend_from_slice(opts);
        self.run(&args, None)
    }

    fn delete(&self, plural: &str, name: &str, namespace: &str) -> Result<String> {
        let args = vec![
            "delete".to_string(),
            plural.to_string(),
            name.to_string(),
            "-n".to_string(),
            namespace.to_string(),
        ];
        self.run(&args, None)
    }

    fn apply(&self, manifest: &str, namespace: &str) -> Result<String> {
        let args = vec![
            "apply".to_string(),
            "-n".to_string(),
            namespace.to_string(),
            "-f".to_string(),
            "-".to_string(),
        ];
        self.run(&args, Some(manifest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_io_error() {
        let kubectl = Kubectl::new("kpkg-test-no-such-binary", None);
        let err = kubectl
            .get("packages", "cookieapp.0.4.5", "default", &[])
            .unwrap_err();
        assert!(matches!(err, KpkgError::Io(_)));
    }

    #[test]
    fn test_nonzero_exit_maps_to_cluster_error() {
        // `false` exits 1 with no output regardless of arguments.
        let kubectl = Kubectl::new("false", None);
        let err = kubectl
            .delete("packages", "cookieapp.0.4.5", "default")
            .unwrap_err();
        match err {
            KpkgError::Cluster { status, .. } => assert_eq!(status, 1),
            other => panic!("unexpected error: {other}"),
        }
    }
}
