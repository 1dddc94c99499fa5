//! # Helm — Release Management Wrapper
//!
//! Runs `helm <cmd> [HELM_OPTS] <package_path>` for the install/upgrade
//! flows. The package path is an extracted archive materialized by the
//! extract pipeline; helm's own options pass through untouched.

use std::process::Command;

use kpkg_core::{KpkgError, Result};

/// A helm invocation wrapper.
pub struct Helm {
    binary: String,
}

impl Default for Helm {
    fn default() -> Self {
        Self {
            binary: "helm".to_string(),
        }
    }
}

impl Helm {
    /// Run `helm <cmd> [helm_opts...] <package_path>` and return stdout.
    pub fn action(&self, cmd: &str, package_path: &str, helm_opts: &[String]) -> Result<String> {
        let mut command = Command::new(&self.binary);
        command.arg(cmd);
        command.args(helm_opts);
        command.arg(package_path);
        tracing::debug!(binary = %self.binary, cmd, package_path, "invoking helm");

        let output = command.output()?;
        if !output.status.success() {
            return Err(KpkgError::Cluster {
                status: output.status.code().unwrap_or(1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_io_error() {
        let helm = Helm {
            binary: "kpkg-test-no-such-binary".to_string(),
        };
        assert!(matches!(
            helm.action("install", "/tmp/app.tar.gz", &[]),
            Err(KpkgError::Io(_))
        ));
    }

    #[test]
    fn test_opts_precede_package_path() {
        // `echo` prints its arguments, letting us observe the ordering.
        let helm = Helm {
            binary: "echo".to_string(),
        };
        let out = helm
            .action("install", "/tmp/app.tar.gz", &["--set".to_string(), "a=b".to_string()])
            .unwrap();
        assert_eq!(out.trim(), "install --set a=b /tmp/app.tar.gz");
    }
}
