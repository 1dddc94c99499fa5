//! # kpkg-cluster — Cluster Collaborator Subprocesses
//!
//! Implements the model layer's [`ClusterOps`](kpkg_model::ClusterOps)
//! seam by invoking the external `kubectl` binary, plus a thin `helm`
//! wrapper for install/upgrade flows.
//!
//! All invocations are blocking with no timeout or retry; conflicts and
//! failures are reported to the caller, never resolved here.

pub mod helm;
pub mod kubectl;

pub use helm::Helm;
pub use kubectl::Kubectl;
