//! Health check definitions.
//!
//! The set of checks is closed: every check is a [`Check`] variant. Each
//! variant evaluates to a non-empty [`ResultSet`]; failures it cannot
//! recover from are reported as failing findings rather than errors.

pub mod fission;
pub mod kubernetes;

pub use fission::ControlPlaneVersionCheck;
pub use kubernetes::{ClusterVersionCheck, KubeVersion, WorkloadStatusCheck};

use crate::result::ResultSet;

/// A single diagnostic unit.
#[derive(Clone)]
pub enum Check {
    /// Kubernetes version compatibility.
    ClusterVersion(ClusterVersionCheck),
    /// Fission component pods are present and running.
    WorkloadStatus(WorkloadStatusCheck),
    /// Control plane reports its version.
    ControlPlaneVersion(ControlPlaneVersionCheck),
}

impl Check {
    /// Human-readable label used as the section header.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::ClusterVersion(c) => c.label(),
            Self::WorkloadStatus(c) => c.label(),
            Self::ControlPlaneVersion(c) => c.label(),
        }
    }

    /// Run the check and collect its findings.
    pub async fn evaluate(&self) -> ResultSet {
        match self {
            Self::ClusterVersion(c) => c.evaluate().await,
            Self::WorkloadStatus(c) => c.evaluate().await,
            Self::ControlPlaneVersion(c) => c.evaluate().await,
        }
    }
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Check").field(&self.label()).finish()
    }
}

impl From<ClusterVersionCheck> for Check {
    fn from(check: ClusterVersionCheck) -> Self {
        Self::ClusterVersion(check)
    }
}

impl From<WorkloadStatusCheck> for Check {
    fn from(check: WorkloadStatusCheck) -> Self {
        Self::WorkloadStatus(check)
    }
}

impl From<ControlPlaneVersionCheck> for Check {
    fn from(check: ControlPlaneVersionCheck) -> Self {
        Self::ControlPlaneVersion(check)
    }
}
