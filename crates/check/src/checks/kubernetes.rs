//! Checks that run against the Kubernetes API.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use crate::cluster::ClusterApi;
use crate::result::ResultSet;

/// Oldest Kubernetes version Fission supports (v1.9).
pub const KUBERNETES_SUPPORTED_VERSION: KubeVersion = KubeVersion {
    major: 1,
    minor: 9,
    patch: 0,
};

/// Label for the version compatibility check.
pub const KUBERNETES_VERSION_LABEL: &str = "kubernetes version compatibility";

/// Label for the pod status check.
pub const KUBERNETES_POD_STATUS_LABEL: &str = "determine pods are running";

/// Pod label that carries a Fission component's role.
pub const ROLE_LABEL_KEY: &str = "svc";

/// Roles every Fission installation is expected to run.
pub const EXPECTED_ROLES: &[&str] = &[
    "buildermgr",
    "controller",
    "executor",
    "influxdb",
    "kubewatcher",
    "logger",
    "mqtrigger",
    "nats-streaming",
    "router",
    "storagesvc",
    "timer",
];

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(\d+)\.(\d+)(?:\.(\d+))?(?:[-+].*)?$").expect("version regex is valid")
});

/// A Kubernetes version reduced to its numeric components.
///
/// Pre-release and build suffixes (`-gke.1`, `+k3s1`) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct KubeVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl KubeVersion {
    /// Parse a version such as `v1.31.2`, `1.9` or `v1.28.3-gke.1`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(s.trim())?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        let patch = match caps.get(3) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        Some(Self {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for KubeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Verifies the cluster runs a Kubernetes version Fission supports.
#[derive(Clone)]
pub struct ClusterVersionCheck {
    cluster: Arc<dyn ClusterApi>,
    minimum: KubeVersion,
}

impl ClusterVersionCheck {
    #[must_use]
    pub fn new(cluster: Arc<dyn ClusterApi>) -> Self {
        Self {
            cluster,
            minimum: KUBERNETES_SUPPORTED_VERSION,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        KUBERNETES_VERSION_LABEL
    }

    pub async fn evaluate(&self) -> ResultSet {
        let reported = match self.cluster.server_version().await {
            Ok(v) => v,
            Err(e) => return ResultSet::single(e.to_string(), false),
        };

        let Some(version) = KubeVersion::parse(&reported) else {
            return ResultSet::single(
                format!("kubernetes version '{reported}' is incompatible (unable to parse)"),
                false,
            );
        };

        debug!(reported = %reported, minimum = %self.minimum, "Comparing Kubernetes versions");

        if version < self.minimum {
            ResultSet::single(
                format!(
                    "kubernetes version {reported} is incompatible (minimum supported {})",
                    self.minimum
                ),
                false,
            )
        } else {
            ResultSet::single(format!("kubernetes version {reported} is compatible"), true)
        }
    }
}

/// Verifies every Fission component has a running pod.
#[derive(Clone)]
pub struct WorkloadStatusCheck {
    cluster: Arc<dyn ClusterApi>,
    roles: Vec<String>,
}

impl WorkloadStatusCheck {
    /// Check the standard set of Fission roles.
    #[must_use]
    pub fn new(cluster: Arc<dyn ClusterApi>) -> Self {
        Self::with_roles(cluster, EXPECTED_ROLES.iter().map(|r| (*r).to_string()))
    }

    /// Check a custom set of roles, reported in the given order.
    #[must_use]
    pub fn with_roles<I, S>(cluster: Arc<dyn ClusterApi>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cluster,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        KUBERNETES_POD_STATUS_LABEL
    }

    /// Label selector matching any expected role, e.g. `svc in (router, timer)`.
    #[must_use]
    pub fn selector(&self) -> String {
        format!("{ROLE_LABEL_KEY} in ({})", self.roles.join(", "))
    }

    pub async fn evaluate(&self) -> ResultSet {
        if self.roles.is_empty() {
            return ResultSet::single("no roles to check", false);
        }

        let pods = match self.cluster.list_pods(&self.selector()).await {
            Ok(pods) => pods,
            Err(e) => return ResultSet::single(e.to_string(), false),
        };

        let mut results = ResultSet::new();
        let mut seen = BTreeSet::new();

        for pod in &pods {
            if pod.is_running() {
                results.push(format!("pod {} is running", pod.name), true);
            } else {
                results.push(
                    format!(
                        "pod {} is not running (phase: {})",
                        pod.name,
                        pod.phase_or_unknown()
                    ),
                    false,
                );
            }

            if let Some(role) = pod.labels.get(ROLE_LABEL_KEY) {
                seen.insert(role.as_str());
            }
        }

        for role in &self.roles {
            if !seen.contains(role.as_str()) {
                results.push(format!("no process found for role {role}"), false);
            }
        }

        results
    }
}
