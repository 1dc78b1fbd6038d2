//! Cluster access used by the Kubernetes checks.
//!
//! Checks talk to the cluster through [`ClusterApi`] so they can be
//! exercised without a live API server. [`KubeCluster`] is the real
//! implementation backed by a `kube::Client`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams};
use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use tracing::debug;

use crate::error::Result;

/// The parts of a pod the checks care about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodSummary {
    pub name: String,
    pub namespace: String,
    /// Pod phase as reported by the API server (e.g. `Running`, `Pending`).
    pub phase: Option<String>,
    pub labels: BTreeMap<String, String>,
}

impl PodSummary {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase.as_deref() == Some("Running")
    }

    /// Phase for display purposes.
    #[must_use]
    pub fn phase_or_unknown(&self) -> &str {
        self.phase.as_deref().unwrap_or("Unknown")
    }
}

impl From<Pod> for PodSummary {
    fn from(pod: Pod) -> Self {
        Self {
            name: pod.metadata.name.unwrap_or_default(),
            namespace: pod.metadata.namespace.unwrap_or_default(),
            phase: pod.status.and_then(|s| s.phase),
            labels: pod.metadata.labels.unwrap_or_default(),
        }
    }
}

/// Read-only view of a Kubernetes cluster.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// The API server's reported git version (e.g. `v1.31.2`).
    async fn server_version(&self) -> std::result::Result<String, kube::Error>;

    /// List pods matching `selector` across all namespaces.
    async fn list_pods(
        &self,
        selector: &str,
    ) -> std::result::Result<Vec<PodSummary>, kube::Error>;
}

/// [`ClusterApi`] backed by a live Kubernetes API server.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    /// Connect using the local kubeconfig.
    ///
    /// With a context name the kubeconfig (honouring `KUBECONFIG`) is loaded
    /// for that context. Without one, configuration is inferred the usual
    /// way: in-cluster service account first, then the current context.
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration can be loaded or the client
    /// cannot be created.
    pub async fn connect(context: Option<&str>) -> Result<Self> {
        let config = match context {
            Some(ctx) => {
                debug!(context = %ctx, "Loading kubeconfig context");
                let options = KubeConfigOptions {
                    context: Some(ctx.to_string()),
                    ..KubeConfigOptions::default()
                };
                Config::from_kubeconfig(&options).await?
            }
            None => Config::infer().await?,
        };

        Self::from_config(config)
    }

    /// Build from an explicit client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn from_config(config: Config) -> Result<Self> {
        debug!(cluster_url = %config.cluster_url, "Creating Kubernetes client");
        let client = Client::try_from(config)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn server_version(&self) -> std::result::Result<String, kube::Error> {
        let info = self.client.apiserver_version().await?;
        Ok(info.git_version)
    }

    async fn list_pods(
        &self,
        selector: &str,
    ) -> std::result::Result<Vec<PodSummary>, kube::Error> {
        let pods: Api<Pod> = Api::all(self.client.clone());
        let lp = ListParams::default().labels(selector);

        let pod_list = pods.list(&lp).await?;
        debug!(selector = %selector, count = pod_list.items.len(), "Listed pods");

        Ok(pod_list.items.into_iter().map(PodSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::PodStatus;
    use kube::api::ObjectMeta;

    #[test]
    fn test_pod_summary_from_pod() {
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some("router-5d8f".to_string()),
                namespace: Some("fission".to_string()),
                labels: Some(BTreeMap::from([("svc".to_string(), "router".to_string())])),
                ..ObjectMeta::default()
            },
            status: Some(PodStatus {
                phase: Some("Running".to_string()),
                ..PodStatus::default()
            }),
            ..Pod::default()
        };

        let summary = PodSummary::from(pod);
        assert_eq!(summary.name, "router-5d8f");
        assert_eq!(summary.namespace, "fission");
        assert!(summary.is_running());
        assert_eq!(summary.labels.get("svc").map(String::as_str), Some("router"));
    }

    #[test]
    fn test_pod_without_status_is_not_running() {
        let summary = PodSummary::from(Pod::default());
        assert!(!summary.is_running());
        assert_eq!(summary.phase_or_unknown(), "Unknown");
        assert!(summary.name.is_empty());
    }
}
