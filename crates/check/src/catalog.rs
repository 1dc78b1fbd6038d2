//! Fixed check membership per execution mode.

use tracing::debug;

use crate::checks::{Check, ClusterVersionCheck, ControlPlaneVersionCheck, WorkloadStatusCheck};
use crate::config::ExecutionMode;
use crate::connector::Connector;
use crate::error::Result;

/// Build the checks for `mode`, in catalog order.
///
/// The cluster handle is acquired for every mode; the control plane handle
/// only for post-install runs.
///
/// # Errors
///
/// Returns an error if a required handle cannot be acquired.
pub async fn select(mode: ExecutionMode, connector: &dyn Connector) -> Result<Vec<Check>> {
    let cluster = connector.cluster().await?;

    let checks: Vec<Check> = match mode {
        ExecutionMode::PreInstall => vec![ClusterVersionCheck::new(cluster).into()],
        ExecutionMode::PostInstall => {
            let control_plane = connector.control_plane().await?;
            vec![
                ControlPlaneVersionCheck::new(control_plane).into(),
                WorkloadStatusCheck::new(cluster).into(),
            ]
        }
    };

    debug!(%mode, count = checks.len(), "Selected checks");
    Ok(checks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ClusterApi, PodSummary};
    use crate::control_plane::{ControlPlane, Versions};
    use crate::error::Error;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct EmptyCluster;

    #[async_trait]
    impl ClusterApi for EmptyCluster {
        async fn server_version(&self) -> std::result::Result<String, kube::Error> {
            Ok("v1.31.0".to_string())
        }

        async fn list_pods(
            &self,
            _selector: &str,
        ) -> std::result::Result<Vec<PodSummary>, kube::Error> {
            Ok(vec![])
        }
    }

    struct EmptyControlPlane;

    #[async_trait]
    impl ControlPlane for EmptyControlPlane {
        async fn versions(&self) -> Versions {
            Versions::default()
        }
    }

    #[derive(Default)]
    struct CountingConnector {
        control_plane_calls: AtomicUsize,
        fail_cluster: bool,
    }

    #[async_trait]
    impl Connector for CountingConnector {
        async fn cluster(&self) -> Result<Arc<dyn ClusterApi>> {
            if self.fail_cluster {
                return Err(Error::InvalidServerUrl {
                    url: "cluster".to_string(),
                    source: url::ParseError::EmptyHost,
                });
            }
            Ok(Arc::new(EmptyCluster))
        }

        async fn control_plane(&self) -> Result<Arc<dyn ControlPlane>> {
            self.control_plane_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(EmptyControlPlane))
        }
    }

    fn labels(checks: &[Check]) -> Vec<&str> {
        checks.iter().map(Check::label).collect()
    }

    #[tokio::test]
    async fn test_pre_install_selects_version_check_only() {
        let connector = CountingConnector::default();
        let checks = select(ExecutionMode::PreInstall, &connector).await.unwrap();

        assert_eq!(labels(&checks), vec!["kubernetes version compatibility"]);
        assert_eq!(connector.control_plane_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_post_install_selects_in_catalog_order() {
        let connector = CountingConnector::default();
        let checks = select(ExecutionMode::PostInstall, &connector).await.unwrap();

        assert_eq!(
            labels(&checks),
            vec!["determine fission server version", "determine pods are running"]
        );
        assert!(matches!(checks[0], Check::ControlPlaneVersion(_)));
        assert!(matches!(checks[1], Check::WorkloadStatus(_)));
    }

    #[tokio::test]
    async fn test_cluster_failure_propagates() {
        let connector = CountingConnector {
            fail_cluster: true,
            ..CountingConnector::default()
        };
        assert!(select(ExecutionMode::PostInstall, &connector).await.is_err());
        assert_eq!(connector.control_plane_calls.load(Ordering::SeqCst), 0);
    }
}
