//! Acquisition of the cluster and control plane handles.
//!
//! A failure here is a setup failure: it aborts the whole run before any
//! check executes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::cluster::{ClusterApi, KubeCluster};
use crate::config::CheckConfig;
use crate::control_plane::{ControlPlane, ControlPlaneClient};
use crate::error::Result;

/// Provides the handles checks run against.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect to the Kubernetes cluster.
    async fn cluster(&self) -> Result<Arc<dyn ClusterApi>>;

    /// Create a client for the Fission control plane.
    async fn control_plane(&self) -> Result<Arc<dyn ControlPlane>>;
}

/// Connects to a real cluster through the local kubeconfig.
#[derive(Debug, Clone)]
pub struct KubeConnector {
    kube_context: Option<String>,
    server_url: String,
}

impl KubeConnector {
    #[must_use]
    pub fn new(kube_context: Option<String>, server_url: impl Into<String>) -> Self {
        Self {
            kube_context,
            server_url: server_url.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &CheckConfig) -> Self {
        Self::new(config.kube_context.clone(), config.server_url.clone())
    }
}

#[async_trait]
impl Connector for KubeConnector {
    async fn cluster(&self) -> Result<Arc<dyn ClusterApi>> {
        let cluster = KubeCluster::connect(self.kube_context.as_deref()).await?;
        info!(
            context = self.kube_context.as_deref().unwrap_or("<current>"),
            "Connected to Kubernetes cluster"
        );
        Ok(Arc::new(cluster))
    }

    async fn control_plane(&self) -> Result<Arc<dyn ControlPlane>> {
        let client = ControlPlaneClient::new(&self.server_url)?;
        info!(url = %client.base_url(), "Using Fission control plane");
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_invalid_server_url_is_setup_failure() {
        let connector = KubeConnector::new(None, "::not-a-url::");
        let err = connector.control_plane().await.err().unwrap();
        assert!(matches!(err, Error::InvalidServerUrl { .. }));
    }

    #[tokio::test]
    async fn test_valid_server_url() {
        let connector = KubeConnector::new(None, "http://fission.example:8888");
        assert!(connector.control_plane().await.is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = CheckConfig {
            kube_context: Some("staging".to_string()),
            ..CheckConfig::default()
        };
        let connector = KubeConnector::from_config(&config);
        assert_eq!(connector.kube_context.as_deref(), Some("staging"));
        assert_eq!(connector.server_url, config.server_url);
    }
}
