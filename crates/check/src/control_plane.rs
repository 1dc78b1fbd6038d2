//! Fission control plane client.
//!
//! Only version metadata is needed here. Fetching it never fails from the
//! caller's point of view: an unreachable or misbehaving server yields an
//! empty server map, and the version check reports that as a finding.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Component key for the Fission core services.
pub const CORE_COMPONENT: &str = "fission/core";

/// Default control plane address (local port-forward of the controller).
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8888";

/// Build metadata for one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMeta {
    #[serde(default, alias = "GitCommit")]
    pub git_commit: String,
    #[serde(default, alias = "BuildDate")]
    pub build_date: String,
    #[serde(default, alias = "Version")]
    pub version: String,
}

impl BuildMeta {
    /// Build metadata for this binary.
    #[must_use]
    pub fn current() -> Self {
        Self {
            git_commit: String::new(),
            build_date: String::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Client and server versions keyed by component name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versions {
    pub client: BTreeMap<String, BuildMeta>,
    pub server: BTreeMap<String, BuildMeta>,
}

impl Versions {
    /// The server version reported for `component`, or `""` if unknown.
    #[must_use]
    pub fn server_version(&self, component: &str) -> &str {
        self.server
            .get(component)
            .map_or("", |meta| meta.version.as_str())
    }
}

/// Server info document served at the controller root.
#[derive(Debug, Deserialize)]
struct ServerInfo {
    #[serde(alias = "Build")]
    build: BuildMeta,
}

/// Source of control plane version metadata.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Fetch client and server versions. Never fails; unknown server
    /// versions are simply absent.
    async fn versions(&self) -> Versions;
}

/// HTTP client for the Fission controller.
#[derive(Debug, Clone)]
pub struct ControlPlaneClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ControlPlaneClient {
    /// Create a client for the controller at `server_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(server_url: &str) -> Result<Self> {
        let base_url = Url::parse(server_url).map_err(|source| Error::InvalidServerUrl {
            url: server_url.to_string(),
            source,
        })?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("fission-check/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn fetch_server_info(&self) -> std::result::Result<ServerInfo, reqwest::Error> {
        debug!(url = %self.base_url, "Fetching control plane server info");
        self.http
            .get(self.base_url.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<ServerInfo>()
            .await
    }
}

#[async_trait]
impl ControlPlane for ControlPlaneClient {
    async fn versions(&self) -> Versions {
        let mut versions = Versions::default();
        versions
            .client
            .insert(CORE_COMPONENT.to_string(), BuildMeta::current());

        match self.fetch_server_info().await {
            Ok(info) => {
                versions.server.insert(CORE_COMPONENT.to_string(), info.build);
            }
            Err(e) => {
                warn!(url = %self.base_url, error = %e, "Failed to get server version");
            }
        }

        versions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_version_missing_component_is_empty() {
        let versions = Versions::default();
        assert_eq!(versions.server_version(CORE_COMPONENT), "");
    }

    #[test]
    fn test_server_version_lookup() {
        let mut versions = Versions::default();
        versions.server.insert(
            CORE_COMPONENT.to_string(),
            BuildMeta {
                version: "1.20.1".to_string(),
                ..BuildMeta::default()
            },
        );
        assert_eq!(versions.server_version(CORE_COMPONENT), "1.20.1");
        assert_eq!(versions.server_version("fission/other"), "");
    }

    #[test]
    fn test_server_info_accepts_either_casing() {
        let pascal: ServerInfo = serde_json::from_str(
            r#"{"Build":{"GitCommit":"abc123","BuildDate":"2024-01-02","Version":"1.20.1"}}"#,
        )
        .unwrap();
        assert_eq!(pascal.build.version, "1.20.1");
        assert_eq!(pascal.build.git_commit, "abc123");

        let camel: ServerInfo =
            serde_json::from_str(r#"{"build":{"version":"1.19.0"}}"#).unwrap();
        assert_eq!(camel.build.version, "1.19.0");
        assert!(camel.build.build_date.is_empty());
    }

    #[test]
    fn test_invalid_server_url() {
        let err = ControlPlaneClient::new("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidServerUrl { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_current_build_meta_has_version() {
        assert_eq!(BuildMeta::current().version, env!("CARGO_PKG_VERSION"));
    }
}
