//! Error types for check setup.
//!
//! Only failures that prevent a run from starting surface here. Problems
//! found while a check is evaluating become failing findings instead.

use thiserror::Error;

/// Errors that abort a check run before any check executes.
#[derive(Debug, Error)]
pub enum Error {
    /// The kubeconfig could not be loaded for the requested context.
    #[error("Failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    /// No usable cluster configuration could be inferred.
    #[error("Failed to infer cluster configuration: {0}")]
    InferConfig(#[from] kube::config::InferConfigError),

    /// The Kubernetes client could not be created.
    #[error("Failed to create Kubernetes client: {0}")]
    Client(#[from] kube::Error),

    /// The control plane address is not a valid URL.
    #[error("Invalid control plane URL '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client for the control plane could not be built.
    #[error("Failed to create control plane client: {0}")]
    Http(#[from] reqwest::Error),

    /// The run report could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;
