//! Run configuration types.

use serde::{Deserialize, Serialize};

use crate::control_plane::DEFAULT_SERVER_URL;

/// Which fixed set of checks to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// Before Fission is installed: only cluster compatibility.
    PreInstall,
    /// After installation: control plane and component health.
    #[default]
    PostInstall,
}

impl ExecutionMode {
    /// Map the CLI's `--pre` flag to a mode.
    #[must_use]
    pub fn from_pre_flag(pre: bool) -> Self {
        if pre {
            Self::PreInstall
        } else {
            Self::PostInstall
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreInstall => write!(f, "pre-install"),
            Self::PostInstall => write!(f, "post-install"),
        }
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pre" | "pre-install" => Ok(Self::PreInstall),
            "post" | "post-install" => Ok(Self::PostInstall),
            _ => Err(anyhow::anyhow!(
                "Unknown mode: {s}. Supported: pre-install, post-install"
            )),
        }
    }
}

/// Order in which check blocks are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderOrder {
    /// Each block is written as soon as its check finishes.
    #[default]
    Completion,
    /// Blocks are held until every check finishes, then written in catalog order.
    Catalog,
}

impl std::fmt::Display for RenderOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completion => write!(f, "completion"),
            Self::Catalog => write!(f, "catalog"),
        }
    }
}

impl std::str::FromStr for RenderOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completion" => Ok(Self::Completion),
            "catalog" => Ok(Self::Catalog),
            _ => Err(anyhow::anyhow!(
                "Unknown order: {s}. Supported: completion, catalog"
            )),
        }
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Per-check text blocks.
    #[default]
    Text,
    /// A single JSON document written after all checks finish.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!(
                "Unknown output format: {s}. Supported: text, json"
            )),
        }
    }
}

/// Resolved settings for one check run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Which checks to run.
    pub mode: ExecutionMode,
    /// Kubeconfig context; the current context is used when unset.
    pub kube_context: Option<String>,
    /// Fission controller address.
    pub server_url: String,
    /// Block ordering for text output.
    pub order: RenderOrder,
    /// Output format.
    pub format: OutputFormat,
    /// Colour pass/fail glyphs.
    pub color: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            kube_context: None,
            server_url: DEFAULT_SERVER_URL.to_string(),
            order: RenderOrder::default(),
            format: OutputFormat::default(),
            color: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_pre_flag() {
        assert_eq!(ExecutionMode::from_pre_flag(true), ExecutionMode::PreInstall);
        assert_eq!(ExecutionMode::from_pre_flag(false), ExecutionMode::PostInstall);
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("pre".parse::<ExecutionMode>().unwrap(), ExecutionMode::PreInstall);
        assert_eq!(
            "Post-Install".parse::<ExecutionMode>().unwrap(),
            ExecutionMode::PostInstall
        );
        assert!("both".parse::<ExecutionMode>().is_err());
        assert_eq!(ExecutionMode::PreInstall.to_string(), "pre-install");
    }

    #[test]
    fn test_order_and_format_parse() {
        assert_eq!("catalog".parse::<RenderOrder>().unwrap(), RenderOrder::Catalog);
        assert!("random".parse::<RenderOrder>().is_err());
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = CheckConfig::default();
        assert_eq!(config.mode, ExecutionMode::PostInstall);
        assert_eq!(config.order, RenderOrder::Completion);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert!(config.kube_context.is_none());
    }
}
