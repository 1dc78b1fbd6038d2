//! Fission cluster health checks.
//!
//! Runs a fixed set of independent checks against a Kubernetes cluster and
//! the Fission control plane, concurrently, and reports pass/fail findings
//! per check.
//!
//! # Example
//!
//! ```ignore
//! use fission_check::{CheckConfig, ExecutionMode, Orchestrator, OutputSink};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = CheckConfig::default();
//!     let orchestrator = Orchestrator::from_config(&config, OutputSink::stdout());
//!     let report = orchestrator.run(ExecutionMode::PostInstall).await?;
//!     println!("{} failing findings", report.failed_count());
//!     Ok(())
//! }
//! ```

// Allow product names without backticks in doc comments
#![allow(clippy::doc_markdown)]

pub mod catalog;
pub mod checks;
pub mod cluster;
pub mod config;
pub mod connector;
pub mod control_plane;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod result;

// Re-export commonly used types at the crate root
pub use checks::Check;
pub use config::{CheckConfig, ExecutionMode, OutputFormat, RenderOrder};
pub use connector::{Connector, KubeConnector};
pub use error::{Error, Result};
pub use orchestrator::{CheckReport, Orchestrator, RunReport};
pub use output::{OutputSink, SharedBuffer, Style};
pub use result::{Finding, ResultSet};
