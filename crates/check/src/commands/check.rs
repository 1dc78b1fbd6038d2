//! Check command - run the health checks for one mode.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use fission_check::control_plane::DEFAULT_SERVER_URL;
use fission_check::{
    CheckConfig, ExecutionMode, Orchestrator, OutputFormat, OutputSink, RenderOrder,
};

/// Run Fission health checks.
#[derive(Args)]
pub struct CheckCommand {
    /// Run pre-install checks only (cluster compatibility).
    #[arg(long, default_value = "false")]
    pre: bool,

    /// Kubeconfig context to use (defaults to the current context).
    #[arg(long, env = "FISSION_KUBE_CONTEXT")]
    kube_context: Option<String>,

    /// Fission controller address.
    #[arg(long, env = "FISSION_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Order of check blocks in text output (completion, catalog).
    #[arg(long, value_name = "ORDER", default_value = "completion")]
    order: RenderOrder,

    /// Output format (text, json).
    #[arg(short, long, value_name = "FORMAT", default_value = "text")]
    output: OutputFormat,

    /// Disable coloured output.
    #[arg(long, default_value = "false")]
    no_color: bool,
}

impl CheckCommand {
    fn config(&self) -> CheckConfig {
        CheckConfig {
            mode: ExecutionMode::from_pre_flag(self.pre),
            kube_context: self.kube_context.clone(),
            server_url: self.server.clone(),
            order: self.order,
            format: self.output,
            color: !self.no_color && std::io::stdout().is_terminal(),
        }
    }

    /// Run the check command.
    ///
    /// Failing checks are reported but do not make the command fail.
    ///
    /// # Errors
    ///
    /// Returns an error if the cluster or control plane cannot be reached
    /// at all.
    pub async fn run(&self) -> Result<()> {
        let config = self.config();
        info!(
            mode = %config.mode,
            context = config.kube_context.as_deref().unwrap_or("<current>"),
            "Starting Fission checks"
        );

        let orchestrator = Orchestrator::from_config(&config, OutputSink::stdout());
        let report = orchestrator
            .run(config.mode)
            .await
            .context("Failed to start checks")?;

        if !report.all_passed() {
            info!(failed = report.failed_count(), "Some checks reported problems");
        }

        Ok(())
    }
}
