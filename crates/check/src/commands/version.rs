//! Version command - show client and server versions.

use anyhow::{Context, Result};
use clap::Args;

use fission_check::control_plane::{ControlPlane, DEFAULT_SERVER_URL};
use fission_check::{Connector, KubeConnector};

/// Show client and server versions.
#[derive(Args)]
pub struct VersionCommand {
    /// Fission controller address.
    #[arg(long, env = "FISSION_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,
}

impl VersionCommand {
    /// Run the version command.
    ///
    /// # Errors
    ///
    /// Returns an error if the control plane client cannot be created.
    pub async fn run(&self) -> Result<()> {
        let connector = KubeConnector::new(None, self.server.clone());
        let control_plane = connector
            .control_plane()
            .await
            .context("Failed to create control plane client")?;

        let versions = control_plane.versions().await;
        print!("{}", serde_yaml::to_string(&versions)?);
        Ok(())
    }
}
