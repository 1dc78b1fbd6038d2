//! Checks that run against the Fission control plane.

use std::sync::Arc;

use crate::control_plane::{ControlPlane, CORE_COMPONENT};
use crate::result::ResultSet;

/// Label for the server version check.
pub const FISSION_VERSION_LABEL: &str = "determine fission server version";

/// Verifies the control plane reports its version.
#[derive(Clone)]
pub struct ControlPlaneVersionCheck {
    control_plane: Arc<dyn ControlPlane>,
}

impl ControlPlaneVersionCheck {
    #[must_use]
    pub fn new(control_plane: Arc<dyn ControlPlane>) -> Self {
        Self { control_plane }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        FISSION_VERSION_LABEL
    }

    pub async fn evaluate(&self) -> ResultSet {
        let versions = self.control_plane.versions().await;
        let version = versions.server_version(CORE_COMPONENT);

        if version.is_empty() {
            return ResultSet::single("not able to determine fission server version", false);
        }

        ResultSet::single(
            format!("able to determine fission server version: {version}"),
            true,
        )
    }
}
