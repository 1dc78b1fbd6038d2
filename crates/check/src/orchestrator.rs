//! Concurrent check execution.
//!
//! The orchestrator resolves the catalog for a mode, runs every check on
//! its own task and waits for all of them before returning. Text blocks
//! are written to the shared [`OutputSink`] either as each check finishes
//! or, with [`RenderOrder::Catalog`], in catalog order after the join.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::catalog;
use crate::config::{CheckConfig, ExecutionMode, OutputFormat, RenderOrder};
use crate::connector::{Connector, KubeConnector};
use crate::error::Result;
use crate::output::{OutputSink, Style};
use crate::result::ResultSet;

/// Findings for one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub label: String,
    pub findings: ResultSet,
}

/// Outcome of a whole run, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub mode: ExecutionMode,
    pub checks: Vec<CheckReport>,
}

impl RunReport {
    /// True when every finding of every check passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.findings.all_passed())
    }

    /// Number of failing findings across all checks.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.checks.iter().map(|c| c.findings.failed_count()).sum()
    }

    /// Pretty-printed JSON form of the report.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs the checks for a mode and reports their findings.
pub struct Orchestrator {
    connector: Arc<dyn Connector>,
    sink: OutputSink,
    order: RenderOrder,
    format: OutputFormat,
    style: Style,
}

impl Orchestrator {
    #[must_use]
    pub fn new(connector: Arc<dyn Connector>, sink: OutputSink) -> Self {
        Self {
            connector,
            sink,
            order: RenderOrder::default(),
            format: OutputFormat::default(),
            style: Style::default(),
        }
    }

    /// Orchestrator for a real cluster, configured from `config`.
    #[must_use]
    pub fn from_config(config: &CheckConfig, sink: OutputSink) -> Self {
        Self::new(Arc::new(KubeConnector::from_config(config)), sink)
            .render_order(config.order)
            .format(config.format)
            .style(Style {
                color: config.color,
            })
    }

    #[must_use]
    pub fn render_order(mut self, order: RenderOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Run every check for `mode` concurrently and wait for all of them.
    ///
    /// Failing findings are not errors; they are written to the sink and
    /// returned in the report.
    ///
    /// # Errors
    ///
    /// Returns an error only if the cluster or control plane handle cannot
    /// be acquired. Nothing is written in that case.
    pub async fn run(&self, mode: ExecutionMode) -> Result<RunReport> {
        let checks = catalog::select(mode, self.connector.as_ref()).await?;
        info!(%mode, checks = checks.len(), "Running checks");

        let write_on_completion =
            self.format == OutputFormat::Text && self.order == RenderOrder::Completion;

        let (labels, tasks): (Vec<String>, Vec<_>) = checks
            .into_iter()
            .map(|check| {
                let label = check.label().to_string();
                let sink = self.sink.clone();
                let style = self.style;

                let task = tokio::spawn(async move {
                    let started = Instant::now();
                    let results = check.evaluate().await;
                    let elapsed_ms =
                        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                    debug!(
                        check = check.label(),
                        findings = results.len(),
                        failed = results.failed_count(),
                        elapsed_ms,
                        "Check finished"
                    );

                    if write_on_completion {
                        write_block(&sink, check.label(), &results, style);
                    }
                    results
                });

                (label, task)
            })
            .unzip();

        let outcomes = join_all(tasks).await;

        let mut reports = Vec::with_capacity(labels.len());
        for (label, outcome) in labels.into_iter().zip(outcomes) {
            let findings = match outcome {
                Ok(results) => results,
                Err(e) => {
                    error!(check = %label, error = %e, "Check task did not complete");
                    let description = if e.is_panic() {
                        format!("check panicked: {e}")
                    } else {
                        format!("check did not complete: {e}")
                    };
                    let results = ResultSet::single(description, false);
                    if write_on_completion {
                        write_block(&self.sink, &label, &results, self.style);
                    }
                    results
                }
            };
            reports.push(CheckReport { label, findings });
        }

        let report = RunReport {
            mode,
            checks: reports,
        };

        match self.format {
            OutputFormat::Json => self.write_json(&report),
            OutputFormat::Text if self.order == RenderOrder::Catalog => {
                for check in &report.checks {
                    write_block(&self.sink, &check.label, &check.findings, self.style);
                }
            }
            OutputFormat::Text => {}
        }

        info!(
            %mode,
            checks = report.checks.len(),
            failed = report.failed_count(),
            "Checks complete"
        );

        Ok(report)
    }

    fn write_json(&self, report: &RunReport) {
        match report.to_json() {
            Ok(json) => {
                if let Err(e) = self.sink.write_str(&format!("{json}\n")) {
                    error!(error = %e, "Failed to write report");
                }
            }
            Err(e) => error!(error = %e, "Failed to serialize report"),
        }
    }
}

fn write_block(sink: &OutputSink, label: &str, results: &ResultSet, style: Style) {
    if let Err(e) = sink.write_block(label, results, style) {
        error!(check = %label, error = %e, "Failed to write check output");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ClusterApi, PodSummary};
    use crate::control_plane::ControlPlane;
    use crate::output::SharedBuffer;
    use async_trait::async_trait;

    struct PanickingCluster;

    #[async_trait]
    impl ClusterApi for PanickingCluster {
        async fn server_version(&self) -> std::result::Result<String, kube::Error> {
            panic!("version endpoint exploded");
        }

        async fn list_pods(
            &self,
            _selector: &str,
        ) -> std::result::Result<Vec<PodSummary>, kube::Error> {
            Ok(vec![])
        }
    }

    struct PanickingConnector;

    #[async_trait]
    impl Connector for PanickingConnector {
        async fn cluster(&self) -> Result<Arc<dyn ClusterApi>> {
            Ok(Arc::new(PanickingCluster))
        }

        async fn control_plane(&self) -> Result<Arc<dyn ControlPlane>> {
            unreachable!("pre-install runs never need the control plane")
        }
    }

    #[tokio::test]
    async fn test_panicking_check_becomes_failing_finding() {
        let buffer = SharedBuffer::new();
        let orchestrator =
            Orchestrator::new(Arc::new(PanickingConnector), OutputSink::new(buffer.clone()));

        let report = orchestrator.run(ExecutionMode::PreInstall).await.unwrap();

        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].label, "kubernetes version compatibility");
        assert!(!report.all_passed());
        assert_eq!(report.failed_count(), 1);

        let output = buffer.contents();
        assert!(output.starts_with("\n[kubernetes version compatibility]\n"));
        assert!(output.contains("✗ check panicked: "));
    }

    #[test]
    fn test_report_json_shape() {
        let report = RunReport {
            mode: ExecutionMode::PreInstall,
            checks: vec![CheckReport {
                label: "kubernetes version compatibility".to_string(),
                findings: ResultSet::single("kubernetes version v1.31.0 is compatible", true),
            }],
        };

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["mode"], "pre-install");
        assert_eq!(value["checks"][0]["label"], "kubernetes version compatibility");
        assert_eq!(value["checks"][0]["findings"][0]["passed"], true);
        assert!(report.all_passed());
    }
}
