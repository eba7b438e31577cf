//! Redeploy service
//!
//! Runs one execution of the fleet workflow per accepted push event. Each
//! execution gets its own identifier and tracing span so the log lines of
//! concurrent cluster branches can be told apart.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use redeploy_client::TaskOrchestrator;
use redeploy_core::domain::event::PushEvent;
use redeploy_engine::StateMachine;
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::config::Config;
use crate::context::FleetContext;
use crate::execution::RedeployReport;
use crate::workflow::fleet_workflow;

/// Service trait for reacting to image pushes
#[async_trait]
pub trait RedeployService: Send + Sync {
    /// Runs the restart workflow for a push event
    ///
    /// # Returns
    /// The report of a completed execution. A failed cluster branch fails
    /// the whole execution and is returned as an error.
    async fn handle(&self, event: PushEvent) -> Result<RedeployReport>;
}

/// Standard implementation of RedeployService
pub struct StandardRedeployService {
    machine: StateMachine<FleetContext>,
}

impl StandardRedeployService {
    /// Builds the workflow definition once for every execution of this process
    pub fn new(orchestrator: Arc<dyn TaskOrchestrator>, config: &Config) -> Result<Self> {
        let machine = fleet_workflow(
            orchestrator,
            config.max_concurrency,
            config.stop_reason.clone(),
        )
        .context("Invalid workflow definition")?;

        Ok(Self { machine })
    }
}

#[async_trait]
impl RedeployService for StandardRedeployService {
    async fn handle(&self, event: PushEvent) -> Result<RedeployReport> {
        let execution_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = info_span!(
            "execution",
            id = %execution_id,
            machine = self.machine.name(),
            repository = %event.repository_name,
        );

        async move {
            info!(
                "Starting execution for push to {} (tag: {})",
                event.repository_name,
                event.image_tag.as_deref().unwrap_or("<none>")
            );

            let completed = self
                .machine
                .run(FleetContext::new(event))
                .await
                .with_context(|| format!("Execution {} failed", execution_id))?;

            let report = RedeployReport::new(execution_id, started_at, &completed);
            for outcome in &report.outcomes {
                debug!(cluster = outcome.cluster(), "{:?}", outcome);
            }
            info!(
                "Execution completed: {} of {} cluster(s) restarted",
                report.restarted(),
                report.outcomes.len()
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::{ClusterOutcome, SkipReason};
    use crate::testing::FakeFleet;
    use redeploy_engine::WorkflowError;

    const MY_REPO_IMAGE: &str = "123.dkr.ecr.example.com/my-ecr-repo:v2";

    #[tokio::test]
    async fn test_handle_reports_outcomes() {
        let fleet = Arc::new(
            FakeFleet::new()
                .cluster("prod", &[("task-1", &[MY_REPO_IMAGE])])
                .cluster("staging", &[]),
        );
        let service = StandardRedeployService::new(fleet.clone(), &Config::default()).unwrap();

        let report = service.handle(PushEvent::push("my-ecr-repo")).await.unwrap();

        assert_eq!(report.repository, "my-ecr-repo");
        assert!(report.completed_at >= report.started_at);
        assert_eq!(
            report.outcomes,
            vec![
                ClusterOutcome::Restarted {
                    cluster: "prod".to_string(),
                    task: "task-1".to_string()
                },
                ClusterOutcome::Skipped {
                    cluster: "staging".to_string(),
                    reason: SkipReason::NoRunningTasks
                },
            ]
        );
        assert_eq!(fleet.stops().len(), 1);
    }

    #[tokio::test]
    async fn test_each_execution_gets_its_own_id() {
        let fleet = Arc::new(FakeFleet::new());
        let service = StandardRedeployService::new(fleet, &Config::default()).unwrap();

        let first = service.handle(PushEvent::push("my-ecr-repo")).await.unwrap();
        let second = service.handle(PushEvent::push("my-ecr-repo")).await.unwrap();

        assert_ne!(first.execution_id, second.execution_id);
    }

    #[tokio::test]
    async fn test_handle_propagates_branch_failure() {
        let fleet = Arc::new(
            FakeFleet::new()
                .cluster("prod", &[("task-1", &[MY_REPO_IMAGE])])
                .failing("StopTask", "prod"),
        );
        let service = StandardRedeployService::new(fleet, &Config::default()).unwrap();

        let error = service
            .handle(PushEvent::push("my-ecr-repo"))
            .await
            .unwrap_err();

        let workflow_error = error.downcast_ref::<WorkflowError>().unwrap();
        assert_eq!(workflow_error.step(), Some("StopTask"));
    }

    #[test]
    fn test_new_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.max_concurrency = 0;

        assert!(StandardRedeployService::new(Arc::new(FakeFleet::new()), &config).is_err());
    }
}
