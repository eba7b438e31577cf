//! Task-orchestration contract
//!
//! The four operations the redeploy workflow needs from the cluster
//! orchestrator. The workflow only ever talks to this trait, which keeps it
//! testable against an in-memory fleet.

use async_trait::async_trait;
use redeploy_core::domain::task::{DesiredStatus, Task};

use crate::OrchestratorClient;
use crate::error::Result;

/// Operations consumed by the redeploy workflow
#[async_trait]
pub trait TaskOrchestrator: Send + Sync {
    /// Identifiers of all clusters, in service order
    async fn list_clusters(&self) -> Result<Vec<String>>;

    /// Identifiers of the running tasks of a cluster, in service order
    async fn list_running_tasks(&self, cluster: &str) -> Result<Vec<String>>;

    /// Full details of the given tasks, in request order
    async fn describe_tasks(&self, cluster: &str, task_ids: &[String]) -> Result<Vec<Task>>;

    /// Stops a task, recording `reason`
    ///
    /// Scheduling a replacement is left to the orchestrator.
    async fn stop_task(&self, cluster: &str, task_id: &str, reason: &str) -> Result<()>;
}

#[async_trait]
impl TaskOrchestrator for OrchestratorClient {
    async fn list_clusters(&self) -> Result<Vec<String>> {
        self.list_cluster_arns().await
    }

    async fn list_running_tasks(&self, cluster: &str) -> Result<Vec<String>> {
        self.list_task_arns(cluster, DesiredStatus::Running).await
    }

    async fn describe_tasks(&self, cluster: &str, task_ids: &[String]) -> Result<Vec<Task>> {
        self.describe_task_details(cluster, task_ids).await
    }

    async fn stop_task(&self, cluster: &str, task_id: &str, reason: &str) -> Result<()> {
        self.stop_task_arn(cluster, task_id, reason).await
    }
}
