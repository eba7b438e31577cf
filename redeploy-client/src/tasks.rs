//! Task-related API operations

use redeploy_core::domain::task::{DesiredStatus, Task};
use redeploy_core::dto::orchestrator::{
    DESCRIBE_TASKS_LIMIT, DescribeTasksRequest, DescribeTasksResponse, ListTasksRequest,
    ListTasksResponse, StopTaskRequest, StopTaskResponse,
};
use tracing::{debug, warn};

use crate::OrchestratorClient;
use crate::error::{ClientError, Result};

impl OrchestratorClient {
    // =============================================================================
    // Task Query
    // =============================================================================

    /// List the identifiers of tasks in a cluster with the given desired status
    ///
    /// # Arguments
    /// * `cluster` - Cluster identifier
    /// * `desired_status` - Status filter (the workflow uses `Running`)
    pub async fn list_task_arns(
        &self,
        cluster: &str,
        desired_status: DesiredStatus,
    ) -> Result<Vec<String>> {
        let mut tasks = Vec::new();
        let mut next_token = None;

        loop {
            let request = ListTasksRequest {
                cluster: cluster.to_string(),
                desired_status,
                next_token,
            };
            let page: ListTasksResponse = self.call("ListTasks", &request).await?;

            debug!(
                "ListTasks returned {} task(s) for cluster {}",
                page.task_arns.len(),
                cluster
            );
            tasks.extend(page.task_arns);

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => return Ok(tasks),
            }
        }
    }

    /// Describe tasks of a cluster
    ///
    /// Identifiers are sent in chunks the service accepts; the returned tasks
    /// keep request order. Per-task failures reported by the service are
    /// logged and the affected tasks are left out.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidRequest`] if `task_arns` is empty.
    pub async fn describe_task_details(
        &self,
        cluster: &str,
        task_arns: &[String],
    ) -> Result<Vec<Task>> {
        if task_arns.is_empty() {
            return Err(ClientError::InvalidRequest(
                "DescribeTasks needs at least one task".to_string(),
            ));
        }

        let mut tasks = Vec::with_capacity(task_arns.len());

        for chunk in task_arns.chunks(DESCRIBE_TASKS_LIMIT) {
            let request = DescribeTasksRequest {
                cluster: cluster.to_string(),
                tasks: chunk.to_vec(),
            };
            let response: DescribeTasksResponse = self.call("DescribeTasks", &request).await?;

            for failure in &response.failures {
                warn!(
                    "DescribeTasks failure in cluster {}: arn={:?} reason={:?}",
                    cluster, failure.arn, failure.reason
                );
            }

            tasks.extend(ordered_tasks(chunk, response, cluster));
        }

        Ok(tasks)
    }

    // =============================================================================
    // Task Lifecycle
    // =============================================================================

    /// Stop a running task
    ///
    /// # Arguments
    /// * `cluster` - Cluster the task runs in
    /// * `task_arn` - Task to stop
    /// * `reason` - Human-readable reason recorded with the stop
    pub async fn stop_task_arn(&self, cluster: &str, task_arn: &str, reason: &str) -> Result<()> {
        let request = StopTaskRequest {
            cluster: cluster.to_string(),
            task: task_arn.to_string(),
            reason: reason.to_string(),
        };
        let response: StopTaskResponse = self.call("StopTask", &request).await?;

        debug!(
            "StopTask acknowledged for {} (last status {:?})",
            task_arn,
            response.task.and_then(|t| t.last_status)
        );

        Ok(())
    }
}

/// Puts described tasks back into the order they were requested in
fn ordered_tasks(requested: &[String], response: DescribeTasksResponse, cluster: &str) -> Vec<Task> {
    let mut described: Vec<Option<Task>> = response
        .tasks
        .into_iter()
        .map(|t| Some(t.into_task(cluster)))
        .collect();

    requested
        .iter()
        .filter_map(|arn| {
            described
                .iter_mut()
                .find(|slot| matches!(slot, Some(task) if &task.id == arn))
                .and_then(Option::take)
        })
        .collect()
}
