//! In-memory fleet for workflow tests
//!
//! Implements [`TaskOrchestrator`] over a fixed set of clusters and records
//! every call, so tests can assert on exactly which tasks were stopped.

use async_trait::async_trait;
use redeploy_client::{ClientError, Result, TaskOrchestrator};
use redeploy_core::domain::task::{Container, Task};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopCall {
    pub cluster: String,
    pub task: String,
    pub reason: String,
}

#[derive(Default)]
pub struct FakeFleet {
    clusters: Vec<(String, Vec<Task>)>,
    failures: Vec<(&'static str, String)>,
    undescribable: Vec<String>,
    calls: Mutex<Vec<String>>,
    stops: Mutex<Vec<StopCall>>,
}

impl FakeFleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cluster whose running tasks each have the given container images
    pub fn cluster(mut self, id: &str, tasks: &[(&str, &[&str])]) -> Self {
        let tasks = tasks
            .iter()
            .map(|(task_id, images)| Task {
                id: task_id.to_string(),
                cluster_id: id.to_string(),
                containers: images
                    .iter()
                    .enumerate()
                    .map(|(i, image)| Container {
                        name: format!("container-{}", i),
                        image: image.to_string(),
                    })
                    .collect(),
                last_status: Some("RUNNING".to_string()),
            })
            .collect();
        self.clusters.push((id.to_string(), tasks));
        self
    }

    /// Makes `operation` fail for `cluster` ("*" for the cluster-less ListClusters)
    pub fn failing(mut self, operation: &'static str, cluster: &str) -> Self {
        self.failures.push((operation, cluster.to_string()));
        self
    }

    /// Leaves `task` out of describe results, as when it stopped after being listed
    pub fn undescribable(mut self, task: &str) -> Self {
        self.undescribable.push(task.to_string());
        self
    }

    pub fn stops(&self) -> Vec<StopCall> {
        self.stops.lock().unwrap().clone()
    }

    /// Calls in the order they were made, as "Operation:cluster"
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, cluster: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", operation, cluster));

        if self
            .failures
            .iter()
            .any(|(op, c)| *op == operation && c == cluster)
        {
            return Err(ClientError::api_error(
                operation,
                500,
                Some("ServerException".to_string()),
                "injected failure",
            ));
        }
        Ok(())
    }

    fn tasks(&self, cluster: &str) -> Result<&[Task]> {
        self.clusters
            .iter()
            .find(|(id, _)| id == cluster)
            .map(|(_, tasks)| tasks.as_slice())
            .ok_or_else(|| {
                ClientError::api_error(
                    "ListTasks",
                    400,
                    Some("ClusterNotFoundException".to_string()),
                    "Cluster not found.",
                )
            })
    }
}

#[async_trait]
impl TaskOrchestrator for FakeFleet {
    async fn list_clusters(&self) -> Result<Vec<String>> {
        self.record("ListClusters", "*")?;
        Ok(self.clusters.iter().map(|(id, _)| id.clone()).collect())
    }

    async fn list_running_tasks(&self, cluster: &str) -> Result<Vec<String>> {
        self.record("ListTasks", cluster)?;
        Ok(self.tasks(cluster)?.iter().map(|t| t.id.clone()).collect())
    }

    async fn describe_tasks(&self, cluster: &str, task_ids: &[String]) -> Result<Vec<Task>> {
        self.record("DescribeTasks", cluster)?;
        let tasks = self.tasks(cluster)?;
        Ok(task_ids
            .iter()
            .filter(|id| !self.undescribable.contains(*id))
            .filter_map(|id| tasks.iter().find(|t| &t.id == id).cloned())
            .collect())
    }

    async fn stop_task(&self, cluster: &str, task_id: &str, reason: &str) -> Result<()> {
        self.record("StopTask", cluster)?;
        self.stops.lock().unwrap().push(StopCall {
            cluster: cluster.to_string(),
            task: task_id.to_string(),
            reason: reason.to_string(),
        });
        Ok(())
    }
}
