//! Task-orchestration API DTOs
//!
//! Request and response bodies of the container service JSON protocol. Only
//! the fields the workflow reads are modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::domain::task::{Container, DesiredStatus, Task};

/// Service prefix of the `X-Amz-Target` header
pub const TARGET_PREFIX: &str = "AmazonEC2ContainerServiceV20141113";

/// Content type of every request body
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Largest number of task ids accepted by a single DescribeTasks call
pub const DESCRIBE_TASKS_LIMIT: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClustersRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClustersResponse {
    #[serde(default)]
    pub cluster_arns: Vec<String>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksRequest {
    pub cluster: String,
    pub desired_status: DesiredStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksResponse {
    #[serde(default)]
    pub task_arns: Vec<String>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeTasksRequest {
    pub cluster: String,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeTasksResponse {
    #[serde(default)]
    pub tasks: Vec<TaskDescription>,
    #[serde(default)]
    pub failures: Vec<Failure>,
}

/// Task as described by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescription {
    pub task_arn: String,
    #[serde(default)]
    pub cluster_arn: Option<String>,
    #[serde(default)]
    pub last_status: Option<String>,
    #[serde(default)]
    pub containers: Vec<ContainerDescription>,
}

impl TaskDescription {
    /// Converts into a domain task, falling back to `cluster` when the
    /// description carries no cluster ARN
    pub fn into_task(self, cluster: &str) -> Task {
        Task {
            id: self.task_arn,
            cluster_id: self.cluster_arn.unwrap_or_else(|| cluster.to_string()),
            containers: self
                .containers
                .into_iter()
                .map(|c| Container {
                    name: c.name.unwrap_or_default(),
                    image: c.image.unwrap_or_default(),
                })
                .collect(),
            last_status: self.last_status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDescription {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Per-resource failure reported alongside a partial result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    #[serde(default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTaskRequest {
    pub cluster: String,
    pub task: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTaskResponse {
    #[serde(default)]
    pub task: Option<TaskDescription>,
}

/// Error body returned with a non-success status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(rename = "__type", default)]
    pub error_type: Option<String>,
    #[serde(alias = "Message", default)]
    pub message: Option<String>,
}
