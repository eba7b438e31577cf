//! Task domain types

use serde::{Deserialize, Serialize};

/// A running unit of work inside a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier (ARN)
    pub id: String,

    /// Cluster the task runs in
    pub cluster_id: String,

    /// Containers in definition order
    pub containers: Vec<Container>,

    /// Last status reported by the orchestrator (e.g. "RUNNING")
    #[serde(default)]
    pub last_status: Option<String>,
}

impl Task {
    /// Container image references in container order
    pub fn container_images(&self) -> impl Iterator<Item = &str> {
        self.containers.iter().map(|c| c.image.as_str())
    }
}

/// A single container of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    pub image: String,
}

/// Desired status filter used when listing tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DesiredStatus {
    Running,
    Pending,
    Stopped,
}

impl std::fmt::Display for DesiredStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesiredStatus::Running => write!(f, "RUNNING"),
            DesiredStatus::Pending => write!(f, "PENDING"),
            DesiredStatus::Stopped => write!(f, "STOPPED"),
        }
    }
}
