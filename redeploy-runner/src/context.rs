//! Workflow contexts
//!
//! Typed documents threaded through the state machines. Fields start empty
//! and are filled in by the steps that own them:
//! - `FleetContext`: one per execution, for the outer cluster enumeration
//! - `ClusterContext`: one per cluster branch, an independent copy per item

use redeploy_core::domain::cluster::Cluster;
use redeploy_core::domain::event::PushEvent;
use redeploy_core::domain::task::Task;
use redeploy_engine::Completed;

/// Context of the fleet-level state machine
#[derive(Debug, Clone)]
pub struct FleetContext {
    /// Event that triggered the execution
    pub push_event: PushEvent,

    /// Clusters to visit, set by ListClusters
    pub clusters: Option<Vec<Cluster>>,

    /// Final state of every cluster branch in cluster order, set by MapCluster
    pub cluster_runs: Option<Vec<Completed<ClusterContext>>>,
}

impl FleetContext {
    pub fn new(push_event: PushEvent) -> Self {
        Self {
            push_event,
            clusters: None,
            cluster_runs: None,
        }
    }
}

/// Context of one cluster branch
#[derive(Debug, Clone)]
pub struct ClusterContext {
    /// Cluster this branch works on
    pub cluster: String,

    /// Event that triggered the execution
    pub push_event: PushEvent,

    /// Running task identifiers, set by ListRunningTasks
    pub running_tasks: Option<Vec<String>>,

    /// Task details, set by DescribeTasks
    pub task_details: Option<Vec<Task>>,

    /// Repository of the inspected image, set by ExtractRepoName
    pub extracted_repository_name: Option<String>,

    /// Task that was stopped, set by StopTask
    pub stopped_task: Option<String>,
}

impl ClusterContext {
    pub fn new(cluster: String, push_event: PushEvent) -> Self {
        Self {
            cluster,
            push_event,
            running_tasks: None,
            task_details: None,
            extracted_repository_name: None,
            stopped_task: None,
        }
    }

    /// First running task identifier, the only one ever acted upon
    pub fn first_running_task(&self) -> Option<&str> {
        self.running_tasks.as_ref()?.first().map(String::as_str)
    }
}
