//! Execution report
//!
//! Summarizes one workflow execution: which clusters had a task stopped and
//! why the others were left alone. Built from the final fleet context and
//! printed as JSON when the run finishes.

use chrono::{DateTime, Utc};
use redeploy_core::domain::matcher;
use redeploy_engine::Completed;
use serde::Serialize;
use uuid::Uuid;

use crate::context::{ClusterContext, FleetContext};

/// Why a cluster branch ended without stopping a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    NoRunningTasks,
    RepositoryMismatch { found: String },
}

/// Result of one cluster branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClusterOutcome {
    Restarted {
        cluster: String,
        task: String,
    },
    Skipped {
        cluster: String,
        #[serde(flatten)]
        reason: SkipReason,
    },
}

impl ClusterOutcome {
    /// Classifies the final state of a cluster branch
    pub fn from_run(run: &Completed<ClusterContext>) -> Self {
        let context = &run.context;
        let cluster = context.cluster.clone();

        if let Some(task) = &context.stopped_task {
            return ClusterOutcome::Restarted {
                cluster,
                task: task.clone(),
            };
        }

        match &context.extracted_repository_name {
            Some(found) if !matcher::repository_matches(found, &context.push_event) => {
                ClusterOutcome::Skipped {
                    cluster,
                    reason: SkipReason::RepositoryMismatch {
                        found: found.clone(),
                    },
                }
            }
            _ => ClusterOutcome::Skipped {
                cluster,
                reason: SkipReason::NoRunningTasks,
            },
        }
    }

    pub fn cluster(&self) -> &str {
        match self {
            ClusterOutcome::Restarted { cluster, .. } | ClusterOutcome::Skipped { cluster, .. } => {
                cluster.as_str()
            }
        }
    }

    pub fn is_restarted(&self) -> bool {
        matches!(self, ClusterOutcome::Restarted { .. })
    }
}

/// Summary of a completed execution
#[derive(Debug, Clone, Serialize)]
pub struct RedeployReport {
    pub execution_id: Uuid,
    pub repository: String,
    pub image_tag: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,

    /// One entry per cluster, in listing order
    pub outcomes: Vec<ClusterOutcome>,
}

impl RedeployReport {
    pub fn new(
        execution_id: Uuid,
        started_at: DateTime<Utc>,
        completed: &Completed<FleetContext>,
    ) -> Self {
        let context = &completed.context;
        let outcomes = context
            .cluster_runs
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(ClusterOutcome::from_run)
            .collect();

        Self {
            execution_id,
            repository: context.push_event.repository_name.clone(),
            image_tag: context.push_event.image_tag.clone(),
            started_at,
            completed_at: Utc::now(),
            outcomes,
        }
    }

    /// Number of clusters that had a task stopped
    pub fn restarted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_restarted()).count()
    }
}
