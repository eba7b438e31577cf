//! Cluster workflow
//!
//! Per-cluster decision pipeline:
//!
//! ```text
//! ListRunningTasks -> CheckIfTasksExist -> DescribeTasks -> ExtractRepoName -> CheckImage -> StopTask
//!                           |                                                     |
//!                           +------------------------> SkipTask <-----------------+
//! ```
//!
//! Only the first running task is inspected and stopped.

use async_trait::async_trait;
use redeploy_client::TaskOrchestrator;
use redeploy_core::domain::matcher;
use redeploy_engine::{
    Action, BoxError, ChoiceRule, DefinitionError, Predicate, StateMachine, Step, Transition,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::context::ClusterContext;

pub const LIST_RUNNING_TASKS: &str = "ListRunningTasks";
pub const CHECK_IF_TASKS_EXIST: &str = "CheckIfTasksExist";
pub const DESCRIBE_TASKS: &str = "DescribeTasks";
pub const EXTRACT_REPO_NAME: &str = "ExtractRepoName";
pub const CHECK_IMAGE: &str = "CheckImage";
pub const STOP_TASK: &str = "StopTask";
pub const SKIP_TASK: &str = "SkipTask";

/// Builds the per-cluster state machine
///
/// # Arguments
/// * `orchestrator` - Task-orchestration API used by the action steps
/// * `stop_reason` - Reason recorded with the stop request
pub fn cluster_workflow(
    orchestrator: Arc<dyn TaskOrchestrator>,
    stop_reason: String,
) -> Result<StateMachine<ClusterContext>, DefinitionError> {
    StateMachine::builder("ClusterRestart")
        .start_at(LIST_RUNNING_TASKS)
        .step(Step::action(
            LIST_RUNNING_TASKS,
            ListRunningTasks {
                orchestrator: Arc::clone(&orchestrator),
            },
            Transition::Next(CHECK_IF_TASKS_EXIST),
        ))
        .step(Step::choice(
            CHECK_IF_TASKS_EXIST,
            vec![ChoiceRule::new(
                Predicate::IsPresent(|c: &ClusterContext| c.first_running_task().is_some()),
                DESCRIBE_TASKS,
            )],
            SKIP_TASK,
        ))
        .step(Step::action(
            DESCRIBE_TASKS,
            DescribeTasks {
                orchestrator: Arc::clone(&orchestrator),
            },
            Transition::Next(EXTRACT_REPO_NAME),
        ))
        .step(Step::transform(
            EXTRACT_REPO_NAME,
            extract_repo_name,
            Transition::Next(CHECK_IMAGE),
        ))
        .step(Step::choice(
            CHECK_IMAGE,
            vec![ChoiceRule::new(
                Predicate::StringEquals(extracted_repository, pushed_repository),
                STOP_TASK,
            )],
            SKIP_TASK,
        ))
        .step(Step::action(
            STOP_TASK,
            StopTask {
                orchestrator,
                reason: stop_reason,
            },
            Transition::End,
        ))
        .step(Step::succeed(SKIP_TASK))
        .build()
}

fn extracted_repository(context: &ClusterContext) -> Option<&str> {
    context.extracted_repository_name.as_deref()
}

fn pushed_repository(context: &ClusterContext) -> Option<&str> {
    Some(context.push_event.repository_name.as_str())
}

/// Lists the running tasks of the branch's cluster
struct ListRunningTasks {
    orchestrator: Arc<dyn TaskOrchestrator>,
}

#[async_trait]
impl Action<ClusterContext> for ListRunningTasks {
    async fn invoke(&self, mut context: ClusterContext) -> Result<ClusterContext, BoxError> {
        let tasks = self
            .orchestrator
            .list_running_tasks(&context.cluster)
            .await?;

        debug!(
            "Cluster {} has {} running task(s)",
            context.cluster,
            tasks.len()
        );
        context.running_tasks = Some(tasks);
        Ok(context)
    }
}

/// Fetches details of every listed task
struct DescribeTasks {
    orchestrator: Arc<dyn TaskOrchestrator>,
}

#[async_trait]
impl Action<ClusterContext> for DescribeTasks {
    async fn invoke(&self, mut context: ClusterContext) -> Result<ClusterContext, BoxError> {
        let task_ids = context.running_tasks.as_deref().unwrap_or_default();
        let details = self
            .orchestrator
            .describe_tasks(&context.cluster, task_ids)
            .await?;

        context.task_details = Some(details);
        Ok(context)
    }
}

/// Derives the repository name of the first running task's first container image
fn extract_repo_name(mut context: ClusterContext) -> Result<ClusterContext, BoxError> {
    let first = context
        .first_running_task()
        .ok_or("no running task to inspect")?;
    let details = context.task_details.as_deref().unwrap_or_default();

    let image = matcher::inspect(matcher::inspected_task(details, first))?;
    debug!(
        "Inspecting image {} of task {} in cluster {}",
        image, first, context.cluster
    );

    context.extracted_repository_name = Some(image.repository_name);
    Ok(context)
}

/// Stops the first running task of the cluster
struct StopTask {
    orchestrator: Arc<dyn TaskOrchestrator>,
    reason: String,
}

#[async_trait]
impl Action<ClusterContext> for StopTask {
    async fn invoke(&self, mut context: ClusterContext) -> Result<ClusterContext, BoxError> {
        let task = context
            .first_running_task()
            .ok_or("no running task to stop")?
            .to_string();

        self.orchestrator
            .stop_task(&context.cluster, &task, &self.reason)
            .await?;

        info!(
            "Stopped task {} in cluster {} after push to {}",
            task, context.cluster, context.push_event.repository_name
        );
        context.stopped_task = Some(task);
        Ok(context)
    }
}
