//! Fleet workflow
//!
//! Outer state machine of an execution: list every cluster, then run the
//! cluster workflow once per cluster with bounded concurrency.

use async_trait::async_trait;
use redeploy_client::TaskOrchestrator;
use redeploy_core::domain::cluster::Cluster;
use redeploy_engine::{
    Action, BoxError, Completed, DefinitionError, MapStep, StateMachine, Step, Transition,
};
use std::sync::Arc;
use tracing::info;

use super::cluster::cluster_workflow;
use crate::context::{ClusterContext, FleetContext};

/// Name of the execution-level state machine
pub const MACHINE_NAME: &str = "ECS-Restart";

pub const LIST_CLUSTERS: &str = "ListClusters";
pub const MAP_CLUSTER: &str = "MapCluster";

/// Builds the execution-level state machine
///
/// # Arguments
/// * `orchestrator` - Task-orchestration API shared by every step
/// * `max_concurrency` - Cluster branches allowed in flight at once
/// * `stop_reason` - Reason recorded with each stop request
pub fn fleet_workflow(
    orchestrator: Arc<dyn TaskOrchestrator>,
    max_concurrency: usize,
    stop_reason: String,
) -> Result<StateMachine<FleetContext>, DefinitionError> {
    let per_cluster = cluster_workflow(Arc::clone(&orchestrator), stop_reason)?;
    let map = MapStep::new(listed_clusters, cluster_context, per_cluster, record_cluster_runs)
        .with_max_concurrency(max_concurrency);

    StateMachine::builder(MACHINE_NAME)
        .start_at(LIST_CLUSTERS)
        .step(Step::action(
            LIST_CLUSTERS,
            ListClusters { orchestrator },
            Transition::Next(MAP_CLUSTER),
        ))
        .step(Step::map(MAP_CLUSTER, map, Transition::End))
        .build()
}

/// Lists every cluster of the account
struct ListClusters {
    orchestrator: Arc<dyn TaskOrchestrator>,
}

#[async_trait]
impl Action<FleetContext> for ListClusters {
    async fn invoke(&self, mut context: FleetContext) -> Result<FleetContext, BoxError> {
        let clusters: Vec<Cluster> = self
            .orchestrator
            .list_clusters()
            .await?
            .into_iter()
            .map(Cluster::from)
            .collect();
        info!("Found {} cluster(s)", clusters.len());

        context.clusters = Some(clusters);
        Ok(context)
    }
}

fn listed_clusters(context: &FleetContext) -> Vec<Cluster> {
    context.clusters.clone().unwrap_or_default()
}

fn cluster_context(context: &FleetContext, cluster: Cluster) -> ClusterContext {
    ClusterContext::new(cluster.id, context.push_event.clone())
}

fn record_cluster_runs(context: &mut FleetContext, runs: Vec<Completed<ClusterContext>>) {
    context.cluster_runs = Some(runs);
}
