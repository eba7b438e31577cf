//! Cluster-related API operations

use redeploy_core::dto::orchestrator::{ListClustersRequest, ListClustersResponse};
use tracing::debug;

use crate::OrchestratorClient;
use crate::error::Result;

impl OrchestratorClient {
    // =============================================================================
    // Cluster Query
    // =============================================================================

    /// List the identifiers of all clusters
    ///
    /// Follows `nextToken` until the last page, so the returned list is
    /// complete and in the order the service returned it.
    pub async fn list_cluster_arns(&self) -> Result<Vec<String>> {
        let mut clusters = Vec::new();
        let mut next_token = None;

        loop {
            let page: ListClustersResponse = self
                .call("ListClusters", &ListClustersRequest { next_token })
                .await?;

            debug!("ListClusters returned {} cluster(s)", page.cluster_arns.len());
            clusters.extend(page.cluster_arns);

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => return Ok(clusters),
            }
        }
    }
}
