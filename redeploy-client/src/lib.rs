//! Redeploy Orchestrator Client
//!
//! HTTP client for the task-orchestration API the redeploy workflow drives:
//! listing clusters, listing and describing running tasks, and stopping a task.
//!
//! The [`TaskOrchestrator`] trait is the contract the workflow depends on;
//! [`OrchestratorClient`] implements it over the service's JSON protocol.
//! Request signing is expected to be handled in front of the endpoint.
//!
//! # Example
//!
//! ```no_run
//! use redeploy_client::{OrchestratorClient, TaskOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OrchestratorClient::new("http://localhost:8080");
//!
//!     for cluster in client.list_clusters().await? {
//!         let tasks = client.list_running_tasks(&cluster).await?;
//!         println!("{}: {} running task(s)", cluster, tasks.len());
//!     }
//!     Ok(())
//! }
//! ```

mod clusters;
pub mod error;
mod orchestrator;
mod tasks;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use orchestrator::TaskOrchestrator;

use redeploy_core::dto::orchestrator::{CONTENT_TYPE, ServiceErrorBody, TARGET_PREFIX};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// HTTP client for the task-orchestration API
///
/// Every operation is a `POST` to the endpoint root, selected by the
/// `X-Amz-Target` header:
/// - `ListClusters` (paginated)
/// - `ListTasks` (paginated, filtered to running tasks)
/// - `DescribeTasks` (chunked)
/// - `StopTask`
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    /// Base URL of the service endpoint (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl OrchestratorClient {
    /// Create a new orchestrator client
    ///
    /// # Arguments
    /// * `base_url` - The endpoint URL (e.g., "http://localhost:8080")
    ///
    /// # Example
    /// ```
    /// use redeploy_client::OrchestratorClient;
    ///
    /// let client = OrchestratorClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new orchestrator client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use redeploy_client::OrchestratorClient;
    /// use reqwest::Client;
    ///
    /// let http_client = Client::builder().build().unwrap();
    /// let client = OrchestratorClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the endpoint
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Transport
    // =============================================================================

    /// Invoke one service operation and decode its response body
    async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("X-Amz-Target", target(operation))
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .json(request)
            .send()
            .await?;

        self.handle_response(operation, response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-success statuses are turned into [`ClientError::ApiError`], using
    /// the service error body when it can be decoded.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        operation: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(api_error(operation, status.as_u16(), &error_text));
        }

        response.json().await.map_err(|e| {
            ClientError::ParseError(format!(
                "Failed to parse {} response: {}",
                operation, e
            ))
        })
    }
}

/// Full `X-Amz-Target` header value for an operation
fn target(operation: &str) -> String {
    format!("{}.{}", TARGET_PREFIX, operation)
}

/// Builds an API error from a failed response body
fn api_error(operation: &str, status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<ServiceErrorBody>(body) {
        Ok(parsed) => ClientError::api_error(
            operation,
            status,
            parsed.error_type,
            parsed.message.unwrap_or_else(|| body.to_string()),
        ),
        Err(_) => ClientError::api_error(operation, status, None, body),
    }
}
