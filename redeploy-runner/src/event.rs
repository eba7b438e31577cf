//! Event intake
//!
//! Decodes the trigger envelope and applies the same filter the event
//! subscription uses: registry source, image action detail type, a push, and
//! a repository on the allow-list. Only events passing every check start a
//! workflow execution.

use redeploy_core::domain::event::{ImageActionType, PushEvent};
use redeploy_core::dto::event::{IMAGE_ACTION_DETAIL_TYPE, ImageActionEvent, REGISTRY_EVENT_SOURCE};
use thiserror::Error;

/// Reasons an incoming event does not start an execution
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Failed to decode event: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected event source '{0}'")]
    UnexpectedSource(String),

    #[error("Unexpected detail type '{0}'")]
    UnexpectedDetailType(String),

    #[error("Image action '{0}' is not a push")]
    NotAPush(String),

    #[error("Repository '{0}' is not in the allow-list")]
    NotAllowed(String),
}

impl EventError {
    /// True for well-formed events the subscription simply would not match
    pub fn is_filtered(&self) -> bool {
        !matches!(self, EventError::Decode(_))
    }
}

/// Subscription filter for image push events
#[derive(Debug, Clone)]
pub struct EventFilter {
    repository_names: Vec<String>,
}

impl EventFilter {
    pub fn new(repository_names: Vec<String>) -> Self {
        Self { repository_names }
    }

    /// Decodes a raw JSON envelope and filters it
    pub fn decode(&self, raw: &str) -> Result<PushEvent, EventError> {
        let envelope: ImageActionEvent = serde_json::from_str(raw)?;
        self.accept(envelope)
    }

    /// Filters a decoded envelope into a push event
    pub fn accept(&self, envelope: ImageActionEvent) -> Result<PushEvent, EventError> {
        if envelope.source != REGISTRY_EVENT_SOURCE {
            return Err(EventError::UnexpectedSource(envelope.source));
        }

        if envelope.detail_type != IMAGE_ACTION_DETAIL_TYPE {
            return Err(EventError::UnexpectedDetailType(envelope.detail_type));
        }

        let detail = envelope.detail;
        match detail.action_type.parse::<ImageActionType>() {
            Ok(ImageActionType::Push) => {}
            _ => return Err(EventError::NotAPush(detail.action_type)),
        }

        if !self.repository_names.contains(&detail.repository_name) {
            return Err(EventError::NotAllowed(detail.repository_name));
        }

        Ok(PushEvent {
            repository_name: detail.repository_name,
            action_type: ImageActionType::Push,
            image_tag: detail.image_tag,
            image_digest: detail.image_digest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(source: &str, detail_type: &str, action: &str, repository: &str) -> String {
        serde_json::json!({
            "version": "0",
            "id": "13cde686-328b-6117-af20-0e5566167482",
            "detail-type": detail_type,
            "source": source,
            "account": "123456789012",
            "time": "2024-05-01T12:00:00Z",
            "region": "us-east-1",
            "resources": [],
            "detail": {
                "result": "SUCCESS",
                "repository-name": repository,
                "image-digest": "sha256:0123",
                "action-type": action,
                "image-tag": "latest"
            }
        })
        .to_string()
    }

    fn filter() -> EventFilter {
        EventFilter::new(vec!["my-ecr-repo".to_string(), "api".to_string()])
    }

    #[test]
    fn test_accepts_allowed_push() {
        let raw = envelope("aws.ecr", "ECR Image Action", "PUSH", "my-ecr-repo");

        let event = filter().decode(&raw).unwrap();

        assert_eq!(event.repository_name, "my-ecr-repo");
        assert_eq!(event.action_type, ImageActionType::Push);
        assert_eq!(event.image_tag.as_deref(), Some("latest"));
        assert_eq!(event.image_digest.as_deref(), Some("sha256:0123"));
    }

    #[test]
    fn test_rejects_repository_outside_allow_list() {
        let raw = envelope("aws.ecr", "ECR Image Action", "PUSH", "My-Ecr-Repo");

        let error = filter().decode(&raw).unwrap_err();
        assert!(matches!(error, EventError::NotAllowed(ref name) if name == "My-Ecr-Repo"));
        assert!(error.is_filtered());
    }

    #[test]
    fn test_rejects_delete_action() {
        let raw = envelope("aws.ecr", "ECR Image Action", "DELETE", "my-ecr-repo");
        assert!(matches!(
            filter().decode(&raw),
            Err(EventError::NotAPush(_))
        ));
    }

    #[test]
    fn test_rejects_foreign_source_and_detail_type() {
        let raw = envelope("aws.s3", "ECR Image Action", "PUSH", "my-ecr-repo");
        assert!(matches!(
            filter().decode(&raw),
            Err(EventError::UnexpectedSource(_))
        ));

        let raw = envelope("aws.ecr", "ECR Image Scan", "PUSH", "my-ecr-repo");
        assert!(matches!(
            filter().decode(&raw),
            Err(EventError::UnexpectedDetailType(_))
        ));
    }

    #[test]
    fn test_decode_error_is_not_filtered() {
        let error = filter().decode("{ not json").unwrap_err();
        assert!(matches!(error, EventError::Decode(_)));
        assert!(!error.is_filtered());
    }
}
