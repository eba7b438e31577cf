//! Trigger event DTOs
//!
//! The envelope delivered by the event bus when an image action happens in
//! the registry. Field names follow the bus's kebab-case wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event source emitted by the image registry
pub const REGISTRY_EVENT_SOURCE: &str = "aws.ecr";

/// Detail type of image action notifications
pub const IMAGE_ACTION_DETAIL_TYPE: &str = "ECR Image Action";

/// Event bus envelope around an image action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageActionEvent {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "detail-type")]
    pub detail_type: String,
    pub source: String,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    pub detail: ImageActionDetail,
}

/// Registry-specific payload of an image action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImageActionDetail {
    pub action_type: String,
    pub repository_name: String,
    #[serde(default)]
    pub image_tag: Option<String>,
    #[serde(default)]
    pub image_digest: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
}
