//! Push event domain model
//!
//! The validated, flattened view of an image-registry notification. The raw
//! envelope lives in [`crate::dto::event`].

use serde::{Deserialize, Serialize};

/// A new image was published to (or removed from) a registry repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEvent {
    /// Repository the image was pushed to, e.g. "my-ecr-repo"
    pub repository_name: String,

    /// What happened to the image
    pub action_type: ImageActionType,

    /// Tag of the pushed image, when the registry reports one
    #[serde(default)]
    pub image_tag: Option<String>,

    /// Digest of the pushed image, when the registry reports one
    #[serde(default)]
    pub image_digest: Option<String>,
}

impl PushEvent {
    /// Creates a push event for the given repository
    pub fn push(repository_name: impl Into<String>) -> Self {
        Self {
            repository_name: repository_name.into(),
            action_type: ImageActionType::Push,
            image_tag: None,
            image_digest: None,
        }
    }
}

/// Image action reported by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageActionType {
    Push,
    Delete,
}

impl std::fmt::Display for ImageActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageActionType::Push => write!(f, "PUSH"),
            ImageActionType::Delete => write!(f, "DELETE"),
        }
    }
}

impl std::str::FromStr for ImageActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUSH" => Ok(ImageActionType::Push),
            "DELETE" => Ok(ImageActionType::Delete),
            other => Err(format!("unknown image action type '{}'", other)),
        }
    }
}
