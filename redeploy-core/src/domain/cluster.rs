//! Cluster domain model

use serde::{Deserialize, Serialize};

/// A cluster hosting running tasks
///
/// Clusters are enumerated fresh on every workflow run; nothing about them is
/// remembered between runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster identifier (ARN or short name) as returned by the orchestrator
    pub id: String,
}

impl Cluster {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl From<String> for Cluster {
    fn from(id: String) -> Self {
        Self { id }
    }
}

impl std::fmt::Display for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
