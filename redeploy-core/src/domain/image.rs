//! Container image references
//!
//! Parses image strings of the form `<registry-host>/<repository-name>:<tag>`.
//!
//! The parse is a split-and-index over two delimiters: the string is split on
//! `/` and the segment at index 1 is kept, which is then split on `:` giving
//! the repository name at index 0 and the tag at index 1. References with more
//! path segments (`host/namespace/repo:tag`) therefore yield the namespace as
//! repository name and fail on the missing tag; no normalization is attempted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while reading an image reference
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageReferenceError {
    /// The reference does not have the `<host>/<repository>:<tag>` shape
    #[error("Malformed image reference '{reference}': {reason}")]
    Malformed {
        reference: String,
        reason: &'static str,
    },

    /// There was no image to inspect (no task details or no containers)
    #[error("No container image to inspect: {0}")]
    Missing(&'static str),
}

/// Parsed view of a container image string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    pub registry_host: String,
    pub repository_name: String,
    pub tag: String,
}

impl ImageReference {
    /// Parses an image reference string
    ///
    /// # Errors
    /// Returns [`ImageReferenceError::Malformed`] if:
    /// - The string contains no `/`
    /// - The second path segment contains no `:`
    ///
    /// An empty repository segment (`host/:tag`) is not an error; it simply
    /// never equals a pushed repository name.
    ///
    /// # Example
    /// ```
    /// use redeploy_core::domain::image::ImageReference;
    ///
    /// let image = ImageReference::parse("123.dkr.ecr.example.com/my-ecr-repo:latest")?;
    /// assert_eq!(image.repository_name, "my-ecr-repo");
    /// assert_eq!(image.tag, "latest");
    /// # Ok::<(), redeploy_core::domain::image::ImageReferenceError>(())
    /// ```
    pub fn parse(reference: &str) -> Result<Self, ImageReferenceError> {
        let malformed = |reason| ImageReferenceError::Malformed {
            reference: reference.to_string(),
            reason,
        };

        let mut segments = reference.split('/');
        let registry_host = segments.next().unwrap_or_default();
        let path = segments
            .next()
            .ok_or_else(|| malformed("expected '/' between registry host and repository"))?;

        let mut parts = path.split(':');
        let repository_name = parts.next().unwrap_or_default();
        let tag = parts
            .next()
            .ok_or_else(|| malformed("expected ':' between repository and tag"))?;

        Ok(Self {
            registry_host: registry_host.to_string(),
            repository_name: repository_name.to_string(),
            tag: tag.to_string(),
        })
    }
}

impl std::str::FromStr for ImageReference {
    type Err = ImageReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}:{}",
            self.registry_host, self.repository_name, self.tag
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registry_image() {
        let image = ImageReference::parse("123.dkr.ecr.example.com/my-ecr-repo:latest").unwrap();
        assert_eq!(image.registry_host, "123.dkr.ecr.example.com");
        assert_eq!(image.repository_name, "my-ecr-repo");
        assert_eq!(image.tag, "latest");
    }

    #[test]
    fn test_parse_keeps_case() {
        let image = ImageReference::parse("host/My-Repo:v1").unwrap();
        assert_eq!(image.repository_name, "My-Repo");
    }

    #[test]
    fn test_parse_nested_path_takes_second_segment() {
        // host/namespace/repo:tag -> segment 1 is "namespace", which has no tag
        let result = ImageReference::parse("host/namespace/repo:tag");
        assert!(matches!(result, Err(ImageReferenceError::Malformed { .. })));

        let image = ImageReference::parse("host/namespace:1/repo").unwrap();
        assert_eq!(image.repository_name, "namespace");
        assert_eq!(image.tag, "1");
    }

    #[test]
    fn test_parse_without_slash_is_malformed() {
        let result = ImageReference::parse("nginx:latest");
        assert!(matches!(result, Err(ImageReferenceError::Malformed { .. })));
    }

    #[test]
    fn test_parse_without_colon_is_malformed() {
        let result = ImageReference::parse("123.dkr.ecr.example.com/my-ecr-repo");
        match result {
            Err(ImageReferenceError::Malformed { reference, .. }) => {
                assert_eq!(reference, "123.dkr.ecr.example.com/my-ecr-repo");
            }
            other => panic!("expected malformed reference, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_repository_is_kept() {
        let image = ImageReference::parse("host/:latest").unwrap();
        assert_eq!(image.repository_name, "");
        assert_eq!(image.tag, "latest");

        assert!(ImageReference::parse("").is_err());
    }

    #[test]
    fn test_display_round_trips_shape() {
        let image: ImageReference = "host/repo:tag".parse().unwrap();
        assert_eq!(image.to_string(), "host/repo:tag");
    }
}
