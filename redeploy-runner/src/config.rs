//! Runner configuration
//!
//! Defines the configurable parameters of the redeploy workflow: where the
//! orchestrator lives, which repositories to react to, how many clusters to
//! process at once and the reason recorded on stopped tasks.

/// Reason recorded with every stop request unless overridden
pub const DEFAULT_STOP_REASON: &str = "Restarting task due to new ECR image deployment";

/// Optional variables read by [`Config::from_env`], honored only alongside ORCHESTRATOR_URL
pub const OVERRIDE_VARS: [&str; 3] = ["REPOSITORY_NAMES", "MAX_CONCURRENCY", "STOP_REASON"];

/// Runner configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Orchestrator endpoint URL (e.g., "http://localhost:8080")
    pub orchestrator_url: String,

    /// Repositories whose pushes trigger a restart
    pub repository_names: Vec<String>,

    /// How many clusters are processed concurrently (1 = one after another)
    pub max_concurrency: usize,

    /// Reason recorded with each stopped task
    pub stop_reason: String,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(orchestrator_url: String) -> Self {
        Self {
            orchestrator_url,
            repository_names: vec!["my-ecr-repo".to_string()],
            max_concurrency: 1,
            stop_reason: DEFAULT_STOP_REASON.to_string(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - ORCHESTRATOR_URL (required)
    /// - REPOSITORY_NAMES (optional, comma-separated, default: my-ecr-repo)
    /// - MAX_CONCURRENCY (optional, default: 1)
    /// - STOP_REASON (optional)
    pub fn from_env() -> anyhow::Result<Self> {
        let orchestrator_url = std::env::var("ORCHESTRATOR_URL")
            .map_err(|_| anyhow::anyhow!("ORCHESTRATOR_URL environment variable not set"))?;

        let mut config = Self::new(orchestrator_url);

        if let Ok(names) = std::env::var("REPOSITORY_NAMES") {
            config.repository_names = parse_repository_names(&names);
        }

        if let Some(max_concurrency) = std::env::var("MAX_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            config.max_concurrency = max_concurrency;
        }

        if let Ok(reason) = std::env::var("STOP_REASON") {
            config.stop_reason = reason;
        }

        Ok(config)
    }

    /// Adds a repository to the allow-list
    #[allow(dead_code)]
    pub fn with_repository(mut self, name: impl Into<String>) -> Self {
        self.repository_names.push(name.into());
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.orchestrator_url.is_empty() {
            anyhow::bail!("orchestrator_url cannot be empty");
        }

        if !self.orchestrator_url.starts_with("http://")
            && !self.orchestrator_url.starts_with("https://")
        {
            anyhow::bail!("orchestrator_url must start with http:// or https://");
        }

        if self.repository_names.is_empty() {
            anyhow::bail!("repository_names must list at least one repository");
        }

        if self.max_concurrency == 0 {
            anyhow::bail!("max_concurrency must be greater than 0");
        }

        if self.stop_reason.trim().is_empty() {
            anyhow::bail!("stop_reason cannot be empty");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8080".to_string())
    }
}

/// Override variables that are set, and therefore ignored when falling back to defaults
pub fn ignored_overrides(is_set: impl Fn(&str) -> bool) -> Vec<&'static str> {
    OVERRIDE_VARS
        .into_iter()
        .filter(|name| is_set(name))
        .collect()
}

/// Splits a comma-separated allow-list, dropping blanks
fn parse_repository_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.stop_reason, DEFAULT_STOP_REASON);
        assert_eq!(config.repository_names, vec!["my-ecr-repo".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Invalid URL should fail
        config.orchestrator_url = "not-a-url".to_string();
        assert!(config.validate().is_err());
        config.orchestrator_url = "https://ecs.internal".to_string();
        assert!(config.validate().is_ok());

        // Zero concurrency should fail
        config.max_concurrency = 0;
        assert!(config.validate().is_err());
        config.max_concurrency = 4;

        // Empty allow-list should fail
        config.repository_names.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_repository() {
        let config = Config::default().with_repository("api");
        assert_eq!(
            config.repository_names,
            vec!["my-ecr-repo".to_string(), "api".to_string()]
        );
    }

    #[test]
    fn test_parse_repository_names() {
        assert_eq!(
            parse_repository_names(" web, api ,,worker "),
            vec!["web", "api", "worker"]
        );
        assert!(parse_repository_names(" , ").is_empty());
    }

    #[test]
    fn test_ignored_overrides() {
        assert!(ignored_overrides(|_| false).is_empty());
        assert_eq!(
            ignored_overrides(|name| name != "MAX_CONCURRENCY"),
            vec!["REPOSITORY_NAMES", "STOP_REASON"]
        );
        assert_eq!(ignored_overrides(|name| name == "ORCHESTRATOR_URL"), Vec::<&str>::new());
    }
}
