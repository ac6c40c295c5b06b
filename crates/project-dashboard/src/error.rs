//! Error types for the Project Dashboard
//!
//! The `Display` strings double as the terminal error messages returned to tool callers.

use thiserror::Error;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Unknown project id
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Requested integration is absent for the project
    #[error("Project {project} has no {integration} integration")]
    NotConfigured {
        project: String,
        integration: &'static str,
    },

    /// Required token or API key is absent
    #[error("{0}")]
    CredentialMissing(&'static str),

    /// Upstream rejected the call or was unreachable
    #[error("Failed to fetch {what}: {message}")]
    Upstream { what: &'static str, message: String },

    /// Malformed tool arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Tool name not recognised
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DashboardError {
    pub const NO_GITHUB_TOKEN: &'static str = "No GitHub token configured";
    pub const NO_HEROKU_API_KEY: &'static str = "No Heroku API key configured";

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        DashboardError::Config(msg.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        DashboardError::InvalidArguments(msg.into())
    }

    /// Create an upstream error
    pub fn upstream(what: &'static str, message: impl std::fmt::Display) -> Self {
        DashboardError::Upstream {
            what,
            message: message.to_string(),
        }
    }

    /// Check if this error was caused by the caller's request
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DashboardError::ProjectNotFound(_)
                | DashboardError::NotConfigured { .. }
                | DashboardError::InvalidArguments(_)
                | DashboardError::UnknownTool(_)
        )
    }

    /// Short machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            DashboardError::ProjectNotFound(_) => "ProjectNotFound",
            DashboardError::NotConfigured { .. } => "NotConfigured",
            DashboardError::CredentialMissing(_) => "CredentialMissing",
            DashboardError::Upstream { .. } => "UpstreamFailure",
            DashboardError::InvalidArguments(_) => "InvalidArguments",
            DashboardError::UnknownTool(_) => "UnknownTool",
            DashboardError::Config(_) => "ConfigError",
            DashboardError::Serialization(_) => "SerializationError",
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for DashboardError {
    fn from(err: serde_yaml::Error) -> Self {
        DashboardError::Config(format!("YAML error: {}", err))
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Config(err.to_string())
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_messages() {
        assert_eq!(
            DashboardError::ProjectNotFound("missing".to_string()).to_string(),
            "Project not found: missing"
        );
        assert_eq!(
            DashboardError::NotConfigured {
                project: "site".to_string(),
                integration: "GitHub",
            }
            .to_string(),
            "Project site has no GitHub integration"
        );
        assert_eq!(
            DashboardError::CredentialMissing(DashboardError::NO_GITHUB_TOKEN).to_string(),
            "No GitHub token configured"
        );
        assert_eq!(
            DashboardError::upstream("PRs", "Bad credentials (HTTP 401)").to_string(),
            "Failed to fetch PRs: Bad credentials (HTTP 401)"
        );
    }

    #[test]
    fn test_is_user_error() {
        assert!(DashboardError::ProjectNotFound("x".to_string()).is_user_error());
        assert!(DashboardError::invalid_arguments("x").is_user_error());
        assert!(!DashboardError::upstream("issues", "HTTP 500").is_user_error());
        assert!(!DashboardError::config("bad").is_user_error());
    }
}
