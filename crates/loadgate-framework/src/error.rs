//! Error types for the scheduling framework.

use thiserror::Error;

/// Result type alias for framework operations.
pub type FrameworkResult<T> = Result<T, FrameworkError>;

/// Errors raised while loading configuration or building plugins.
#[derive(Debug, Error)]
pub enum FrameworkError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown plugin: {0}")]
    UnknownPlugin(String),
}

/// A typed lookup on plugin arguments found a value of the wrong kind.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("argument `{key}` should be {expected}, found {found}")]
pub struct ArgumentError {
    pub key: String,
    pub expected: &'static str,
    pub found: &'static str,
}

/// Outcome of a failed predicate.
///
/// `Unschedulable` is the normal "this node does not fit" verdict;
/// `Internal` means the plugin itself could not decide.
#[derive(Debug, Error)]
pub enum PredicateError {
    #[error("plugin {plugin}: {reason}")]
    Unschedulable {
        plugin: String,
        #[source]
        reason: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("plugin {plugin} failed: {message}")]
    Internal { plugin: String, message: String },
}

impl PredicateError {
    pub fn is_unschedulable(&self) -> bool {
        matches!(self, PredicateError::Unschedulable { .. })
    }

    pub fn plugin(&self) -> &str {
        match self {
            PredicateError::Unschedulable { plugin, .. } | PredicateError::Internal { plugin, .. } => {
                plugin
            }
        }
    }
}

/// A node-order function could not produce a score.
#[derive(Debug, Error)]
#[error("plugin {plugin} node order failed: {source}")]
pub struct NodeOrderError {
    pub plugin: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}
