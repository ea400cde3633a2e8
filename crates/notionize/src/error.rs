//! CLI error types.

use notionize_config::ConfigError;
use notionize_notion::PluginError;
use notionize_site::WalkError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Plugin(#[from] PluginError),

    #[error("{0}")]
    Walk(#[from] WalkError),

    #[error("{0}")]
    Publish(String),
}
