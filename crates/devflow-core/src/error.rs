use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DevflowError {
    #[error("unknown plugin: {0} (run 'devflow list' to see available plugins)")]
    UnknownPlugin(String),

    #[error("invalid plugin registry: {0}")]
    InvalidRegistry(String),

    #[error("invalid name '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidName(String),

    #[error("no plugins selected for installation")]
    NoPluginsSelected,

    #[error("template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    #[error("not a git repository: local scope requires a project with .git/")]
    NotAGitRepository,

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DevflowError>;
