pub mod init;
pub mod list;
pub mod uninstall;

use crate::source;
use anyhow::Context as _;
use devflow_core::paths::{InstallPaths, Scope};
use devflow_core::registry::PluginRegistry;
use std::path::PathBuf;

/// Global options shared by every subcommand.
pub struct Context {
    pub source: Option<PathBuf>,
    pub claude_dir: Option<PathBuf>,
    pub devflow_dir: Option<PathBuf>,
    pub json: bool,
}

impl Context {
    pub fn install_paths(&self, scope: Scope) -> anyhow::Result<InstallPaths> {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        InstallPaths::resolve(
            scope,
            &cwd,
            self.claude_dir.as_deref(),
            self.devflow_dir.as_deref(),
        )
        .with_context(|| format!("failed to resolve {scope} install directories"))
    }

    pub fn source_root(&self) -> anyhow::Result<PathBuf> {
        source::resolve_source(self.source.as_deref())
    }

    /// Registry from the package when it can be found, else the built-in one.
    /// Listing and uninstalling work without a package checkout.
    pub fn registry(&self) -> anyhow::Result<PluginRegistry> {
        if self.source.is_some() {
            let root = self.source_root()?;
            return PluginRegistry::load_or_builtin(&root)
                .with_context(|| format!("failed to load plugin registry from {}", root.display()));
        }
        match self.source_root() {
            Ok(root) => PluginRegistry::load_or_builtin(&root)
                .with_context(|| format!("failed to load plugin registry from {}", root.display())),
            Err(e) => {
                tracing::debug!(error = %e, "no package found, using built-in registry");
                Ok(PluginRegistry::builtin())
            }
        }
    }
}
