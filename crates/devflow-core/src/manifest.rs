//! Record of installed plugins, kept at `{devflow_dir}/manifest.json`.

use crate::error::Result;
use crate::io;
use crate::paths::{self, Scope};
use crate::registry::{PluginDefinition, PluginRegistry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallManifest {
    /// Version of the CLI that wrote the manifest.
    pub version: String,
    pub scope: Scope,
    pub plugins: Vec<String>,
    pub installed_at: DateTime<Utc>,
}

impl InstallManifest {
    /// Load the manifest, or `None` if nothing has been installed.
    ///
    /// An unparseable manifest is treated as absent so the next install
    /// rewrites it. Read errors other than not-found propagate.
    pub fn load(devflow_dir: &Path) -> Result<Option<Self>> {
        let path = paths::manifest_path(devflow_dir);
        let data = match std::fs::read_to_string(&path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&data) {
            Ok(manifest) => Ok(Some(manifest)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed manifest");
                Ok(None)
            }
        }
    }

    pub fn save(&self, devflow_dir: &Path) -> Result<()> {
        let mut data = serde_json::to_string_pretty(self)?;
        data.push('\n');
        io::atomic_write(&paths::manifest_path(devflow_dir), data.as_bytes())
    }

    pub fn is_installed(&self, plugin: &str) -> bool {
        self.plugins.iter().any(|p| p == plugin)
    }

    /// Manifest after installing `installed`.
    ///
    /// A full install replaces the plugin list. A partial install adds to the
    /// previous list. Known plugins are kept in registry order; names the
    /// registry no longer has keep their previous position at the end.
    pub fn record_install(
        previous: Option<&InstallManifest>,
        version: &str,
        scope: Scope,
        installed: &[PluginDefinition],
        full_install: bool,
        registry: &PluginRegistry,
    ) -> Self {
        let mut names: HashSet<&str> = installed.iter().map(|p| p.name.as_str()).collect();
        let mut unknown = Vec::new();
        let carried = if full_install { None } else { previous };
        if let Some(prev) = carried {
            for name in &prev.plugins {
                if registry.get(name).is_some() {
                    names.insert(name.as_str());
                } else if !unknown.contains(name) {
                    unknown.push(name.clone());
                }
            }
        }

        let mut plugins: Vec<String> = registry
            .plugins
            .iter()
            .filter(|p| names.contains(p.name.as_str()))
            .map(|p| p.name.clone())
            .collect();
        plugins.extend(unknown);

        Self {
            version: version.to_string(),
            scope,
            plugins,
            installed_at: Utc::now(),
        }
    }
}
