//! Plugin registry.
//!
//! A plugin is a named bundle of commands, agents, and skills. The registry is
//! plain data handed to the installer; nothing in this crate reads it from a
//! global. The package may ship a `plugins.yaml` next to `plugins/` to replace
//! the built-in list.

use crate::error::{DevflowError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Prefix shared by every plugin name. `devflow init --plugin review` resolves
/// to `devflow-review`.
pub const PLUGIN_PREFIX: &str = "devflow-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Slash commands (`/review`). Never shared between plugins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<String>>,
    #[serde(default)]
    pub agents: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl PluginDefinition {
    pub fn commands(&self) -> &[String] {
        self.commands.as_deref().unwrap_or(&[])
    }

    /// Name without the `devflow-` prefix.
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix(PLUGIN_PREFIX).unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRegistry {
    pub plugins: Vec<PluginDefinition>,
}

impl PluginRegistry {
    pub fn new(plugins: Vec<PluginDefinition>) -> Result<Self> {
        let registry = Self { plugins };
        registry.validate()?;
        Ok(registry)
    }

    /// The plugin set shipped with this release.
    pub fn builtin() -> Self {
        Self {
            plugins: vec![
                plugin(
                    "devflow-core-skills",
                    "Auto-activating quality skills shared by every workflow",
                    &[],
                    &[],
                    &["core-patterns", "git-safety", "input-validation", "test-design"],
                ),
                plugin(
                    "devflow-specify",
                    "Turn a feature idea into a reviewed specification",
                    &["/specify"],
                    &["Skimmer", "Synthesizer"],
                    &["core-patterns"],
                ),
                plugin(
                    "devflow-implement",
                    "Plan, implement, and validate a task end to end",
                    &["/implement"],
                    &["Coder", "Skimmer", "Simplifier", "Validator"],
                    &["core-patterns", "implementation-patterns", "test-design"],
                ),
                plugin(
                    "devflow-review",
                    "Parallel multi-perspective code review",
                    &["/review"],
                    &["Reviewer", "Git", "Synthesizer"],
                    &["review-methodology", "security-patterns", "core-patterns"],
                ),
                plugin(
                    "devflow-resolve",
                    "Fix the issues raised by a review",
                    &["/resolve"],
                    &["Resolver", "Git", "Simplifier"],
                    &["review-methodology", "git-safety"],
                ),
                plugin(
                    "devflow-debug",
                    "Competing-hypothesis debugging",
                    &["/debug"],
                    &["Explore", "Synthesizer"],
                    &["debug-methodology", "git-safety"],
                ),
                plugin(
                    "devflow-self-review",
                    "Simplify and scrutinize your own changes before a PR",
                    &["/self-review"],
                    &["Simplifier", "Scrutinizer", "Validator"],
                    &["core-patterns", "test-design"],
                ),
            ],
        }
    }

    /// Load a registry from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let registry: PluginRegistry = serde_yaml::from_str(&data)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Load `{source_root}/plugins.yaml` when present, else the built-in registry.
    pub fn load_or_builtin(source_root: &Path) -> Result<Self> {
        let path = paths::registry_path(source_root);
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading plugin registry");
            Self::load(&path)
        } else {
            Ok(Self::builtin())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for plugin in &self.plugins {
            paths::validate_name(&plugin.name)?;
            if !seen.insert(plugin.name.as_str()) {
                return Err(DevflowError::InvalidRegistry(format!(
                    "duplicate plugin '{}'",
                    plugin.name
                )));
            }
            for command in plugin.commands() {
                paths::validate_name(command.trim_start_matches('/'))?;
            }
            for skill in &plugin.skills {
                paths::validate_name(skill)?;
            }
            for agent in &plugin.agents {
                if agent.is_empty()
                    || agent.contains(['/', '\\'])
                    || agent.starts_with('.')
                {
                    return Err(DevflowError::InvalidRegistry(format!(
                        "invalid agent name '{}' in plugin '{}'",
                        agent, plugin.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Look up a plugin by full name or by short name (`review`).
    pub fn get(&self, name: &str) -> Option<&PluginDefinition> {
        self.plugins
            .iter()
            .find(|p| p.name == name || p.short_name() == name)
    }

    /// Resolve requested names to plugin definitions, in registry order.
    ///
    /// An empty request selects every plugin. Unknown names are an error.
    pub fn select(&self, names: &[String]) -> Result<Vec<PluginDefinition>> {
        let selected: Vec<PluginDefinition> = if names.is_empty() {
            self.plugins.clone()
        } else {
            let mut wanted = HashSet::new();
            for name in names {
                let plugin = self
                    .get(name)
                    .ok_or_else(|| DevflowError::UnknownPlugin(name.clone()))?;
                wanted.insert(plugin.name.as_str());
            }
            self.plugins
                .iter()
                .filter(|p| wanted.contains(p.name.as_str()))
                .cloned()
                .collect()
        };
        if selected.is_empty() {
            return Err(DevflowError::NoPluginsSelected);
        }
        Ok(selected)
    }

    /// Every skill declared by any plugin, first-seen order.
    pub fn all_skills(&self) -> Vec<String> {
        union(self.plugins.iter().map(|p| &p.skills))
    }
}

fn union<'a>(lists: impl Iterator<Item = &'a Vec<String>>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for list in lists {
        for name in list {
            if seen.insert(name.as_str()) {
                out.push(name.clone());
            }
        }
    }
    out
}

fn plugin(
    name: &str,
    description: &str,
    commands: &[&str],
    agents: &[&str],
    skills: &[&str],
) -> PluginDefinition {
    let to_vec = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    PluginDefinition {
        name: name.to_string(),
        description: description.to_string(),
        commands: if commands.is_empty() {
            None
        } else {
            Some(to_vec(commands))
        },
        agents: to_vec(agents),
        skills: to_vec(skills),
    }
}
