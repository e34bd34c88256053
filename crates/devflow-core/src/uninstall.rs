//! Removal of installed assets.
//!
//! User configuration (`settings.json`, `CLAUDE.md`, `.claudeignore`,
//! `.gitignore`) is never removed.

use crate::confirm::{confirm_or_proceed, Confirm};
use crate::error::Result;
use crate::io;
use crate::manifest::InstallManifest;
use crate::paths::{self, InstallPaths};
use crate::registry::{PluginDefinition, PluginRegistry};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UninstallReport {
    /// Paths that existed and were removed.
    pub removed: Vec<PathBuf>,
    /// Agents and skills left in place because a remaining plugin declares them.
    pub kept_shared: Vec<String>,
    pub docs_removed: bool,
    /// Plugins still installed afterwards.
    pub remaining: Vec<String>,
}

impl UninstallReport {
    fn remove_dir(&mut self, path: PathBuf) -> Result<()> {
        if io::remove_dir_if_exists(&path)? {
            tracing::debug!(path = %path.display(), "removed");
            self.removed.push(path);
        }
        Ok(())
    }

    fn remove_file(&mut self, path: PathBuf) -> Result<()> {
        if io::remove_file_if_exists(&path)? {
            tracing::debug!(path = %path.display(), "removed");
            self.removed.push(path);
        }
        Ok(())
    }
}

/// Remove everything DevFlow installed in this scope.
///
/// `.docs` under `docs_root` is removed too unless `keep_docs`; in a terminal
/// the user confirms first.
pub fn uninstall_all(
    target: &InstallPaths,
    registry: &PluginRegistry,
    docs_root: Option<&Path>,
    keep_docs: bool,
    confirm: &dyn Confirm,
) -> Result<UninstallReport> {
    let mut report = UninstallReport::default();
    let claude = &target.claude_dir;

    report.remove_dir(paths::commands_target(claude))?;
    report.remove_dir(paths::agents_target(claude))?;
    for skill in registry.all_skills() {
        report.remove_dir(paths::skill_target(claude, &skill))?;
    }
    report.remove_dir(paths::scripts_target(&target.devflow_dir))?;
    report.remove_file(paths::manifest_path(&target.devflow_dir))?;
    // Leaves the directory alone when the user keeps other files in it.
    if std::fs::remove_dir(&target.devflow_dir).is_ok() {
        report.removed.push(target.devflow_dir.clone());
    }

    let docs_root = if keep_docs { None } else { docs_root };
    if let Some(root) = docs_root {
        let docs = root.join(paths::DOCS_DIR);
        if docs.is_dir() {
            let prompt = format!("Remove {} and everything in it?", docs.display());
            if confirm_or_proceed(confirm, &prompt)? {
                report.remove_dir(docs)?;
                report.docs_removed = true;
            }
        }
    }

    Ok(report)
}

/// Remove `selected` plugins, keeping agents and skills that a remaining
/// plugin still declares.
///
/// Remaining plugins come from the manifest. Without a manifest every other
/// registry plugin counts as remaining.
pub fn uninstall_plugins(
    target: &InstallPaths,
    registry: &PluginRegistry,
    selected: &[PluginDefinition],
) -> Result<UninstallReport> {
    let mut report = UninstallReport::default();
    let claude = &target.claude_dir;
    let removing: HashSet<&str> = selected.iter().map(|p| p.name.as_str()).collect();

    let manifest = InstallManifest::load(&target.devflow_dir)?;
    let remaining: Vec<&PluginDefinition> = match &manifest {
        Some(m) => m
            .plugins
            .iter()
            .filter_map(|name| registry.get(name))
            .filter(|p| !removing.contains(p.name.as_str()))
            .collect(),
        None => registry
            .plugins
            .iter()
            .filter(|p| !removing.contains(p.name.as_str()))
            .collect(),
    };
    let shared_agents: HashSet<&str> = remaining
        .iter()
        .flat_map(|p| p.agents.iter().map(String::as_str))
        .collect();
    let shared_skills: HashSet<&str> = remaining
        .iter()
        .flat_map(|p| p.skills.iter().map(String::as_str))
        .collect();

    for plugin in selected {
        for command in plugin.commands() {
            report.remove_file(paths::command_file(claude, command))?;
        }
        for agent in &plugin.agents {
            if shared_agents.contains(agent.as_str()) {
                push_unique(&mut report.kept_shared, agent);
            } else {
                report.remove_file(paths::agent_file(claude, agent))?;
            }
        }
        for skill in &plugin.skills {
            if shared_skills.contains(skill.as_str()) {
                push_unique(&mut report.kept_shared, skill);
            } else {
                report.remove_dir(paths::skill_target(claude, skill))?;
            }
        }
    }

    report.remaining = remaining.iter().map(|p| p.name.clone()).collect();
    if let Some(mut m) = manifest {
        m.plugins.retain(|name| {
            registry
                .get(name)
                .map_or(true, |p| !removing.contains(p.name.as_str()))
        });
        m.save(&target.devflow_dir)?;
    }

    Ok(report)
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::AssumeYes;
    use crate::paths::Scope;
    use chrono::Utc;
    use tempfile::TempDir;

    struct Decline;

    impl Confirm for Decline {
        fn is_interactive(&self) -> bool {
            true
        }
        fn confirm(&self, _prompt: &str) -> Result<bool> {
            Ok(false)
        }
    }

    fn plugin(name: &str, commands: &[&str], agents: &[&str], skills: &[&str]) -> PluginDefinition {
        PluginDefinition {
            name: name.to_string(),
            description: String::new(),
            commands: Some(commands.iter().map(|s| s.to_string()).collect()),
            agents: agents.iter().map(|s| s.to_string()).collect(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn registry() -> PluginRegistry {
        PluginRegistry::new(vec![
            plugin("review", &["/review"], &["Reviewer", "Git"], &["review-methodology"]),
            plugin(
                "implement",
                &["/implement"],
                &["Coder", "Git"],
                &["review-methodology", "core-patterns"],
            ),
        ])
        .unwrap()
    }

    fn installed(dir: &Path) -> InstallPaths {
        let paths = InstallPaths {
            scope: Scope::User,
            claude_dir: dir.join(".claude"),
            devflow_dir: dir.join(".devflow"),
            git_root: None,
        };
        let c = &paths.claude_dir;
        for file in [
            "commands/devflow/review.md",
            "commands/devflow/implement.md",
            "agents/devflow/Reviewer.md",
            "agents/devflow/Git.md",
            "agents/devflow/Coder.md",
            "skills/review-methodology/SKILL.md",
            "skills/core-patterns/SKILL.md",
            "skills/user-skill/SKILL.md",
            "settings.json",
        ] {
            let path = c.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "x").unwrap();
        }
        std::fs::create_dir_all(paths.devflow_dir.join("scripts")).unwrap();
        std::fs::write(paths.devflow_dir.join("scripts/statusline.sh"), "x").unwrap();
        InstallManifest {
            version: "0.1.0".to_string(),
            scope: Scope::User,
            plugins: vec!["review".to_string(), "implement".to_string()],
            installed_at: Utc::now(),
        }
        .save(&paths.devflow_dir)
        .unwrap();
        paths
    }

    #[test]
    fn uninstall_all_removes_assets_but_not_user_files() {
        let dir = TempDir::new().unwrap();
        let paths = installed(dir.path());
        std::fs::create_dir_all(dir.path().join(".docs/reviews")).unwrap();

        let report =
            uninstall_all(&paths, &registry(), Some(dir.path()), false, &AssumeYes).unwrap();

        let c = &paths.claude_dir;
        assert!(!c.join("commands/devflow").exists());
        assert!(!c.join("agents/devflow").exists());
        assert!(!c.join("skills/review-methodology").exists());
        assert!(!c.join("skills/core-patterns").exists());
        assert!(c.join("skills/user-skill/SKILL.md").exists());
        assert!(c.join("settings.json").exists());
        assert!(!paths.devflow_dir.exists());
        assert!(report.docs_removed);
        assert!(!dir.path().join(".docs").exists());
    }

    #[test]
    fn uninstall_all_keeps_docs_when_asked() {
        let dir = TempDir::new().unwrap();
        let paths = installed(dir.path());
        std::fs::create_dir_all(dir.path().join(".docs/reviews")).unwrap();

        let report =
            uninstall_all(&paths, &registry(), Some(dir.path()), true, &AssumeYes).unwrap();
        assert!(!report.docs_removed);
        assert!(dir.path().join(".docs/reviews").is_dir());

        let report = uninstall_all(&paths, &registry(), Some(dir.path()), false, &Decline).unwrap();
        assert!(!report.docs_removed);
        assert!(dir.path().join(".docs/reviews").is_dir());
    }

    #[test]
    fn uninstall_all_on_clean_system_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let paths = InstallPaths {
            scope: Scope::User,
            claude_dir: dir.path().join(".claude"),
            devflow_dir: dir.path().join(".devflow"),
            git_root: None,
        };
        let report = uninstall_all(&paths, &registry(), None, false, &AssumeYes).unwrap();
        assert!(report.removed.is_empty());
    }

    #[test]
    fn uninstall_plugin_keeps_shared_assets() {
        let dir = TempDir::new().unwrap();
        let paths = installed(dir.path());
        let registry = registry();
        let selected = registry.select(&["review".to_string()]).unwrap();

        let report = uninstall_plugins(&paths, &registry, &selected).unwrap();

        let c = &paths.claude_dir;
        assert!(!c.join("commands/devflow/review.md").exists());
        assert!(!c.join("agents/devflow/Reviewer.md").exists());
        assert!(c.join("commands/devflow/implement.md").exists());
        assert!(c.join("agents/devflow/Git.md").exists());
        assert!(c.join("skills/review-methodology/SKILL.md").exists());
        assert_eq!(report.kept_shared, ["Git", "review-methodology"]);
        assert_eq!(report.remaining, ["implement"]);

        let manifest = InstallManifest::load(&paths.devflow_dir).unwrap().unwrap();
        assert_eq!(manifest.plugins, ["implement"]);
    }

    #[test]
    fn uninstall_last_plugin_removes_shared_assets() {
        let dir = TempDir::new().unwrap();
        let paths = installed(dir.path());
        let registry = registry();
        let selected = registry.select(&[]).unwrap();

        let report = uninstall_plugins(&paths, &registry, &selected).unwrap();

        assert!(report.kept_shared.is_empty());
        assert!(report.remaining.is_empty());
        assert!(!paths.claude_dir.join("skills/review-methodology").exists());
        assert!(!paths.claude_dir.join("agents/devflow/Git.md").exists());
    }
}
