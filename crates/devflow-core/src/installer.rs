//! Deduplicating asset installer.
//!
//! Commands from every selected plugin are copied unconditionally. Agents and
//! skills are copied only by the plugin that owns them in the ownership maps,
//! so an asset shared by several plugins is written once. A full install (no
//! plugin names requested) first removes the previous install.

use crate::error::Result;
use crate::io;
use crate::ownership::OwnershipMap;
use crate::paths::{self, InstallPaths};
use crate::progress::Progress;
use crate::registry::{PluginDefinition, PluginRegistry};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Mode applied to every installed script.
pub const SCRIPT_MODE: u32 = 0o755;

/// Source and destination roots for one install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    /// Destination: `~/.claude` or `<repo>/.claude`.
    pub claude_dir: PathBuf,
    /// Destination for shared scripts: `~/.devflow` or `<repo>/.devflow`.
    pub devflow_dir: PathBuf,
    /// Source: directory holding one subdirectory per plugin.
    pub plugins_dir: PathBuf,
    /// Source: package root holding `scripts/` and `templates/`.
    pub root_dir: PathBuf,
}

impl InstallLayout {
    pub fn new(paths: &InstallPaths, source_root: &Path) -> Self {
        Self {
            claude_dir: paths.claude_dir.clone(),
            devflow_dir: paths.devflow_dir.clone(),
            plugins_dir: paths::plugins_dir(source_root),
            root_dir: source_root.to_path_buf(),
        }
    }
}

/// Inputs to [`install_via_file_copy`].
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
    /// Plugins to install, in order.
    pub plugins: &'a [PluginDefinition],
    pub skills_map: &'a OwnershipMap,
    pub agents_map: &'a OwnershipMap,
    /// Names the user asked for. Empty means a full install.
    pub selected_plugin_names: &'a [String],
    /// Full registry, used to find every skill a previous install may have left.
    pub registry: &'a PluginRegistry,
}

impl InstallRequest<'_> {
    pub fn is_full_install(&self) -> bool {
        self.selected_plugin_names.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Agent,
    Skill,
}

/// An agent or skill a plugin declared but did not copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAsset {
    pub kind: AssetKind,
    pub name: String,
    pub plugin: String,
    /// `None` when the asset is missing from the ownership map.
    pub owner: Option<String>,
}

/// What an install wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    /// Whether the previous install was removed first.
    pub cleaned: bool,
    /// Command file names under `commands/devflow`.
    pub commands: Vec<String>,
    /// Agent names under `agents/devflow`.
    pub agents: Vec<String>,
    /// Skill directory names under `skills/`.
    pub skills: Vec<String>,
    pub skipped: Vec<SkippedAsset>,
    /// Number of script files installed.
    pub scripts: usize,
}

/// Copy the selected plugins' assets into `layout`.
///
/// Missing `commands/`, `agents/`, or `skills/` source directories mean the
/// plugin has none of that asset type. Any failure writing the destination
/// propagates; files already copied stay in place and a re-run completes the
/// install.
pub fn install_via_file_copy(
    layout: &InstallLayout,
    request: &InstallRequest<'_>,
    progress: &dyn Progress,
) -> Result<InstallReport> {
    progress.start("Installing components");
    let mut report = InstallReport::default();

    let commands_target = paths::commands_target(&layout.claude_dir);
    let agents_target = paths::agents_target(&layout.claude_dir);

    if request.is_full_install() {
        progress.message("Removing previous installation");
        remove_previous_install(&layout.claude_dir, request.registry);
        report.cleaned = true;
    }

    for plugin in request.plugins {
        progress.message(&format!("Installing {}", plugin.name));
        let source = paths::plugin_source(&layout.plugins_dir, &plugin.name);

        for (file_name, path) in list_entries(&source.join(paths::COMMANDS_DIR), EntryKind::File)? {
            io::copy_file(&path, &commands_target.join(&file_name))?;
            tracing::debug!(plugin = %plugin.name, command = %file_name, "installed command");
            report.commands.push(file_name);
        }

        for (file_name, path) in list_entries(&source.join(paths::AGENTS_DIR), EntryKind::File)? {
            let agent = agent_name(&file_name);
            if !request.agents_map.is_owner(&agent, &plugin.name) {
                tracing::debug!(plugin = %plugin.name, %agent, "agent owned elsewhere, skipping");
                report.skipped.push(SkippedAsset {
                    kind: AssetKind::Agent,
                    owner: request.agents_map.owner(&agent).map(str::to_string),
                    name: agent,
                    plugin: plugin.name.clone(),
                });
                continue;
            }
            io::copy_file(&path, &agents_target.join(&file_name))?;
            tracing::debug!(plugin = %plugin.name, %agent, "installed agent");
            report.agents.push(agent);
        }

        for (skill, path) in list_entries(&source.join(paths::SKILLS_DIR), EntryKind::Dir)? {
            if !request.skills_map.is_owner(&skill, &plugin.name) {
                tracing::debug!(plugin = %plugin.name, %skill, "skill owned elsewhere, skipping");
                report.skipped.push(SkippedAsset {
                    kind: AssetKind::Skill,
                    owner: request.skills_map.owner(&skill).map(str::to_string),
                    name: skill,
                    plugin: plugin.name.clone(),
                });
                continue;
            }
            io::copy_directory(&path, &paths::skill_target(&layout.claude_dir, &skill))?;
            tracing::debug!(plugin = %plugin.name, %skill, "installed skill");
            report.skills.push(skill);
        }
    }

    progress.message("Installing scripts");
    let scripts_target = paths::scripts_target(&layout.devflow_dir);
    report.scripts = io::copy_directory(&paths::scripts_source(&layout.root_dir), &scripts_target)?;
    io::chmod_recursive(&scripts_target, SCRIPT_MODE)?;

    progress.stop("Components installed");
    Ok(report)
}

/// Remove the namespaced command/agent directories and every skill the
/// registry knows about. Failures are logged and ignored.
fn remove_previous_install(claude_dir: &Path, registry: &PluginRegistry) {
    let mut targets = vec![paths::commands_target(claude_dir), paths::agents_target(claude_dir)];
    targets.extend(
        registry
            .all_skills()
            .iter()
            .map(|skill| paths::skill_target(claude_dir, skill)),
    );
    for target in targets {
        match io::remove_dir_if_exists(&target) {
            Ok(true) => tracing::debug!(path = %target.display(), "removed previous install"),
            Ok(false) => {}
            Err(e) => tracing::warn!(path = %target.display(), error = %e, "could not remove"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Dir,
}

/// Entries of `dir` of the given kind, sorted by name. A missing `dir` is empty.
fn list_entries(dir: &Path, kind: EntryKind) -> Result<Vec<(String, PathBuf)>> {
    let Some(entries) = io::read_dir_if_exists(dir)? else {
        return Ok(Vec::new());
    };
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let wanted = match kind {
            EntryKind::File => file_type.is_file(),
            EntryKind::Dir => file_type.is_dir(),
        };
        if wanted {
            out.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
        } else if file_type.is_symlink() {
            tracing::debug!(path = %entry.path().display(), "skipping symlink");
        }
    }
    out.sort();
    Ok(out)
}

fn agent_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}
