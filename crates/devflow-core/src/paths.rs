use crate::error::{DevflowError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CLAUDE_DIR: &str = ".claude";
pub const DEVFLOW_DIR: &str = ".devflow";

/// Namespace under `commands/` and `agents/`. Skills are installed flat.
pub const NAMESPACE: &str = "devflow";

pub const COMMANDS_DIR: &str = "commands";
pub const AGENTS_DIR: &str = "agents";
pub const SKILLS_DIR: &str = "skills";
pub const SCRIPTS_DIR: &str = "scripts";
pub const PLUGINS_DIR: &str = "plugins";
pub const TEMPLATES_DIR: &str = "templates";

pub const SETTINGS_FILE: &str = "settings.json";
pub const CLAUDE_MD: &str = "CLAUDE.md";
pub const CLAUDEIGNORE_FILE: &str = ".claudeignore";
pub const CLAUDEIGNORE_TEMPLATE: &str = "claudeignore";
pub const GITIGNORE_FILE: &str = ".gitignore";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const REGISTRY_FILE: &str = "plugins.yaml";

pub const DOCS_DIR: &str = ".docs";
pub const DOCS_SUBDIRS: [&str; 3] = [".docs/status/compact", ".docs/reviews", ".docs/releases"];

/// Entries every local install must keep out of version control.
pub const GITIGNORE_ENTRIES: [&str; 2] = [".claude/", ".devflow/"];

// ---------------------------------------------------------------------------
// Install targets
// ---------------------------------------------------------------------------

pub fn commands_target(claude_dir: &Path) -> PathBuf {
    claude_dir.join(COMMANDS_DIR).join(NAMESPACE)
}

pub fn agents_target(claude_dir: &Path) -> PathBuf {
    claude_dir.join(AGENTS_DIR).join(NAMESPACE)
}

pub fn skills_root(claude_dir: &Path) -> PathBuf {
    claude_dir.join(SKILLS_DIR)
}

pub fn skill_target(claude_dir: &Path, skill: &str) -> PathBuf {
    skills_root(claude_dir).join(skill)
}

pub fn agent_file(claude_dir: &Path, agent: &str) -> PathBuf {
    agents_target(claude_dir).join(format!("{agent}.md"))
}

pub fn command_file(claude_dir: &Path, command: &str) -> PathBuf {
    let name = command.trim_start_matches('/');
    commands_target(claude_dir).join(format!("{name}.md"))
}

pub fn scripts_target(devflow_dir: &Path) -> PathBuf {
    devflow_dir.join(SCRIPTS_DIR)
}

pub fn settings_path(claude_dir: &Path) -> PathBuf {
    claude_dir.join(SETTINGS_FILE)
}

pub fn claude_md_path(claude_dir: &Path) -> PathBuf {
    claude_dir.join(CLAUDE_MD)
}

pub fn manifest_path(devflow_dir: &Path) -> PathBuf {
    devflow_dir.join(MANIFEST_FILE)
}

// ---------------------------------------------------------------------------
// Package sources
// ---------------------------------------------------------------------------

pub fn plugins_dir(source_root: &Path) -> PathBuf {
    source_root.join(PLUGINS_DIR)
}

pub fn plugin_source(plugins_dir: &Path, plugin: &str) -> PathBuf {
    plugins_dir.join(plugin)
}

pub fn scripts_source(source_root: &Path) -> PathBuf {
    source_root.join(SCRIPTS_DIR)
}

pub fn registry_path(source_root: &Path) -> PathBuf {
    source_root.join(REGISTRY_FILE)
}

pub fn settings_template(source_root: &Path) -> PathBuf {
    source_root.join(TEMPLATES_DIR).join(SETTINGS_FILE)
}

pub fn claude_md_template(source_root: &Path) -> PathBuf {
    source_root.join(TEMPLATES_DIR).join(CLAUDE_MD)
}

pub fn claudeignore_template(source_root: &Path) -> PathBuf {
    source_root.join(TEMPLATES_DIR).join(CLAUDEIGNORE_TEMPLATE)
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Where an installation lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// `~/.claude/` and `~/.devflow/`, shared by every project.
    #[default]
    User,
    /// `.claude/` and `.devflow/` inside the current git repository.
    Local,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::User => "user",
            Scope::Local => "local",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved destination directories for one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPaths {
    pub scope: Scope,
    pub claude_dir: PathBuf,
    pub devflow_dir: PathBuf,
    /// Repository containing the working directory, if any.
    pub git_root: Option<PathBuf>,
}

impl InstallPaths {
    /// Resolve install directories for `scope`.
    ///
    /// User scope honours the `claude_dir`/`devflow_dir` overrides and otherwise
    /// uses the home directory. Local scope requires a git repository above `cwd`.
    pub fn resolve(
        scope: Scope,
        cwd: &Path,
        claude_dir: Option<&Path>,
        devflow_dir: Option<&Path>,
    ) -> Result<Self> {
        let git_root = find_git_root(cwd);
        match scope {
            Scope::User => {
                let claude_dir = match claude_dir {
                    Some(p) => p.to_path_buf(),
                    None => home_dir()?.join(CLAUDE_DIR),
                };
                let devflow_dir = match devflow_dir {
                    Some(p) => p.to_path_buf(),
                    None => home_dir()?.join(DEVFLOW_DIR),
                };
                Ok(Self {
                    scope,
                    claude_dir,
                    devflow_dir,
                    git_root,
                })
            }
            Scope::Local => {
                let root = git_root.ok_or(DevflowError::NotAGitRepository)?;
                Ok(Self {
                    scope,
                    claude_dir: root.join(CLAUDE_DIR),
                    devflow_dir: root.join(DEVFLOW_DIR),
                    git_root: Some(root),
                })
            }
        }
    }
}

fn home_dir() -> Result<PathBuf> {
    home::home_dir().ok_or(DevflowError::HomeNotFound)
}

/// Walk upward from `start` looking for `.git` (a directory, or a file for worktrees).
pub fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(".git").exists() {
            return Some(dir);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}

// ---------------------------------------------------------------------------
// Name validation
// ---------------------------------------------------------------------------

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").expect("static regex is valid")
    })
}

/// Plugin and skill names become directory names, so they must be slugs.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 64 || !name_re().is_match(name) {
        return Err(DevflowError::InvalidName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
