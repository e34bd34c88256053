//! Write-once project files: `CLAUDE.md` and `.claudeignore`.
//!
//! Both are user-editable after the first install, so an existing file is
//! never replaced.

use crate::error::{DevflowError, Result};
use crate::io;
use crate::paths;
use std::path::Path;

/// Create `{claude_dir}/CLAUDE.md` from the package template if absent.
/// Returns true if the file was created.
pub fn install_claude_md(claude_dir: &Path, root_dir: &Path) -> Result<bool> {
    let template = read_template(&paths::claude_md_template(root_dir))?;
    io::write_if_missing(&paths::claude_md_path(claude_dir), template.as_bytes())
}

/// Create `{git_root}/.claudeignore` from the package template if absent.
/// Returns true if the file was created.
pub fn install_claudeignore(git_root: &Path, root_dir: &Path) -> Result<bool> {
    let template = read_template(&paths::claudeignore_template(root_dir))?;
    io::write_if_missing(&git_root.join(paths::CLAUDEIGNORE_FILE), template.as_bytes())
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DevflowError::TemplateMissing(path.to_path_buf())
        } else {
            e.into()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn package(dir: &Path) -> std::path::PathBuf {
        let root = dir.join("pkg");
        std::fs::create_dir_all(root.join("templates")).unwrap();
        std::fs::write(root.join("templates/CLAUDE.md"), "# DevFlow\n").unwrap();
        std::fs::write(root.join("templates/claudeignore"), "node_modules/\n.env\n").unwrap();
        root
    }

    #[test]
    fn claude_md_written_once() {
        let dir = TempDir::new().unwrap();
        let root = package(dir.path());
        let claude = dir.path().join(".claude");

        assert!(install_claude_md(&claude, &root).unwrap());
        std::fs::write(claude.join("CLAUDE.md"), "# My edits\n").unwrap();
        assert!(!install_claude_md(&claude, &root).unwrap());
        assert_eq!(
            std::fs::read_to_string(claude.join("CLAUDE.md")).unwrap(),
            "# My edits\n"
        );
    }

    #[test]
    fn claudeignore_written_at_git_root() {
        let dir = TempDir::new().unwrap();
        let root = package(dir.path());
        let repo = dir.path().join("repo");
        std::fs::create_dir_all(&repo).unwrap();

        assert!(install_claudeignore(&repo, &root).unwrap());
        assert!(!install_claudeignore(&repo, &root).unwrap());
        assert!(std::fs::read_to_string(repo.join(".claudeignore"))
            .unwrap()
            .contains(".env"));
    }

    #[test]
    fn missing_template_reported() {
        let dir = TempDir::new().unwrap();
        let err = install_claude_md(&dir.path().join(".claude"), dir.path()).unwrap_err();
        assert!(matches!(err, DevflowError::TemplateMissing(_)));
    }

    #[cfg(unix)]
    #[test]
    fn write_failure_other_than_exists_propagates() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = package(dir.path());
        let locked = dir.path().join("locked");
        std::fs::create_dir_all(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o500)).unwrap();

        let result = install_claudeignore(&locked, &root);

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o700)).unwrap();
        // Root ignores directory permissions, so only assert when the write was refused.
        if let Err(err) = result {
            assert!(matches!(err, DevflowError::Io(_)));
        }
    }
}
