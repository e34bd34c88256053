use crate::error::Result;
use crate::io;
use crate::paths;
use std::path::{Path, PathBuf};

/// Create `.docs/status/compact`, `.docs/reviews`, and `.docs/releases` under
/// `project_root`. Returns the directories that did not exist before.
pub fn create_docs_structure(project_root: &Path) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for dir in paths::DOCS_SUBDIRS {
        let path = project_root.join(dir);
        if !path.is_dir() {
            io::ensure_dir(&path)?;
            created.push(path);
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_tree_once() {
        let dir = TempDir::new().unwrap();
        let created = create_docs_structure(dir.path()).unwrap();
        assert_eq!(created.len(), 3);
        assert!(dir.path().join(".docs/status/compact").is_dir());
        assert!(dir.path().join(".docs/reviews").is_dir());
        assert!(dir.path().join(".docs/releases").is_dir());

        assert!(create_docs_structure(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn keeps_existing_docs() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".docs/reviews")).unwrap();
        std::fs::write(dir.path().join(".docs/reviews/2026-10-01.md"), "notes").unwrap();

        let created = create_docs_structure(dir.path()).unwrap();

        assert_eq!(created.len(), 2);
        assert!(dir.path().join(".docs/reviews/2026-10-01.md").exists());
    }
}
