use std::path::{Path, PathBuf};

/// A DevFlow package ships `plugins/` and `templates/` side by side.
pub fn is_package_root(dir: &Path) -> bool {
    dir.join("plugins").is_dir() && dir.join("templates").is_dir()
}

/// Resolve the DevFlow package directory.
///
/// Priority:
/// 1. `--source` flag / `DEVFLOW_SOURCE` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for a package root
/// 3. Walk upward from the running executable, checking `share/devflow` at each level
pub fn resolve_source(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        if !is_package_root(p) {
            anyhow::bail!(
                "{} is not a DevFlow package (expected plugins/ and templates/)",
                p.display()
            );
        }
        return Ok(p.to_path_buf());
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if let Some(found) = walk_up(&cwd) {
        return Ok(found);
    }

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        if let Some(found) = walk_up(&exe_dir) {
            return Ok(found);
        }
    }

    anyhow::bail!("could not locate the DevFlow package: pass --source or set DEVFLOW_SOURCE")
}

fn walk_up(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if is_package_root(&dir) {
            return Some(dir);
        }
        let shared = dir.join("share").join("devflow");
        if is_package_root(&shared) {
            return Some(shared);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}
