use crate::error::Result;
use crate::io;
use crate::paths;
use std::collections::HashSet;
use std::path::Path;

/// Comment written above entries DevFlow appends.
pub const GITIGNORE_BANNER: &str = "# DevFlow";

/// Entries from `entries` not already present in `existing` as a trimmed line.
///
/// Order is preserved, matching is case-sensitive, and an entry repeated in
/// `entries` is returned once.
pub fn compute_gitignore_append(existing: &str, entries: &[&str]) -> Vec<String> {
    let present: HashSet<&str> = existing.lines().map(str::trim).collect();
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|e| e.trim())
        .filter(|e| !present.contains(e) && seen.insert(*e))
        .map(str::to_string)
        .collect()
}

/// Append missing `entries` to `{root}/.gitignore` under the DevFlow banner,
/// creating the file if needed. Returns the entries appended.
pub fn update_gitignore(root: &Path, entries: &[&str]) -> Result<Vec<String>> {
    let path = root.join(paths::GITIGNORE_FILE);
    let existing = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let missing = compute_gitignore_append(&existing, entries);
    if missing.is_empty() {
        return Ok(missing);
    }

    let mut content = existing;
    if !content.is_empty() {
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content.push('\n');
    }
    content.push_str(GITIGNORE_BANNER);
    content.push('\n');
    for entry in &missing {
        content.push_str(entry);
        content.push('\n');
    }
    io::atomic_write(&path, content.as_bytes())?;
    Ok(missing)
}
