//! `settings.json` installation.
//!
//! The template references installed scripts through `${DEVFLOW_DIR}`. An
//! existing settings file is only replaced when the user asked for it.

use crate::confirm::{confirm_or_proceed, Confirm};
use crate::error::{DevflowError, Result};
use crate::io;
use crate::paths;
use serde::Serialize;
use std::path::Path;

pub const DEVFLOW_DIR_PLACEHOLDER: &str = "${DEVFLOW_DIR}";

/// Replace every `${DEVFLOW_DIR}` in `template` with `devflow_dir`.
pub fn substitute_settings_template(template: &str, devflow_dir: &str) -> String {
    template.replace(DEVFLOW_DIR_PLACEHOLDER, devflow_dir)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum SettingsOutcome {
    /// No settings existed; the generated file was written.
    Created,
    /// Existing settings were replaced after confirmation.
    Overwritten,
    /// Override was requested but the user declined.
    Declined,
    /// Existing settings were left untouched.
    Kept { missing_hooks: bool },
}

/// Install `{claude_dir}/settings.json` from `{root_dir}/templates/settings.json`.
pub fn install_settings(
    claude_dir: &Path,
    root_dir: &Path,
    devflow_dir: &Path,
    override_settings: bool,
    confirm: &dyn Confirm,
) -> Result<SettingsOutcome> {
    let template_path = paths::settings_template(root_dir);
    let template = match std::fs::read_to_string(&template_path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DevflowError::TemplateMissing(template_path))
        }
        Err(e) => return Err(e.into()),
    };
    let content = substitute_settings_template(&template, &devflow_dir.to_string_lossy());
    let settings_path = paths::settings_path(claude_dir);

    if io::write_if_missing(&settings_path, content.as_bytes())? {
        tracing::debug!(path = %settings_path.display(), "created settings");
        return Ok(SettingsOutcome::Created);
    }

    if override_settings {
        let prompt = format!(
            "{} already exists. Replace it with the DevFlow settings?",
            settings_path.display()
        );
        if !confirm_or_proceed(confirm, &prompt)? {
            return Ok(SettingsOutcome::Declined);
        }
        io::atomic_write(&settings_path, content.as_bytes())?;
        tracing::debug!(path = %settings_path.display(), "overwrote settings");
        return Ok(SettingsOutcome::Overwritten);
    }

    let missing_hooks = match std::fs::read_to_string(&settings_path) {
        Ok(existing) => lacks_hooks(&existing),
        Err(e) => {
            tracing::debug!(error = %e, "could not read existing settings");
            false
        }
    };
    if missing_hooks {
        tracing::warn!(path = %settings_path.display(), "existing settings have no hooks");
    }
    Ok(SettingsOutcome::Kept { missing_hooks })
}

/// True when `json` parses as an object without a `hooks` key.
/// Unparseable content is not reported.
fn lacks_hooks(json: &str) -> bool {
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(serde_json::Value::Object(map)) => !map.contains_key("hooks"),
        Ok(_) => true,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::AssumeYes;
    use tempfile::TempDir;

    const TEMPLATE: &str =
        r#"{"statusLine":{"command":"${DEVFLOW_DIR}/scripts/statusline.sh"},"hooks":{"Stop":"${DEVFLOW_DIR}/scripts/stop.sh"}}"#;

    struct Answer {
        interactive: bool,
        yes: bool,
    }

    impl Confirm for Answer {
        fn is_interactive(&self) -> bool {
            self.interactive
        }
        fn confirm(&self, _prompt: &str) -> Result<bool> {
            Ok(self.yes)
        }
    }

    fn setup() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("pkg");
        std::fs::create_dir_all(root.join("templates")).unwrap();
        std::fs::write(root.join("templates/settings.json"), TEMPLATE).unwrap();
        let claude = dir.path().join(".claude");
        (dir, root, claude)
    }

    #[test]
    fn substitutes_every_placeholder() {
        assert_eq!(
            substitute_settings_template("path=${DEVFLOW_DIR}/x", "/home/u/.devflow"),
            "path=/home/u/.devflow/x"
        );
        assert_eq!(
            substitute_settings_template("${DEVFLOW_DIR}:${DEVFLOW_DIR}", "/d"),
            "/d:/d"
        );
        assert_eq!(substitute_settings_template("no placeholder", "/d"), "no placeholder");
    }

    #[test]
    fn creates_when_absent() {
        let (_dir, root, claude) = setup();
        let outcome =
            install_settings(&claude, &root, Path::new("/opt/devflow"), false, &AssumeYes).unwrap();
        assert_eq!(outcome, SettingsOutcome::Created);
        let written = std::fs::read_to_string(claude.join("settings.json")).unwrap();
        assert!(written.contains("/opt/devflow/scripts/statusline.sh"));
        assert!(!written.contains(DEVFLOW_DIR_PLACEHOLDER));
    }

    #[test]
    fn keeps_existing_and_flags_missing_hooks() {
        let (_dir, root, claude) = setup();
        std::fs::create_dir_all(&claude).unwrap();
        std::fs::write(claude.join("settings.json"), r#"{"model":"opus"}"#).unwrap();

        let outcome = install_settings(&claude, &root, Path::new("/d"), false, &AssumeYes).unwrap();

        assert_eq!(outcome, SettingsOutcome::Kept { missing_hooks: true });
        assert_eq!(
            std::fs::read_to_string(claude.join("settings.json")).unwrap(),
            r#"{"model":"opus"}"#
        );
    }

    #[test]
    fn malformed_existing_settings_are_not_flagged() {
        let (_dir, root, claude) = setup();
        std::fs::create_dir_all(&claude).unwrap();
        std::fs::write(claude.join("settings.json"), "{ not json").unwrap();

        let outcome = install_settings(&claude, &root, Path::new("/d"), false, &AssumeYes).unwrap();
        assert_eq!(outcome, SettingsOutcome::Kept { missing_hooks: false });
    }

    #[test]
    fn override_asks_when_interactive() {
        let (_dir, root, claude) = setup();
        std::fs::create_dir_all(&claude).unwrap();
        std::fs::write(claude.join("settings.json"), "{}").unwrap();

        let no = Answer { interactive: true, yes: false };
        let outcome = install_settings(&claude, &root, Path::new("/d"), true, &no).unwrap();
        assert_eq!(outcome, SettingsOutcome::Declined);
        assert_eq!(std::fs::read_to_string(claude.join("settings.json")).unwrap(), "{}");

        let yes = Answer { interactive: true, yes: true };
        let outcome = install_settings(&claude, &root, Path::new("/d"), true, &yes).unwrap();
        assert_eq!(outcome, SettingsOutcome::Overwritten);
        assert!(std::fs::read_to_string(claude.join("settings.json"))
            .unwrap()
            .contains("/d/scripts/stop.sh"));
    }

    #[test]
    fn override_proceeds_without_terminal() {
        let (_dir, root, claude) = setup();
        std::fs::create_dir_all(&claude).unwrap();
        std::fs::write(claude.join("settings.json"), "{}").unwrap();

        // Would decline if asked, but nothing is asked without a terminal.
        let headless = Answer { interactive: false, yes: false };
        let outcome = install_settings(&claude, &root, Path::new("/d"), true, &headless).unwrap();
        assert_eq!(outcome, SettingsOutcome::Overwritten);
    }

    #[test]
    fn missing_template_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = install_settings(
            &dir.path().join(".claude"),
            dir.path(),
            Path::new("/d"),
            false,
            &AssumeYes,
        )
        .unwrap_err();
        assert!(matches!(err, DevflowError::TemplateMissing(_)));
    }
}
