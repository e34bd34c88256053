use super::Context;
use crate::output::print_json;
use crate::ui::{Spinner, TerminalConfirm};
use anyhow::Context as _;
use devflow_core::{
    docs, gitignore,
    installer::{install_via_file_copy, InstallLayout, InstallReport, InstallRequest},
    manifest::InstallManifest,
    ownership::build_asset_maps,
    paths::{self, Scope},
    settings::{install_settings, SettingsOutcome},
    templates,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Version of the devflow binary embedded at compile time.
pub const DEVFLOW_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
struct InitSummary {
    version: &'static str,
    scope: Scope,
    claude_dir: PathBuf,
    devflow_dir: PathBuf,
    plugins: Vec<String>,
    install: InstallReport,
    settings: SettingsOutcome,
    claude_md_created: bool,
    claudeignore_created: Option<bool>,
    gitignore_added: Vec<String>,
    docs_created: Vec<PathBuf>,
}

pub fn run(
    ctx: &Context,
    plugin_names: &[String],
    scope: Scope,
    override_settings: bool,
) -> anyhow::Result<()> {
    let source = ctx.source_root()?;
    let target = ctx.install_paths(scope)?;
    let registry = devflow_core::registry::PluginRegistry::load_or_builtin(&source)
        .context("failed to load plugin registry")?;
    let plugins = registry.select(plugin_names)?;
    let maps = build_asset_maps(&plugins);
    let say = |line: String| {
        if !ctx.json {
            println!("{line}");
        }
    };

    say(format!(
        "Installing DevFlow ({scope} scope) into: {}",
        target.claude_dir.display()
    ));
    for plugin in &plugins {
        say(format!("  plugin:  {}", plugin.name));
    }

    // 1. Commands, agents, skills, scripts
    let layout = InstallLayout::new(&target, &source);
    let request = InstallRequest {
        plugins: &plugins,
        skills_map: &maps.skills,
        agents_map: &maps.agents,
        selected_plugin_names: plugin_names,
        registry: &registry,
    };
    let spinner = Spinner::new(ctx.json);
    let install = install_via_file_copy(&layout, &request, &spinner)
        .context("failed to install plugin assets")?;
    drop(spinner);
    say(format!(
        "  {} commands, {} agents, {} skills, {} scripts",
        install.commands.len(),
        install.agents.len(),
        install.skills.len(),
        install.scripts
    ));

    // 2. settings.json
    let settings = install_settings(
        &target.claude_dir,
        &source,
        &target.devflow_dir,
        override_settings,
        &TerminalConfirm,
    )
    .context("failed to install settings.json")?;
    let settings_path = paths::settings_path(&target.claude_dir);
    match settings {
        SettingsOutcome::Created => say(format!("  created: {}", settings_path.display())),
        SettingsOutcome::Overwritten => say(format!("  updated: {}", settings_path.display())),
        SettingsOutcome::Declined => say(format!(
            "  skipped: {} (kept existing)",
            settings_path.display()
        )),
        SettingsOutcome::Kept { missing_hooks } => {
            say(format!(
                "  exists:  {} (use --override-settings to replace)",
                settings_path.display()
            ));
            if missing_hooks {
                say("  warning: existing settings.json has no \"hooks\"; DevFlow hooks will not run".to_string());
            }
        }
    }

    // 3. CLAUDE.md
    let claude_md_created = templates::install_claude_md(&target.claude_dir, &source)
        .context("failed to install CLAUDE.md")?;
    say(created_or_exists(
        claude_md_created,
        &paths::claude_md_path(&target.claude_dir),
    ));

    // 4. Project files: .claudeignore, .gitignore, .docs/
    let mut claudeignore_created = None;
    let mut gitignore_added = Vec::new();
    let mut docs_created = Vec::new();
    if let Some(git_root) = &target.git_root {
        let created = templates::install_claudeignore(git_root, &source)
            .context("failed to install .claudeignore")?;
        say(created_or_exists(created, &git_root.join(paths::CLAUDEIGNORE_FILE)));
        claudeignore_created = Some(created);

        if scope == Scope::Local {
            gitignore_added = gitignore::update_gitignore(git_root, &paths::GITIGNORE_ENTRIES)
                .context("failed to update .gitignore")?;
            if !gitignore_added.is_empty() {
                say(format!(
                    "  updated: .gitignore (added {})",
                    gitignore_added.join(", ")
                ));
            }
        }

        docs_created =
            docs::create_docs_structure(git_root).context("failed to create .docs/")?;
        for dir in &docs_created {
            say(format!("  created: {}", dir.display()));
        }
    }

    // 5. Manifest
    let previous = InstallManifest::load(&target.devflow_dir)
        .context("failed to read install manifest")?;
    let manifest = InstallManifest::record_install(
        previous.as_ref(),
        DEVFLOW_VERSION,
        scope,
        &plugins,
        request.is_full_install(),
        &registry,
    );
    manifest
        .save(&target.devflow_dir)
        .context("failed to write install manifest")?;

    if ctx.json {
        return print_json(&InitSummary {
            version: DEVFLOW_VERSION,
            scope,
            claude_dir: target.claude_dir.clone(),
            devflow_dir: target.devflow_dir.clone(),
            plugins: manifest.plugins,
            install,
            settings,
            claude_md_created,
            claudeignore_created,
            gitignore_added,
            docs_created,
        });
    }

    println!("\nDevFlow {DEVFLOW_VERSION} installed.");
    println!("Next: run /implement, /review, or /debug inside Claude Code");
    Ok(())
}

fn created_or_exists(created: bool, path: &Path) -> String {
    if created {
        format!("  created: {}", path.display())
    } else {
        format!("  exists:  {}", path.display())
    }
}
