use super::Context;
use crate::output::print_json;
use crate::ui::TerminalConfirm;
use anyhow::Context as _;
use devflow_core::{
    paths::Scope,
    uninstall::{uninstall_all, uninstall_plugins},
};

/// `devflow uninstall` — remove every plugin, or only those named.
///
/// Project `.docs/` is only considered for local scope.
pub fn run(
    ctx: &Context,
    plugin_names: &[String],
    scope: Scope,
    keep_docs: bool,
) -> anyhow::Result<()> {
    let target = ctx.install_paths(scope)?;
    let registry = ctx.registry()?;

    if !ctx.json {
        println!(
            "Uninstalling DevFlow ({scope} scope) from: {}",
            target.claude_dir.display()
        );
    }

    let report = if plugin_names.is_empty() {
        let docs_root = match scope {
            Scope::Local => target.git_root.as_deref(),
            Scope::User => None,
        };
        uninstall_all(&target, &registry, docs_root, keep_docs, &TerminalConfirm)
            .context("failed to uninstall DevFlow")?
    } else {
        let selected = registry.select(plugin_names)?;
        uninstall_plugins(&target, &registry, &selected)
            .context("failed to uninstall plugins")?
    };

    if ctx.json {
        return print_json(&report);
    }

    for path in &report.removed {
        println!("  removed: {}", path.display());
    }
    for name in &report.kept_shared {
        println!("  kept:    {name} (used by an installed plugin)");
    }
    if report.removed.is_empty() {
        println!("  nothing to remove");
    }
    println!("\nDevFlow uninstalled.");
    Ok(())
}
