use super::Context;
use crate::output::{print_json, print_table};
use devflow_core::{manifest::InstallManifest, paths::Scope};
use serde::Serialize;

#[derive(Serialize)]
struct PluginListing<'a> {
    name: &'a str,
    description: &'a str,
    commands: &'a [String],
    agents: &'a [String],
    skills: &'a [String],
    installed: bool,
}

pub fn run(ctx: &Context, scope: Scope) -> anyhow::Result<()> {
    let registry = ctx.registry()?;
    let target = ctx.install_paths(scope)?;
    let manifest = InstallManifest::load(&target.devflow_dir)?;
    let is_installed =
        |name: &str| manifest.as_ref().is_some_and(|m| m.is_installed(name));

    let listings: Vec<PluginListing<'_>> = registry
        .plugins
        .iter()
        .map(|p| PluginListing {
            name: &p.name,
            description: &p.description,
            commands: p.commands(),
            agents: &p.agents,
            skills: &p.skills,
            installed: is_installed(&p.name),
        })
        .collect();

    if ctx.json {
        return print_json(&listings);
    }

    let rows = listings
        .iter()
        .map(|l| {
            vec![
                l.name.to_string(),
                if l.installed { "yes" } else { "-" }.to_string(),
                l.commands.join(" "),
                l.description.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    print_table(&["PLUGIN", "INSTALLED", "COMMANDS", "DESCRIPTION"], &rows);
    Ok(())
}
