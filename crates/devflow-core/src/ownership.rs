//! Asset ownership.
//!
//! Skills and agents may be declared by several plugins but are installed by
//! exactly one of them: the owner. Non-owners skip the copy so a shared asset
//! is written once per install.

use crate::registry::PluginDefinition;
use std::collections::BTreeMap;

/// Asset name → owning plugin name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipMap {
    owners: BTreeMap<String, String>,
}

impl OwnershipMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `plugin` as owner of `asset` unless the asset already has one.
    /// Returns true if `plugin` became the owner.
    pub fn claim(&mut self, asset: &str, plugin: &str) -> bool {
        if self.owners.contains_key(asset) {
            return false;
        }
        self.owners.insert(asset.to_string(), plugin.to_string());
        true
    }

    pub fn owner(&self, asset: &str) -> Option<&str> {
        self.owners.get(asset).map(String::as_str)
    }

    /// True only if `plugin` is the recorded owner. Unmapped assets have no owner.
    pub fn is_owner(&self, asset: &str, plugin: &str) -> bool {
        self.owner(asset) == Some(plugin)
    }

}

impl<A: Into<String>, P: Into<String>> FromIterator<(A, P)> for OwnershipMap {
    fn from_iter<I: IntoIterator<Item = (A, P)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (asset, plugin) in iter {
            let asset = asset.into();
            let plugin = plugin.into();
            map.claim(&asset, &plugin);
        }
        map
    }
}

/// Skill and agent ownership for one install.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetMaps {
    pub skills: OwnershipMap,
    pub agents: OwnershipMap,
}

/// Build ownership maps for `plugins`: the first plugin, in order, that
/// declares a skill or agent owns it.
pub fn build_asset_maps(plugins: &[PluginDefinition]) -> AssetMaps {
    let mut maps = AssetMaps::default();
    for plugin in plugins {
        for skill in &plugin.skills {
            maps.skills.claim(skill, &plugin.name);
        }
        for agent in &plugin.agents {
            maps.agents.claim(agent, &plugin.name);
        }
    }
    maps
}
