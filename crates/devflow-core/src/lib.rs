//! DevFlow installer core.
//!
//! Installs plugin assets (commands, agents, skills) into Claude Code's
//! configuration directories. Shared agents and skills are copied once, by
//! the plugin that owns them.

pub mod confirm;
pub mod docs;
pub mod error;
pub mod gitignore;
pub mod installer;
pub mod io;
pub mod manifest;
pub mod ownership;
pub mod paths;
pub mod progress;
pub mod registry;
pub mod settings;
pub mod templates;
pub mod uninstall;

pub use error::{DevflowError, Result};
