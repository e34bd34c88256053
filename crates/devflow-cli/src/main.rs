mod cmd;
mod output;
mod source;
mod ui;

use clap::{Parser, Subcommand, ValueEnum};
use devflow_core::paths::Scope;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "devflow",
    about = "Install DevFlow commands, agents, and skills into Claude Code",
    version,
    propagate_version = true
)]
struct Cli {
    /// DevFlow package directory holding plugins/, scripts/, and templates/
    /// (default: auto-detect from the current directory, then the executable)
    #[arg(long, global = true, env = "DEVFLOW_SOURCE")]
    source: Option<PathBuf>,

    /// Claude Code configuration directory for user scope (default: ~/.claude)
    #[arg(long, global = true, env = "CLAUDE_CODE_DIR", hide_env_values = true)]
    claude_dir: Option<PathBuf>,

    /// DevFlow data directory for user scope (default: ~/.devflow)
    #[arg(long, global = true, env = "DEVFLOW_DIR", hide_env_values = true)]
    devflow_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log every copied and skipped asset
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ScopeArg {
    /// ~/.claude and ~/.devflow, shared by every project
    User,
    /// .claude and .devflow in the current git repository
    Local,
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::User => Scope::User,
            ScopeArg::Local => Scope::Local,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Install DevFlow plugins (all of them unless --plugin is given)
    Init {
        /// Plugins to install, by name or short name (e.g. review,implement)
        #[arg(long, value_delimiter = ',')]
        plugin: Vec<String>,

        /// Installation scope
        #[arg(long, value_enum, default_value_t = ScopeArg::User)]
        scope: ScopeArg,

        /// Replace an existing settings.json (asks first in a terminal)
        #[arg(long)]
        override_settings: bool,
    },

    /// List available plugins and whether they are installed
    List {
        /// Installation scope to inspect
        #[arg(long, value_enum, default_value_t = ScopeArg::User)]
        scope: ScopeArg,
    },

    /// Remove DevFlow plugins (all of them unless --plugin is given)
    Uninstall {
        /// Plugins to remove, by name or short name
        #[arg(long, value_delimiter = ',')]
        plugin: Vec<String>,

        /// Installation scope
        #[arg(long, value_enum, default_value_t = ScopeArg::User)]
        scope: ScopeArg,

        /// Keep the project's .docs/ directory
        #[arg(long)]
        keep_docs: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = cmd::Context {
        source: cli.source,
        claude_dir: cli.claude_dir,
        devflow_dir: cli.devflow_dir,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Init {
            plugin,
            scope,
            override_settings,
        } => cmd::init::run(&ctx, &plugin, scope.into(), override_settings),
        Commands::List { scope } => cmd::list::run(&ctx, scope.into()),
        Commands::Uninstall {
            plugin,
            scope,
            keep_docs,
        } => cmd::uninstall::run(&ctx, &plugin, scope.into(), keep_docs),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
