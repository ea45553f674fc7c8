//! Command dispatch
//!
//! Each module maps one command group onto the services in the [`ServiceContainer`] and
//! prints through a [`Renderer`].

mod alert;
mod config;
mod connector;
mod dataset;
mod topic;

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands};
use crate::cli::error::CliResult;
use crate::cli::render::Renderer;
use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Load settings, connect and run the parsed command against stdout/stderr.
pub fn run(cli: &Cli) -> CliResult<()> {
    let cwd = current_dir();
    let settings = Settings::load(Some(cwd.as_path()))?.merge_with(&cli.global.overrides());
    debug!("effective settings: {:?}", settings);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut stdout = stdout.lock();
    let mut stderr = stderr.lock();
    let mut out = Renderer::new(settings.output, cli.global.silent, &mut stdout, &mut stderr);

    match &cli.command {
        command @ (Commands::Config { .. } | Commands::Completion { .. }) => {
            offline(command, &RealFileSystem, &settings, &mut out)
        }
        command => {
            let container = ServiceContainer::new(settings)?;
            execute_command(command, &container, &mut out)
        }
    }
}

/// Run one command with the given services.
#[instrument(level = "debug", skip(container, out))]
pub fn execute_command(
    command: &Commands,
    container: &ServiceContainer,
    out: &mut Renderer,
) -> CliResult<()> {
    match command {
        Commands::Connectors(args) => connector::list(container, out, args),
        Commands::Connector(args) => connector::execute(container, out, args),
        Commands::Topics(args) => topic::list(container, out, args),
        Commands::Topic(args) => topic::execute(container, out, args),
        Commands::Alerts(args) => alert::list(container, out, args),
        Commands::Alert { command } => alert::execute(container, out, command),
        Commands::Dataset { command } => dataset::execute(container, out, command),
        Commands::Config { .. } | Commands::Completion { .. } => {
            offline(command, container.fs.as_ref(), &container.settings, out)
        }
    }
}

/// Commands that never reach the control plane.
fn offline(
    command: &Commands,
    fs: &dyn FileSystem,
    settings: &Settings,
    out: &mut Renderer,
) -> CliResult<()> {
    match command {
        Commands::Config { command } => config::execute(fs, settings, &current_dir(), out, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            let mut script = Vec::new();
            clap_complete::generate(*shell, &mut cmd, name, &mut script);
            out.text(&String::from_utf8_lossy(&script))
        }
        _ => Ok(()),
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
