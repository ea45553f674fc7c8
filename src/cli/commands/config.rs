//! `config` commands
//!
//! These run without a remote connection, so a missing host is not an error here.

use std::path::Path;

use crate::application::{ApplicationError, IoResultExt};
use crate::cli::args::ConfigCommands;
use crate::cli::error::CliResult;
use crate::cli::render::Renderer;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::traits::FileSystem;

pub fn execute(
    fs: &dyn FileSystem,
    settings: &Settings,
    cwd: &Path,
    out: &mut Renderer,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => out.text(&settings.to_toml()?),
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path()
                    .ok_or_else(|| ApplicationError::config("no home directory for the global config"))?
            } else {
                local_config_path(cwd)
            };
            init(fs, &path)?;
            out.info(format!("Created {}", path.display()))
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| describe(fs, &p))
                .unwrap_or_else(|| "(no home directory)".to_string());
            let local = describe(fs, &local_config_path(cwd));
            out.text(&format!("global: {global}\nlocal:  {local}\n"))
        }
    }
}

/// Write the template to `path`; an existing file is left alone.
fn init(fs: &dyn FileSystem, path: &Path) -> CliResult<()> {
    if fs.exists(path) {
        return Err(ApplicationError::config(format!(
            "{} already exists",
            path.display()
        ))
        .into());
    }
    fs.ensure_parent(path)
        .with_path_context("create config directory", path)?;
    fs.write(path, &Settings::template())
        .with_path_context("write config", path)?;
    Ok(())
}

fn describe(fs: &dyn FileSystem, path: &Path) -> String {
    let state = if fs.exists(path) { "" } else { " (not found)" };
    format!("{}{state}", path.display())
}
