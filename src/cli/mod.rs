//! CLI layer: argument parsing, command dispatch and output

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod render;

pub use args::{Cli, Commands};
pub use error::{CliError, CliResult};
pub use render::Renderer;
