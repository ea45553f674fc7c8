//! lenses-cli: command-line client for the Lenses Kafka control plane
//!
//! Layers, innermost first:
//! - `domain`: resources, payload shapes and flag validation (no I/O)
//! - `application`: payload resolution, the remote client facade and services
//! - `infrastructure`: filesystem and HTTP transports, DI container
//! - `cli`: argument parsing, command dispatch and output rendering

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
