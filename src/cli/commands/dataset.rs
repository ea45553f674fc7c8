//! `dataset` commands

use tracing::instrument;

use crate::cli::args::{DatasetCommands, DatasetTarget};
use crate::cli::error::CliResult;
use crate::cli::render::Renderer;
use crate::domain::{check_required, DomainError};
use crate::infrastructure::di::ServiceContainer;

#[instrument(level = "debug", skip(container, out))]
pub fn execute(container: &ServiceContainer, out: &mut Renderer, command: &DatasetCommands) -> CliResult<()> {
    let client = &container.client;
    match command {
        DatasetCommands::UpdateDescription {
            target,
            description,
        } => {
            let (connection, name) = required_target(target)?;
            check_required(&[("description", description)])?;
            let description = description.as_deref().unwrap_or_default();
            if description.trim().is_empty() {
                return Err(DomainError::invalid_flag(
                    "description",
                    "must not be blank; use remove-description to clear it",
                )
                .into());
            }
            client.update_dataset_description(connection, name, Some(description))?;
            out.info("Dataset description has been updated successfully")
        }
        DatasetCommands::UpdateTags { target, tags } => {
            let (connection, name) = required_target(target)?;
            check_required(&[("tag", tags)])?;
            if let Some(blank) = tags.iter().position(|t| t.trim().is_empty()) {
                return Err(DomainError::invalid_flag(
                    "tag",
                    format!("tag #{} is blank", blank + 1),
                )
                .into());
            }
            client.update_dataset_tags(connection, name, tags)?;
            out.info("Dataset tags have been updated successfully")
        }
        DatasetCommands::RemoveDescription(target) => {
            let (connection, name) = required_target(target)?;
            client.update_dataset_description(connection, name, None)?;
            out.info("Dataset description has been removed")
        }
        DatasetCommands::RemoveTags(target) => {
            let (connection, name) = required_target(target)?;
            client.update_dataset_tags(connection, name, &[])?;
            out.info("Dataset tags have been removed")
        }
    }
}

fn required_target(target: &DatasetTarget) -> CliResult<(&str, &str)> {
    check_required(&[("connection", &target.connection), ("name", &target.name)])?;
    Ok((
        target.connection.as_deref().unwrap_or_default(),
        target.name.as_deref().unwrap_or_default(),
    ))
}
