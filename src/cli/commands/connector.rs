//! `connectors` and `connector` commands

use tracing::instrument;

use crate::cli::args::{
    ConnectorArgs, ConnectorCommands, ConnectorTarget, ConnectorWriteArgs, ConnectorsArgs,
    ConnectorsCommands, TaskArgs, TaskCommands,
};
use crate::cli::error::CliResult;
use crate::cli::render::Renderer;
use crate::domain::{check_required, ClusterConnector, ConnectorFlags, ConnectorPayload};
use crate::infrastructure::di::ServiceContainer;

#[instrument(level = "debug", skip(container, out))]
pub fn list(container: &ServiceContainer, out: &mut Renderer, args: &ConnectorsArgs) -> CliResult<()> {
    match &args.command {
        Some(ConnectorsCommands::Plugins { cluster_name }) => plugins(container, out, cluster_name),
        Some(ConnectorsCommands::Clusters { names, no_newline }) => {
            clusters(container, out, *names, *no_newline)
        }
        None => connectors(container, out, args),
    }
}

fn connectors(container: &ServiceContainer, out: &mut Renderer, args: &ConnectorsArgs) -> CliResult<()> {
    check_required(&[("clusterName", &args.cluster_name)])?;
    let cluster = args.cluster_name.as_deref().unwrap_or_default();

    if args.names {
        let fan_out = container.connectors.connector_names(cluster)?;
        if let Some(partial) = fan_out.partial_error() {
            out.warn(partial)?;
        }
        return out.names("name", &fan_out.flatten());
    }

    let fan_out = container.connectors.connectors(cluster)?;
    if let Some(partial) = fan_out.partial_error() {
        out.warn(partial)?;
    }
    let connectors: Vec<ClusterConnector> = fan_out
        .items
        .into_iter()
        .flat_map(|(cluster, connectors)| {
            connectors.into_iter().map(move |connector| ClusterConnector {
                cluster: cluster.clone(),
                connector,
            })
        })
        .collect();
    out.list(&connectors)
}

fn plugins(
    container: &ServiceContainer,
    out: &mut Renderer,
    cluster_name: &Option<String>,
) -> CliResult<()> {
    check_required(&[("clusterName", cluster_name)])?;
    let fan_out = container
        .connectors
        .plugins(cluster_name.as_deref().unwrap_or_default())?;
    if let Some(partial) = fan_out.partial_error() {
        out.warn(partial)?;
    }
    out.list(&fan_out.flatten())
}

fn clusters(
    container: &ServiceContainer,
    out: &mut Renderer,
    names: bool,
    no_newline: bool,
) -> CliResult<()> {
    let clusters = container.connectors.clusters()?;
    if names {
        let names: Vec<String> = clusters.into_iter().map(|c| c.name).collect();
        return out.lines(&names, no_newline);
    }
    out.list(&clusters)
}

#[instrument(level = "debug", skip(container, out))]
pub fn execute(container: &ServiceContainer, out: &mut Renderer, args: &ConnectorArgs) -> CliResult<()> {
    let parent = &args.target;
    let service = &container.connectors;
    match &args.command {
        None => {
            let (cluster, name) = required_target(parent)?;
            out.object(&service.connector(&cluster, &name)?)
        }
        Some(ConnectorCommands::Create(write)) => create(container, out, write, parent),
        Some(ConnectorCommands::Update(write)) => update(container, out, write, parent),
        Some(ConnectorCommands::Config(target)) => {
            let (cluster, name) = required_target(&target.or(parent))?;
            out.object(&service.config(&cluster, &name)?)
        }
        Some(ConnectorCommands::Status(target)) => {
            let (cluster, name) = required_target(&target.or(parent))?;
            out.object(&service.status(&cluster, &name)?)
        }
        Some(ConnectorCommands::Pause(target)) => {
            let (cluster, name) = required_target(&target.or(parent))?;
            service.pause(&cluster, &name)?;
            out.info(format!("Connector {name} paused"))
        }
        Some(ConnectorCommands::Resume(target)) => {
            let (cluster, name) = required_target(&target.or(parent))?;
            service.resume(&cluster, &name)?;
            out.info(format!("Connector {name} resumed"))
        }
        Some(ConnectorCommands::Restart(target)) => {
            let (cluster, name) = required_target(&target.or(parent))?;
            service.restart(&cluster, &name)?;
            out.info(format!("Connector {name} restarted"))
        }
        Some(ConnectorCommands::Tasks(target)) => {
            let (cluster, name) = required_target(&target.or(parent))?;
            out.list(&service.tasks(&cluster, &name)?)
        }
        Some(ConnectorCommands::Delete(target)) => {
            let (cluster, name) = required_target(&target.or(parent))?;
            service.delete(&cluster, &name)?;
            out.info(format!("Connector {name} deleted"))
        }
        Some(ConnectorCommands::Task { command }) => task(container, out, command, parent),
    }
}

fn task(
    container: &ServiceContainer,
    out: &mut Renderer,
    command: &TaskCommands,
    parent: &ConnectorTarget,
) -> CliResult<()> {
    let (TaskCommands::Status(args) | TaskCommands::Restart(args)) = command;
    let (cluster, name, task) = required_task(args, parent)?;
    match command {
        TaskCommands::Status(_) => {
            out.object(&container.connectors.task_status(&cluster, &name, task)?)
        }
        TaskCommands::Restart(_) => {
            container.connectors.restart_task(&cluster, &name, task)?;
            out.info(format!("Connector {name} task {task} restarted"))
        }
    }
}

fn create(
    container: &ServiceContainer,
    out: &mut Renderer,
    args: &ConnectorWriteArgs,
    parent: &ConnectorTarget,
) -> CliResult<()> {
    let payload = resolve(container, args, parent)?;
    container.connectors.create(&payload)?;
    out.info(format!("Connector {} created", payload.name))
}

fn update(
    container: &ServiceContainer,
    out: &mut Renderer,
    args: &ConnectorWriteArgs,
    parent: &ConnectorTarget,
) -> CliResult<()> {
    let payload = resolve(container, args, parent)?;
    let updated = container.connectors.update(&payload)?;
    out.info(format!("Connector {} updated", payload.name))?;
    out.object(&updated)
}

fn resolve(
    container: &ServiceContainer,
    args: &ConnectorWriteArgs,
    parent: &ConnectorTarget,
) -> CliResult<ConnectorPayload> {
    let target = args.target.or(parent);
    let flags = ConnectorFlags {
        cluster: target.cluster_name,
        name: target.name,
        config: args.config.clone(),
    };
    let payload: ConnectorPayload = container.payloads.resolve(args.file.as_deref(), &flags)?;
    check_required(&[
        ("clusterName", &payload.cluster_alias),
        ("name", &payload.name),
    ])?;
    Ok(payload)
}

fn required_target(target: &ConnectorTarget) -> CliResult<(String, String)> {
    check_required(&[
        ("clusterName", &target.cluster_name),
        ("name", &target.name),
    ])?;
    Ok((
        target.cluster_name.clone().unwrap_or_default(),
        target.name.clone().unwrap_or_default(),
    ))
}

fn required_task(args: &TaskArgs, parent: &ConnectorTarget) -> CliResult<(String, String, u32)> {
    let target = args.target.or(parent);
    check_required(&[
        ("clusterName", &target.cluster_name),
        ("name", &target.name),
        // task 0 is a valid id, so check presence rather than zero
        ("task", &args.task.map(|t| t.to_string())),
    ])?;
    Ok((
        target.cluster_name.unwrap_or_default(),
        target.name.unwrap_or_default(),
        args.task.unwrap_or_default(),
    ))
}
