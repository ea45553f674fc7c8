//! `topics` and `topic` commands

use tracing::instrument;

use crate::application::services::RecordRange;
use crate::cli::args::{
    MetadataArgs, MetadataCommands, MetadataSetArgs, TopicArgs, TopicCommands, TopicCreateArgs,
    TopicDeleteArgs, TopicUpdateArgs, TopicsArgs, TopicsCommands,
};
use crate::cli::error::CliResult;
use crate::cli::render::Renderer;
use crate::domain::{
    check_required, CreateTopicFlags, CreateTopicPayload, TopicMetadata, TopicMetadataFlags,
    TopicView, UpdateTopicFlags, UpdateTopicPayload,
};
use crate::infrastructure::di::ServiceContainer;

#[instrument(level = "debug", skip(container, out))]
pub fn list(container: &ServiceContainer, out: &mut Renderer, args: &TopicsArgs) -> CliResult<()> {
    match &args.command {
        Some(TopicsCommands::Keys { unwrap }) => {
            let keys = container.topics.config_keys()?;
            print_strings(out, "key", &keys, *unwrap)
        }
        Some(TopicsCommands::Metadata(meta)) => metadata(container, out, meta),
        None if args.names => {
            let names = container.topics.topic_names()?;
            print_strings(out, "name", &names, args.unwrap)
        }
        None => {
            let topics = container.topics.topics()?;
            out.list_filtered(&topics, |t: &TopicView| !t.topic.is_control_topic)
        }
    }
}

/// `--unwrap` prints raw lines; otherwise `[{field: value}]` in the selected format.
fn print_strings(out: &mut Renderer, field: &str, values: &[String], unwrap: bool) -> CliResult<()> {
    if unwrap {
        return out.lines(values, false);
    }
    out.names(field, values)
}

fn metadata(container: &ServiceContainer, out: &mut Renderer, args: &MetadataArgs) -> CliResult<()> {
    match &args.command {
        Some(MetadataCommands::Set(set)) => set_metadata(container, out, set),
        Some(MetadataCommands::Delete { name }) => {
            let name = name.as_ref().or(args.name.as_ref());
            check_required(&[("name", &name)])?;
            let name = name.map(String::as_str).unwrap_or_default();
            container.topics.delete_metadata(name)?;
            out.info(format!("Metadata for topic [{name}] deleted"))
        }
        None => match args.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => out.object(&container.topics.metadata_of(name)?),
            None => out.list(&container.topics.metadata()?),
        },
    }
}

fn set_metadata(container: &ServiceContainer, out: &mut Renderer, args: &MetadataSetArgs) -> CliResult<()> {
    let flags = TopicMetadataFlags {
        name: args.name.clone(),
        key_type: args.key_type.clone(),
        value_type: args.value_type.clone(),
        key_schema: args.key_schema.clone(),
        value_schema: args.value_schema.clone(),
    };
    let meta: TopicMetadata = container.payloads.resolve(args.file.as_deref(), &flags)?;
    check_required(&[("name", &meta.topic_name)])?;

    container.topics.set_metadata(&meta)?;
    out.info(format!(
        "Metadata for topic [{}] created/updated",
        meta.topic_name
    ))
}

#[instrument(level = "debug", skip(container, out))]
pub fn execute(container: &ServiceContainer, out: &mut Renderer, args: &TopicArgs) -> CliResult<()> {
    match &args.command {
        Some(TopicCommands::Create(create)) => create_topic(container, out, create),
        Some(TopicCommands::Update(update)) => update_topic(container, out, update),
        Some(TopicCommands::Delete(delete)) => delete_topic(container, out, delete, &args.name),
        None => {
            check_required(&[("name", &args.name)])?;
            let name = args.name.as_deref().unwrap_or_default();
            out.object(&container.topics.topic(name)?)
        }
    }
}

fn create_topic(container: &ServiceContainer, out: &mut Renderer, args: &TopicCreateArgs) -> CliResult<()> {
    let flags = CreateTopicFlags {
        name: args.name.clone(),
        replication: args.replication,
        partitions: args.partitions,
        configs: args.configs.clone(),
    };
    let payload: CreateTopicPayload = container.payloads.resolve(args.file.as_deref(), &flags)?;
    check_required(&[("name", &payload.topic_name)])?;

    container.topics.create(&payload)?;
    out.info(format!("Topic [{}] created", payload.topic_name))
}

fn update_topic(container: &ServiceContainer, out: &mut Renderer, args: &TopicUpdateArgs) -> CliResult<()> {
    let flags = UpdateTopicFlags {
        name: args.name.clone(),
        partitions: args.partitions,
        configs: args.configs.clone(),
    };
    let payload: UpdateTopicPayload = container.payloads.resolve(args.file.as_deref(), &flags)?;
    check_required(&[("name", &payload.topic_name)])?;

    container.topics.update(&payload)?;
    out.info(format!("Config updated for topic [{}]", payload.topic_name))
}

fn delete_topic(
    container: &ServiceContainer,
    out: &mut Renderer,
    args: &TopicDeleteArgs,
    parent_name: &Option<String>,
) -> CliResult<()> {
    let name = args.name.as_ref().or(parent_name.as_ref());
    check_required(&[("name", &name)])?;
    let name = name.map(String::as_str).unwrap_or_default();

    match RecordRange::from_flags(args.partition, args.offset)? {
        Some(range) => {
            container.topics.delete_records(name, range)?;
            out.info(format!(
                "Records from topic [{name}] and partition [{}] up to offset [{}] are marked for deletion. \
                 This may take a few moments to have effect",
                range.partition, range.offset
            ))
        }
        None => {
            container.topics.delete(name)?;
            out.info(format!(
                "Topic [{name}] marked for deletion. This may take a few moments to have effect"
            ))
        }
    }
}
