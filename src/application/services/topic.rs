//! Topic service: listings, views and topic metadata

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::client::LensesClient;
use crate::application::error_ext::RemoteResultExt;
use crate::application::ApplicationResult;
use crate::domain::{
    CreateTopicPayload, DomainError, TopicMetadata, TopicMetadataView, TopicView,
    UpdateTopicPayload,
};

/// Records to delete from a topic: one partition up to an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordRange {
    pub partition: u32,
    pub offset: u64,
}

impl RecordRange {
    /// Both values must be given and non-negative; neither given means "delete the topic".
    pub fn from_flags(partition: i32, offset: i64) -> Result<Option<Self>, DomainError> {
        match (partition, offset) {
            (p, o) if p < 0 && o < 0 => Ok(None),
            (p, _) if p < 0 => Err(DomainError::invalid_flag(
                "partition",
                "must be non-negative when --offset is set",
            )),
            (_, o) if o < 0 => Err(DomainError::invalid_flag(
                "offset",
                "must be non-negative when --partition is set",
            )),
            (p, o) => Ok(Some(Self {
                partition: p as u32,
                offset: o as u64,
            })),
        }
    }
}

pub struct TopicService {
    client: Arc<LensesClient>,
}

impl TopicService {
    pub fn new(client: Arc<LensesClient>) -> Self {
        Self { client }
    }

    /// All topics as views, sorted by name.
    pub fn topics(&self) -> ApplicationResult<Vec<TopicView>> {
        let mut topics = self.client.topics()?;
        topics.sort_by(|a, b| a.topic_name.cmp(&b.topic_name));
        debug!("topics: {} topics", topics.len());
        Ok(topics.into_iter().map(TopicView::new).collect())
    }

    pub fn topic_names(&self) -> ApplicationResult<Vec<String>> {
        let mut names = self.client.topic_names()?;
        names.sort();
        Ok(names)
    }

    pub fn topic(&self, name: &str) -> ApplicationResult<TopicView> {
        self.client
            .topic(name)
            .map(TopicView::new)
            .not_found_hint(|| missing(name))
    }

    #[instrument(level = "debug", skip_all, fields(topic = %payload.topic_name))]
    pub fn create(&self, payload: &CreateTopicPayload) -> ApplicationResult<()> {
        self.client.create_topic(payload)
    }

    pub fn update(&self, payload: &UpdateTopicPayload) -> ApplicationResult<()> {
        self.client
            .update_topic(payload)
            .not_found_hint(|| missing(&payload.topic_name))
    }

    pub fn delete(&self, name: &str) -> ApplicationResult<()> {
        self.client.delete_topic(name).not_found_hint(|| missing(name))
    }

    pub fn delete_records(&self, name: &str, range: RecordRange) -> ApplicationResult<()> {
        self.client
            .delete_topic_records(name, range.partition, range.offset)
            .not_found_hint(|| missing(name))
    }

    pub fn config_keys(&self) -> ApplicationResult<Vec<String>> {
        self.client.topic_config_keys()
    }

    /// Metadata of every topic, sorted by topic name.
    pub fn metadata(&self) -> ApplicationResult<Vec<TopicMetadataView>> {
        let mut metas = self.client.topics_metadata()?;
        metas.sort_by(|a, b| a.topic_name.cmp(&b.topic_name));
        Ok(metas.into_iter().map(TopicMetadataView::from).collect())
    }

    pub fn metadata_of(&self, name: &str) -> ApplicationResult<TopicMetadataView> {
        self.client
            .topic_metadata(name)
            .map(TopicMetadataView::from)
            .not_found_hint(|| format!("metadata for topic '{name}' does not exist"))
    }

    pub fn set_metadata(&self, metadata: &TopicMetadata) -> ApplicationResult<()> {
        self.client.upsert_topic_metadata(metadata)
    }

    pub fn delete_metadata(&self, name: &str) -> ApplicationResult<()> {
        self.client
            .delete_topic_metadata(name)
            .not_found_hint(|| format!("metadata for topic '{name}' does not exist"))
    }
}

fn missing(name: &str) -> String {
    format!("topic '{name}' does not exist")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_record_flags_when_parsing_then_no_range() {
        assert_eq!(RecordRange::from_flags(-1, -1).unwrap(), None);
    }

    #[test]
    fn given_partition_without_offset_when_parsing_then_offset_is_invalid() {
        let err = RecordRange::from_flags(0, -1).unwrap_err();
        assert!(matches!(err, DomainError::InvalidFlag { ref flag, .. } if flag == "offset"));
    }

    #[test]
    fn given_both_record_flags_when_parsing_then_range() {
        assert_eq!(
            RecordRange::from_flags(2, 100).unwrap(),
            Some(RecordRange {
                partition: 2,
                offset: 100
            })
        );
    }
}
