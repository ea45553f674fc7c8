//! Domain layer: resources, payloads and flag validation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no HTTP).

pub mod entities;
pub mod error;
pub mod payload;
pub mod validate;

pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use payload::{
    AlertConditionFlags, AlertConditionPayload, ConnectorFlags, ConnectorPayload,
    CreateTopicFlags, CreateTopicPayload, Payload, TopicMetadataFlags, UpdateTopicFlags,
    UpdateTopicPayload,
};
pub use validate::{check_required, FlagValue};
