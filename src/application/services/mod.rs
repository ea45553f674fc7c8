//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the remote client facade but are themselves concrete structs,
//! not traits.

mod connector;
mod topic;

pub use connector::{ConnectorService, FanOut, ALL_CLUSTERS};
pub use topic::{RecordRange, TopicService};
