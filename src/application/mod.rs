//! Application layer: payload resolution, remote client and services
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod client;
pub mod error;
pub mod error_ext;
pub mod payload;
pub mod services;

pub use client::{Credentials, LensesClient};
pub use error::{ApplicationError, ApplicationResult, RemoteError, StatusClass};
pub use error_ext::{IoResultExt, RemoteResultExt};
pub use payload::PayloadResolver;
