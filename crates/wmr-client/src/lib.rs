//! Client-side job lifecycle for the watermark-removal service.
//!
//! This crate provides:
//! - A typed HTTP client for the service contract (submit, status,
//!   download, cleanup)
//! - Revocable handles for locally-held media
//! - A job controller with a cancellable polling loop, exposing reactive
//!   state snapshots through a watch channel

pub mod config;
pub mod controller;
pub mod error;
pub mod media;
pub mod service;
pub mod types;

pub use config::ClientConfig;
pub use controller::{JobController, JobSnapshot};
pub use error::{ClientError, ClientResult};
pub use media::MediaHandle;
pub use service::ServiceClient;
pub use types::{StatusResponse, SubmitResponse};
