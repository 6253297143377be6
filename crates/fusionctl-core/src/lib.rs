//! Core library for fusionctl - Fusion client, operation polling, and
//! configuration.
//!
//! The Fusion control plane accepts every mutation (create, update, delete)
//! asynchronously: the REST call returns an [`Operation`] handle and the
//! work completes in the background. This crate provides the pieces needed
//! to drive that model from Rust:
//!
//! - [`FusionClient`] - an authenticated REST client for the public API
//! - [`await_operation`] - poll an operation handle until it settles,
//!   with optional [`ProgressEvent`] callbacks for UI layers
//! - [`create_and_await`] / [`update_and_await`] / [`delete_and_await`] -
//!   submit a mutation and await its outcome in one call
//! - [`Config`] - TOML profiles for endpoints and credentials
//!
//! Operation fetching goes through the [`OperationsClient`] trait, so tests
//! and alternative transports can stand in for the real client.
//!
//! # Example
//!
//! ```rust,ignore
//! use fusionctl_core::{FusionClient, create_and_await};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! let client = FusionClient::builder()
//!     .base_url("https://fusion.example.com")
//!     .api_token("token")
//!     .build()?;
//!
//! let operation = create_and_await(
//!     &client,
//!     "/arrays",
//!     &json!({"name": "array-01", "region": "pune"}),
//!     Some(Duration::from_secs(600)),
//!     Duration::from_secs(2),
//!     None,
//! )
//! .await?;
//! println!("resolved: {}", operation.status);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod operation;
pub mod progress;
pub mod workflows;

pub use client::{ApiError, ClientError, FusionClient, FusionClientBuilder, OperationsClient};
pub use config::{Config, ConfigError, Profile};
pub use error::{CoreError, Result};
pub use operation::{ErrorDetail, Operation, OperationStatus};
pub use progress::{ProgressCallback, ProgressEvent, await_operation};
pub use workflows::{create_and_await, delete_and_await, operation_handle, update_and_await};
