#![forbid(unsafe_code)]
//! aopnet-core library.
//!
//! Entities of an Adverse Outcome Pathway network, the errors raised when a
//! network is malformed, configuration, and file loading.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums for library errors, each mapped to a
//!   stable [`ErrorCode`]; `anyhow::Result` for configuration loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod io;
pub mod model;

pub use config::FeedbackStrategy;
pub use error::{ErrorCode, GraphError, LoadError, MalformedGraphError};
pub use model::{BiologicalLevel, Event, InvalidLevel, Layer, Network, Relationship};
