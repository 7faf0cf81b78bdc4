// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Structured logging facade with two backends.
//!
//! In `prod` the facade provisions a CloudWatch Logs group and stream once and
//! ships every record as a JSON event. In `dev` it prints records to stdout and
//! never touches the network.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use slogcloud::{get_logger, Environment, LoggerConfig};
//!
//! let config = LoggerConfig::new(Environment::Prod, "AKID", "secret", "app-logs", "us-east-1");
//! let logger = get_logger(&config).await?;
//! logger.info("service started").await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

mod backoff;
pub mod config;
pub mod console;
pub mod constants;
pub mod error;
pub mod handler;
pub mod logger;
pub mod provisioner;
pub mod record;
pub mod serializer;

pub use config::{Environment, LoggerConfig};
pub use console::ConsoleLogger;
pub use error::{EmitError, LoggerError, ProvisionError};
pub use handler::EmissionHandler;
pub use logger::{get_logger, get_logger_with_service, Backend, CloudLogger, Logger};
pub use provisioner::{LogDestination, Provisioner, ProvisionerConfig, StreamNameGenerator};
pub use record::{AttrValue, Level, LogRecord};
pub use serializer::{serialize, serialize_bounded, BoundedPayload};
