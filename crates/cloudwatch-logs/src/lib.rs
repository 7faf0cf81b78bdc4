// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Typed client for the CloudWatch Logs ingestion API.
//!
//! The crate exposes the [`LogService`] trait (describe/create group, create
//! stream, put events) and [`HttpLogService`], a SigV4-signed implementation
//! over the service's JSON 1.1 HTTP protocol. Errors are classified into the
//! [`ServiceError`] taxonomy so callers can tell a missing resource from a
//! transient outage from a permanent rejection.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod client;
pub mod credentials;
pub mod error;
pub mod http;
pub mod service;
mod signing;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod types;

pub use client::HttpLogService;
pub use credentials::{Credentials, Region};
pub use error::ServiceError;
pub use http::ClientOptions;
pub use service::LogService;
pub use types::{InputLogEvent, LogGroup, PutLogEventsOutput, RejectedLogEventsInfo};
