// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use cloudwatch_logs::ServiceError;

/// Errors raised while making sure a log group and stream exist.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Failed to describe log group {group}: {source}")]
    DescribeGroup {
        group: String,
        #[source]
        source: ServiceError,
    },

    #[error("Failed to create log group {group}: {source}")]
    CreateGroup {
        group: String,
        #[source]
        source: ServiceError,
    },

    #[error("Failed to create log stream {stream} after {attempts} attempt(s): {source}")]
    CreateStream {
        stream: String,
        attempts: u32,
        #[source]
        source: ServiceError,
    },

    #[error("Provisioning cancelled")]
    Cancelled,
}

/// Errors raised while emitting one record.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("Log event is {size} bytes, limit is {limit}")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Failed to put log event: {0}")]
    Service(#[from] ServiceError),

    #[error("Log event rejected: {0}")]
    Rejected(String),

    #[error("Failed to write log line: {0}")]
    Console(#[from] std::io::Error),
}

/// Errors returned by the logger factory.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Provision(#[from] ProvisionError),
}
