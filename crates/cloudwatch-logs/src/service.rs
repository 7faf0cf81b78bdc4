// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::types::{InputLogEvent, LogGroup, PutLogEventsOutput};

/// The three-operation surface of the log ingestion service.
///
/// Implementations must be safe to share between tasks; callers hold a single
/// instance behind an `Arc` for the lifetime of the process and never lock it.
#[async_trait]
pub trait LogService: Send + Sync {
    /// Looks up a log group by exact name.
    ///
    /// Returns [`ServiceError::NotFound`] when no group has that name. Any
    /// other error means the lookup itself failed and says nothing about
    /// whether the group exists.
    async fn describe_log_group(&self, name: &str) -> Result<LogGroup, ServiceError>;

    async fn create_log_group(&self, name: &str) -> Result<(), ServiceError>;

    async fn create_log_stream(&self, group: &str, stream: &str) -> Result<(), ServiceError>;

    /// Ships `events`, in order, to one stream.
    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        events: Vec<InputLogEvent>,
    ) -> Result<PutLogEventsOutput, ServiceError>;
}
