// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Request and response shapes of the CloudWatch Logs JSON 1.1 protocol.
//!
//! Only the fields this client reads or writes are modelled; unknown response
//! fields are ignored.

use serde::{Deserialize, Serialize};

/// A log group as returned by `DescribeLogGroups`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogGroup {
    #[serde(rename = "logGroupName")]
    pub name: String,
    #[serde(default)]
    pub arn: Option<String>,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub creation_time: Option<i64>,
    #[serde(default)]
    pub retention_in_days: Option<i32>,
    #[serde(default)]
    pub stored_bytes: Option<i64>,
}

impl LogGroup {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arn: None,
            creation_time: None,
            retention_in_days: None,
            stored_bytes: None,
        }
    }
}

/// One event in a `PutLogEvents` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputLogEvent {
    pub message: String,
    /// Milliseconds since the epoch.
    pub timestamp: i64,
}

/// Indexes of events the service accepted the call for but refused to store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedLogEventsInfo {
    #[serde(default)]
    pub too_new_log_event_start_index: Option<i32>,
    #[serde(default)]
    pub too_old_log_event_end_index: Option<i32>,
    #[serde(default)]
    pub expired_log_event_end_index: Option<i32>,
}

impl RejectedLogEventsInfo {
    /// Short human-readable reason for the rejection.
    #[must_use]
    pub fn reason(&self) -> String {
        let mut reasons = Vec::new();
        if let Some(index) = self.too_new_log_event_start_index {
            reasons.push(format!("too new from index {index}"));
        }
        if let Some(index) = self.too_old_log_event_end_index {
            reasons.push(format!("too old up to index {index}"));
        }
        if let Some(index) = self.expired_log_event_end_index {
            reasons.push(format!("expired up to index {index}"));
        }
        if reasons.is_empty() {
            "rejected without reason".to_string()
        } else {
            reasons.join(", ")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutLogEventsOutput {
    #[serde(default, rename = "rejectedLogEventsInfo")]
    pub rejected: Option<RejectedLogEventsInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DescribeLogGroupsRequest<'a> {
    pub log_group_name_prefix: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<&'a str>,
    pub limit: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DescribeLogGroupsResponse {
    #[serde(default)]
    pub log_groups: Vec<LogGroup>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateLogGroupRequest<'a> {
    pub log_group_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateLogStreamRequest<'a> {
    pub log_group_name: &'a str,
    pub log_stream_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PutLogEventsRequest<'a> {
    pub log_group_name: &'a str,
    pub log_stream_name: &'a str,
    pub log_events: &'a [InputLogEvent],
}

/// Body of operations that return nothing useful on success.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EmptyResponse {}

/// Error body returned by the service on non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default, rename = "__type")]
    pub kind: Option<String>,
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
}
