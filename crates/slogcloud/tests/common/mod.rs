// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Common helpers for integration tests

#![allow(dead_code)]

use mockito::{Mock, ServerGuard};
use serde_json::json;
use slogcloud::{Environment, LoggerConfig};
use std::time::Duration;

pub const GROUP: &str = "app-logs";

/// Prod configuration pointed at a local mock endpoint.
pub fn prod_config(endpoint: String) -> LoggerConfig {
    let mut config = LoggerConfig::new(
        Environment::Prod,
        "AKIDEXAMPLE",
        "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
        GROUP,
        "us-east-1",
    );
    config.endpoint = Some(endpoint);
    config.timeout = Duration::from_secs(2);
    config.provisioner.stream_retry_delay = Duration::from_millis(10);
    config.provisioner.group_visibility_initial_delay = Duration::from_millis(10);
    config.provisioner.group_visibility_timeout = Duration::from_millis(100);
    config
}

pub async fn mock_operation(
    server: &mut ServerGuard,
    operation: &str,
    status: usize,
    body: serde_json::Value,
) -> Mock {
    server
        .mock("POST", "/")
        .match_header("x-amz-target", format!("Logs_20140328.{operation}").as_str())
        .with_status(status)
        .with_header("content-type", "application/x-amz-json-1.1")
        .with_body(body.to_string())
        .create_async()
        .await
}

pub async fn mock_existing_group(server: &mut ServerGuard) -> Mock {
    mock_operation(
        server,
        "DescribeLogGroups",
        200,
        json!({ "logGroups": [{ "logGroupName": GROUP }] }),
    )
    .await
}
