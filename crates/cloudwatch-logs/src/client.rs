// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! [`LogService`] over the CloudWatch Logs JSON 1.1 HTTP protocol.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::credentials::{Credentials, Region};
use crate::error::ServiceError;
use crate::http::{build_client, parse_endpoint, redact_headers, ClientOptions};
use crate::service::LogService;
use crate::signing::{self, SigningRequest};
use crate::types::{
    CreateLogGroupRequest, CreateLogStreamRequest, DescribeLogGroupsRequest,
    DescribeLogGroupsResponse, EmptyResponse, ErrorBody, InputLogEvent, LogGroup,
    PutLogEventsOutput, PutLogEventsRequest,
};

const TARGET_PREFIX: &str = "Logs_20140328";
const DESCRIBE_PAGE_LIMIT: u32 = 50;
const MAX_DESCRIBE_PAGES: usize = 100;

/// Signed HTTP client for one region and one set of credentials.
#[derive(Debug, Clone)]
pub struct HttpLogService {
    client: Client,
    endpoint: Url,
    host: String,
    credentials: Credentials,
    region: Region,
}

impl HttpLogService {
    /// Validates the inputs and builds the client. No network call is made.
    pub fn new(
        credentials: Credentials,
        region: Region,
        options: ClientOptions,
    ) -> Result<Self, ServiceError> {
        credentials.validate()?;
        let endpoint = options
            .endpoint
            .clone()
            .unwrap_or_else(|| region.logs_endpoint());
        let (endpoint, host) = parse_endpoint(&endpoint)?;
        let client = build_client(&options)?;

        Ok(Self {
            client,
            endpoint,
            host,
            credentials,
            region,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }

    async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp, ServiceError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned + Default,
    {
        let body = serde_json::to_vec(request)?;
        let target = format!("{TARGET_PREFIX}.{operation}");
        let signature = signing::sign(
            &self.credentials,
            self.region.as_str(),
            &SigningRequest {
                host: &self.host,
                target: &target,
                body: &body,
            },
            Utc::now(),
        )?;

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static(signing::CONTENT_TYPE),
        );
        headers.insert("x-amz-target", header_value(&target)?);
        headers.insert("x-amz-date", header_value(&signature.amz_date)?);
        headers.insert(AUTHORIZATION, header_value(&signature.authorization)?);
        if let Some(token) = &signature.security_token {
            headers.insert("x-amz-security-token", header_value(token)?);
        }

        debug!(
            operation = operation,
            url = %self.endpoint,
            headers = ?redact_headers(&headers),
            body_len = body.len(),
            "cloudwatch-logs HTTP request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let error_type_header = response
            .headers()
            .get("x-amzn-ErrorType")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(':').next().unwrap_or(value).to_string());
        let bytes = response.bytes().await?;

        debug!(
            operation = operation,
            status = %status,
            body_len = bytes.len(),
            "cloudwatch-logs HTTP response"
        );

        if !status.is_success() {
            let parsed: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
            let kind = parsed.kind.or(error_type_header).unwrap_or_default();
            let message = parsed
                .message
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            return Err(ServiceError::from_response(&kind, status, message));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Resp::default());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ServiceError> {
    HeaderValue::from_str(value)
        .map_err(|_| ServiceError::InvalidConfig(format!("invalid header value '{value}'")))
}

#[async_trait]
impl LogService for HttpLogService {
    async fn describe_log_group(&self, name: &str) -> Result<LogGroup, ServiceError> {
        let mut next_token: Option<String> = None;
        for _ in 0..MAX_DESCRIBE_PAGES {
            let request = DescribeLogGroupsRequest {
                log_group_name_prefix: name,
                next_token: next_token.as_deref(),
                limit: DESCRIBE_PAGE_LIMIT,
            };
            let page: DescribeLogGroupsResponse = self.call("DescribeLogGroups", &request).await?;
            if let Some(group) = page.log_groups.into_iter().find(|group| group.name == name) {
                return Ok(group);
            }
            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }
        Err(ServiceError::NotFound(format!(
            "log group '{name}' does not exist"
        )))
    }

    async fn create_log_group(&self, name: &str) -> Result<(), ServiceError> {
        let _: EmptyResponse = self
            .call(
                "CreateLogGroup",
                &CreateLogGroupRequest {
                    log_group_name: name,
                },
            )
            .await?;
        Ok(())
    }

    async fn create_log_stream(&self, group: &str, stream: &str) -> Result<(), ServiceError> {
        let _: EmptyResponse = self
            .call(
                "CreateLogStream",
                &CreateLogStreamRequest {
                    log_group_name: group,
                    log_stream_name: stream,
                },
            )
            .await?;
        Ok(())
    }

    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        events: Vec<InputLogEvent>,
    ) -> Result<PutLogEventsOutput, ServiceError> {
        self.call(
            "PutLogEvents",
            &PutLogEventsRequest {
                log_group_name: group,
                log_stream_name: stream,
                log_events: &events,
            },
        )
        .await
    }
}
