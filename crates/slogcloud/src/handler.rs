// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Ships single records to a provisioned [`LogDestination`].
//!
//! Every call is one `PutLogEvents` round trip carrying one event. Nothing is
//! buffered and nothing is retried here.

use chrono::Utc;
use cloudwatch_logs::InputLogEvent;
use tracing::debug;

use crate::constants::MAX_EVENT_MESSAGE_BYTES;
use crate::error::EmitError;
use crate::provisioner::LogDestination;
use crate::record::LogRecord;
use crate::serializer::serialize_bounded;

#[derive(Debug, Clone)]
pub struct EmissionHandler {
    destination: LogDestination,
    max_message_bytes: usize,
}

impl EmissionHandler {
    pub fn new(destination: LogDestination) -> Self {
        Self {
            destination,
            max_message_bytes: MAX_EVENT_MESSAGE_BYTES,
        }
    }

    #[must_use]
    pub fn destination(&self) -> &LogDestination {
        &self.destination
    }

    pub async fn emit(&self, record: &LogRecord) -> Result<(), EmitError> {
        let payload = serialize_bounded(record, self.max_message_bytes)?;
        // serde_json only produces valid UTF-8
        let message = String::from_utf8_lossy(&payload.bytes).into_owned();
        let event = InputLogEvent {
            message,
            timestamp: Utc::now().timestamp_millis(),
        };

        let output = self
            .destination
            .service
            .put_log_events(
                &self.destination.group_name,
                &self.destination.stream_name,
                vec![event],
            )
            .await?;

        if let Some(rejected) = output.rejected {
            return Err(EmitError::Rejected(rejected.reason()));
        }
        debug!(
            level = record.level.as_str(),
            truncated = payload.truncated,
            "Emitted log event to {}/{}",
            self.destination.group_name,
            self.destination.stream_name
        );
        Ok(())
    }
}
