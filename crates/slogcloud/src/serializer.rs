// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Converts a [`LogRecord`] into the JSON message body of one log event.
//!
//! ```text
//! LogRecord { message: "hello", attributes: [code=42, cause=<error "boom">] }
//!     -> {"message":"hello","code":42,"cause":"boom"}
//! ```
//!
//! Keys keep insertion order: `message` first, then attributes in call order.
//! An attribute whose key is already present (including `message`) replaces the
//! earlier value in place.

use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::{MESSAGE_KEY, TRUNCATED_KEY};
use crate::error::EmitError;
use crate::record::LogRecord;

/// A serialized payload that fits the size limit it was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedPayload {
    pub bytes: Vec<u8>,
    /// True when the message had to be shortened to fit.
    pub truncated: bool,
}

/// Serializes a record. Never fails.
#[must_use]
pub fn serialize(record: &LogRecord) -> Vec<u8> {
    encode(&entry(record, &record.message), &record.message)
}

/// Serializes a record, shortening its message if the payload exceeds `max_bytes`.
///
/// When only the message is too long it is cut on a character boundary and a
/// `"truncated": true` field is added. When the payload cannot fit even with an
/// empty message, [`EmitError::PayloadTooLarge`] is returned.
pub fn serialize_bounded(
    record: &LogRecord,
    max_bytes: usize,
) -> Result<BoundedPayload, EmitError> {
    let full = serialize(record);
    if full.len() <= max_bytes {
        return Ok(BoundedPayload {
            bytes: full,
            truncated: false,
        });
    }

    let overflow = full.len() - max_bytes;
    let mut entry = entry(record, "");
    entry.insert(TRUNCATED_KEY.to_string(), Value::Bool(true));
    let skeleton = encode(&entry, "");
    if skeleton.len() > max_bytes || message_was_overwritten(record) {
        return Err(EmitError::PayloadTooLarge {
            size: full.len(),
            limit: max_bytes,
        });
    }

    // Escaping can make the encoded message longer than its raw bytes, so keep
    // shrinking until the encoded payload fits.
    let mut keep = record.message.len().saturating_sub(overflow);
    loop {
        let message = prefix_on_char_boundary(&record.message, keep);
        entry.insert(MESSAGE_KEY.to_string(), Value::String(message.to_string()));
        let bytes = encode(&entry, message);
        if bytes.len() <= max_bytes {
            debug!(
                original = full.len(),
                truncated = bytes.len(),
                limit = max_bytes,
                "Truncated oversized log message"
            );
            return Ok(BoundedPayload {
                bytes,
                truncated: true,
            });
        }
        if message.is_empty() {
            return Err(EmitError::PayloadTooLarge {
                size: full.len(),
                limit: max_bytes,
            });
        }
        let excess = bytes.len() - max_bytes;
        keep = message.len().saturating_sub(excess.max(1));
    }
}

fn entry(record: &LogRecord, message: &str) -> Map<String, Value> {
    let mut entry = Map::with_capacity(record.attributes.len() + 1);
    entry.insert(MESSAGE_KEY.to_string(), Value::String(message.to_string()));
    for (key, value) in &record.attributes {
        entry.insert(key.clone(), value.to_json());
    }
    entry
}

fn encode(entry: &Map<String, Value>, message: &str) -> Vec<u8> {
    match serde_json::to_vec(entry) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Failed to serialize log entry, sending message only: {e}");
            let mut fallback = Map::new();
            fallback.insert(MESSAGE_KEY.to_string(), Value::String(message.to_string()));
            serde_json::to_vec(&fallback).unwrap_or_default()
        }
    }
}

/// An attribute named `message` owns the field, so shortening the record's
/// own message cannot shrink the payload.
fn message_was_overwritten(record: &LogRecord) -> bool {
    record.attributes.iter().any(|(key, _)| key == MESSAGE_KEY)
}

fn prefix_on_char_boundary(s: &str, max_len: usize) -> &str {
    if max_len >= s.len() {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
