// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Limits and defaults shared by the provisioning and emission paths.

use std::time::Duration;

/// Hard ceiling CloudWatch Logs applies to one event, message plus overhead.
pub const MAX_EVENT_SIZE_BYTES: usize = 262_144;

/// Fixed overhead CloudWatch counts against every event.
pub const EVENT_OVERHEAD_BYTES: usize = 26;

/// Largest message body that fits in a single event.
///
/// # Value: 262,118 bytes
pub const MAX_EVENT_MESSAGE_BYTES: usize = MAX_EVENT_SIZE_BYTES - EVENT_OVERHEAD_BYTES;

/// Process exit status after a fatal record.
pub const FATAL_EXIT_CODE: i32 = 1;

pub const DEFAULT_STREAM_PREFIX: &str = "slogcloud-stream";

/// Stream creation attempts, the first one included.
pub const STREAM_CREATE_ATTEMPTS: u32 = 3;

pub const STREAM_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Budget for a freshly created group to show up in describe results.
pub const GROUP_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(2);

pub const GROUP_VISIBILITY_INITIAL_DELAY: Duration = Duration::from_millis(100);

pub(crate) const MESSAGE_KEY: &str = "message";
pub(crate) const TRUNCATED_KEY: &str = "truncated";
pub(crate) const ERROR_KEY: &str = "error";
pub(crate) const FATAL_KEY: &str = "fatal";
