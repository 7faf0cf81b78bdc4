// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! One-time setup that guarantees a log group and a fresh log stream exist.
//!
//! Steps, in order:
//! 1. Describe the group. A not-found answer leads to its creation; any other
//!    failure aborts.
//! 2. If this call created the group, poll describe with exponential backoff
//!    until the group becomes visible or the visibility budget is spent.
//! 3. Create a uniquely named stream, retrying transient failures only.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cloudwatch_logs::{LogService, ServiceError};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backoff::{BackoffConfig, BackoffState};
use crate::constants::{
    DEFAULT_STREAM_PREFIX, GROUP_VISIBILITY_INITIAL_DELAY, GROUP_VISIBILITY_TIMEOUT,
    STREAM_CREATE_ATTEMPTS, STREAM_RETRY_DELAY,
};
use crate::error::ProvisionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionerConfig {
    pub stream_prefix: String,
    /// Total stream creation attempts, the first one included.
    pub stream_create_attempts: u32,
    pub stream_retry_delay: Duration,
    pub group_visibility_timeout: Duration,
    pub group_visibility_initial_delay: Duration,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            stream_prefix: DEFAULT_STREAM_PREFIX.to_string(),
            stream_create_attempts: STREAM_CREATE_ATTEMPTS,
            stream_retry_delay: STREAM_RETRY_DELAY,
            group_visibility_timeout: GROUP_VISIBILITY_TIMEOUT,
            group_visibility_initial_delay: GROUP_VISIBILITY_INITIAL_DELAY,
        }
    }
}

/// Builds `<prefix>-<UTC timestamp>-<uuid v4>` stream names.
#[derive(Debug, Clone)]
pub struct StreamNameGenerator {
    prefix: String,
}

impl StreamNameGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn generate(&self) -> String {
        self.generate_at(Utc::now())
    }

    /// The random suffix keeps names distinct even for identical timestamps.
    #[must_use]
    pub fn generate_at(&self, now: DateTime<Utc>) -> String {
        format!(
            "{}-{}-{}",
            self.prefix,
            now.format("%Y%m%dT%H%M%S"),
            Uuid::new_v4()
        )
    }
}

/// A provisioned group and stream, bound to the service that owns them.
#[derive(Clone)]
pub struct LogDestination {
    pub group_name: String,
    pub stream_name: String,
    pub service: Arc<dyn LogService>,
}

impl fmt::Debug for LogDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogDestination")
            .field("group_name", &self.group_name)
            .field("stream_name", &self.stream_name)
            .finish_non_exhaustive()
    }
}

pub struct Provisioner {
    service: Arc<dyn LogService>,
    config: ProvisionerConfig,
    names: StreamNameGenerator,
}

impl Provisioner {
    pub fn new(service: Arc<dyn LogService>, config: ProvisionerConfig) -> Self {
        let names = StreamNameGenerator::new(config.stream_prefix.clone());
        Self {
            service,
            config,
            names,
        }
    }

    pub async fn provision(&self, group: &str) -> Result<LogDestination, ProvisionError> {
        self.provision_with_cancel(group, CancellationToken::new())
            .await
    }

    /// Like [`Provisioner::provision`], aborting any pending call or wait once
    /// `cancel` fires.
    pub async fn provision_with_cancel(
        &self,
        group: &str,
        cancel: CancellationToken,
    ) -> Result<LogDestination, ProvisionError> {
        if group.trim().is_empty() {
            return Err(ProvisionError::Configuration(
                "log group name cannot be empty".to_string(),
            ));
        }

        let created = self.ensure_group(group, &cancel).await?;
        if created {
            self.wait_until_visible(group, &cancel).await?;
        }

        let stream = self.names.generate();
        self.create_stream(group, &stream, created, &cancel).await?;
        info!(group, stream = stream.as_str(), "Log destination ready");

        Ok(LogDestination {
            group_name: group.to_string(),
            stream_name: stream,
            service: Arc::clone(&self.service),
        })
    }

    /// Returns true when this call created the group.
    async fn ensure_group(
        &self,
        group: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, ProvisionError> {
        match cancellable(cancel, self.service.describe_log_group(group)).await? {
            Ok(_) => {
                debug!(group, "Log group already exists");
                Ok(false)
            }
            Err(e) if e.is_not_found() => {
                match cancellable(cancel, self.service.create_log_group(group)).await? {
                    Ok(()) => {
                        info!(group, "Created log group");
                        Ok(true)
                    }
                    Err(e) if e.is_already_exists() => {
                        debug!(group, "Log group was created concurrently");
                        Ok(false)
                    }
                    Err(source) => Err(ProvisionError::CreateGroup {
                        group: group.to_string(),
                        source,
                    }),
                }
            }
            Err(source) => Err(ProvisionError::DescribeGroup {
                group: group.to_string(),
                source,
            }),
        }
    }

    async fn wait_until_visible(
        &self,
        group: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ProvisionError> {
        let deadline = Instant::now() + self.config.group_visibility_timeout;
        let mut backoff = BackoffState::new(BackoffConfig {
            initial_delay: self.config.group_visibility_initial_delay,
            max_delay: self.config.group_visibility_timeout,
            factor: 2.0,
        });

        loop {
            let now = Instant::now();
            if now >= deadline {
                warn!(
                    group,
                    "Log group not visible after {:?}, continuing",
                    self.config.group_visibility_timeout
                );
                return Ok(());
            }
            let delay = backoff.next_delay().min(deadline - now);
            cancellable(cancel, tokio::time::sleep(delay)).await?;

            match cancellable(cancel, self.service.describe_log_group(group)).await? {
                Ok(_) => {
                    debug!(group, "Log group is visible");
                    return Ok(());
                }
                Err(e) if e.is_not_found() || e.is_transient() => {
                    debug!(group, "Log group not visible yet: {e}");
                }
                Err(source) => {
                    return Err(ProvisionError::DescribeGroup {
                        group: group.to_string(),
                        source,
                    })
                }
            }
        }
    }

    async fn create_stream(
        &self,
        group: &str,
        stream: &str,
        group_created: bool,
        cancel: &CancellationToken,
    ) -> Result<(), ProvisionError> {
        let max_attempts = self.config.stream_create_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match cancellable(cancel, self.service.create_log_stream(group, stream)).await? {
                Ok(()) => return Ok(()),
                // An earlier attempt reached the service even though its answer was lost.
                Err(e) if e.is_already_exists() && attempt > 1 => {
                    debug!(group, stream, "Log stream already created by an earlier attempt");
                    return Ok(());
                }
                // A group this call just created may not have propagated yet.
                Err(e) if retryable(&e, group_created) && attempt < max_attempts => {
                    let delay = self.config.stream_retry_delay;
                    warn!(
                        group,
                        stream,
                        "Failed to create log stream (attempt {attempt}/{max_attempts}), \
                         retrying in {delay:?}: {e}"
                    );
                    cancellable(cancel, tokio::time::sleep(self.config.stream_retry_delay))
                        .await?;
                }
                Err(source) => {
                    return Err(ProvisionError::CreateStream {
                        stream: stream.to_string(),
                        attempts: attempt,
                        source,
                    })
                }
            }
        }
    }
}

fn retryable(error: &ServiceError, group_created: bool) -> bool {
    error.is_transient() || (group_created && error.is_not_found())
}

async fn cancellable<F: Future>(
    cancel: &CancellationToken,
    future: F,
) -> Result<F::Output, ProvisionError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ProvisionError::Cancelled),
        output = future => Ok(output),
    }
}
