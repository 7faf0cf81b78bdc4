// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-memory [`LogService`] for tests of code built on top of this crate.
//!
//! Every call is counted. Failures can be queued per operation and are
//! returned, in order, before the fake falls back to its normal behaviour.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::ServiceError;
use crate::service::LogService;
use crate::types::{InputLogEvent, LogGroup, PutLogEventsOutput};

/// Operations of the service, used to script failures and read counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    DescribeLogGroup,
    CreateLogGroup,
    CreateLogStream,
    PutLogEvents,
}

#[derive(Debug, Default)]
struct State {
    groups: BTreeSet<String>,
    streams: BTreeSet<(String, String)>,
    events: Vec<(String, String, InputLogEvent)>,
    calls: BTreeMap<Operation, usize>,
    created_streams: Vec<(String, String)>,
    failures: BTreeMap<Operation, VecDeque<ServiceError>>,
    hidden_describes: usize,
    pending_hidden: BTreeMap<String, usize>,
    put_output: PutLogEventsOutput,
}

#[derive(Debug, Default)]
pub struct InMemoryLogService {
    state: Mutex<State>,
}

impl InMemoryLogService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `name` already present.
    #[must_use]
    pub fn with_group(self, name: &str) -> Self {
        self.lock().groups.insert(name.to_string());
        self
    }

    /// Newly created groups stay invisible to the next `count` describes.
    #[must_use]
    pub fn with_eventual_consistency(self, count: usize) -> Self {
        self.lock().hidden_describes = count;
        self
    }

    /// Queues an error returned by the next call to `operation`.
    pub fn fail_next(&self, operation: Operation, error: ServiceError) {
        self.lock()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Output returned by every successful `put_log_events`.
    pub fn set_put_output(&self, output: PutLogEventsOutput) {
        self.lock().put_output = output;
    }

    #[must_use]
    pub fn calls(&self, operation: Operation) -> usize {
        self.lock().calls.get(&operation).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn has_group(&self, name: &str) -> bool {
        self.lock().groups.contains(name)
    }

    /// Stream names passed to every `create_log_stream` call, in call order.
    #[must_use]
    pub fn stream_attempts(&self) -> Vec<(String, String)> {
        self.lock().created_streams.clone()
    }

    /// Every stored event with its group and stream.
    #[must_use]
    pub fn events(&self) -> Vec<(String, String, InputLogEvent)> {
        self.lock().events.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn begin(&self, operation: Operation) -> Result<MutexGuard<'_, State>, ServiceError> {
        let mut state = self.lock();
        *state.calls.entry(operation).or_default() += 1;
        if let Some(error) = state
            .failures
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }
        Ok(state)
    }
}

/// Error the real service returns for a missing group or stream.
#[must_use]
pub fn not_found(message: &str) -> ServiceError {
    ServiceError::from_response(
        "ResourceNotFoundException",
        StatusCode::BAD_REQUEST,
        message.to_string(),
    )
}

/// A throttling error, which callers treat as transient.
#[must_use]
pub fn throttled() -> ServiceError {
    ServiceError::from_response(
        "ThrottlingException",
        StatusCode::BAD_REQUEST,
        "Rate exceeded".to_string(),
    )
}

/// An access-denied error, which callers treat as permanent.
#[must_use]
pub fn access_denied() -> ServiceError {
    ServiceError::from_response(
        "AccessDeniedException",
        StatusCode::BAD_REQUEST,
        "User is not authorized to perform: logs:CreateLogStream".to_string(),
    )
}

#[async_trait]
impl LogService for InMemoryLogService {
    async fn describe_log_group(&self, name: &str) -> Result<LogGroup, ServiceError> {
        let mut state = self.begin(Operation::DescribeLogGroup)?;
        if let Some(remaining) = state.pending_hidden.get_mut(name) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(not_found("The specified log group does not exist."));
            }
        }
        if state.groups.contains(name) {
            Ok(LogGroup::named(name))
        } else {
            Err(not_found("The specified log group does not exist."))
        }
    }

    async fn create_log_group(&self, name: &str) -> Result<(), ServiceError> {
        let mut state = self.begin(Operation::CreateLogGroup)?;
        if !state.groups.insert(name.to_string()) {
            return Err(ServiceError::AlreadyExists(
                "The specified log group already exists".to_string(),
            ));
        }
        let hidden = state.hidden_describes;
        if hidden > 0 {
            state.pending_hidden.insert(name.to_string(), hidden);
        }
        Ok(())
    }

    async fn create_log_stream(&self, group: &str, stream: &str) -> Result<(), ServiceError> {
        let mut state = match self.begin(Operation::CreateLogStream) {
            Ok(state) => state,
            Err(e) => {
                self.lock()
                    .created_streams
                    .push((group.to_string(), stream.to_string()));
                return Err(e);
            }
        };
        state
            .created_streams
            .push((group.to_string(), stream.to_string()));
        if !state.groups.contains(group) {
            return Err(not_found("The specified log group does not exist."));
        }
        if !state
            .streams
            .insert((group.to_string(), stream.to_string()))
        {
            return Err(ServiceError::AlreadyExists(
                "The specified log stream already exists".to_string(),
            ));
        }
        Ok(())
    }

    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        events: Vec<InputLogEvent>,
    ) -> Result<PutLogEventsOutput, ServiceError> {
        let mut state = self.begin(Operation::PutLogEvents)?;
        if !state
            .streams
            .contains(&(group.to_string(), stream.to_string()))
        {
            return Err(not_found("The specified log stream does not exist."));
        }
        for event in events {
            state
                .events
                .push((group.to_string(), stream.to_string(), event));
        }
        Ok(state.put_output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_failures_are_returned_in_order() {
        let service = InMemoryLogService::new().with_group("app-logs");
        service.fail_next(Operation::CreateLogStream, throttled());
        service.fail_next(Operation::CreateLogStream, access_denied());

        let first = service.create_log_stream("app-logs", "s1").await;
        assert!(first.unwrap_err().is_transient());
        let second = service.create_log_stream("app-logs", "s1").await;
        assert!(matches!(second, Err(ServiceError::Unauthorized { .. })));
        service.create_log_stream("app-logs", "s1").await.unwrap();

        assert_eq!(service.calls(Operation::CreateLogStream), 3);
        assert_eq!(service.stream_attempts().len(), 3);
    }

    #[tokio::test]
    async fn hides_new_groups_from_describe() {
        let service = InMemoryLogService::new().with_eventual_consistency(2);
        service.create_log_group("app-logs").await.unwrap();

        assert!(service.describe_log_group("app-logs").await.is_err());
        assert!(service.describe_log_group("app-logs").await.is_err());
        assert_eq!(
            service.describe_log_group("app-logs").await.unwrap().name,
            "app-logs"
        );
    }

    #[tokio::test]
    async fn put_requires_existing_stream() {
        let service = InMemoryLogService::new().with_group("app-logs");
        let event = InputLogEvent {
            message: "{}".to_string(),
            timestamp: 1,
        };
        let missing = service
            .put_log_events("app-logs", "missing", vec![event.clone()])
            .await;
        assert!(missing.unwrap_err().is_not_found());

        service.create_log_stream("app-logs", "s1").await.unwrap();
        service
            .put_log_events("app-logs", "s1", vec![event])
            .await
            .unwrap();
        assert_eq!(service.events().len(), 1);
    }
}
