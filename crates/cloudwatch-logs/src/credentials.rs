// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use crate::error::ServiceError;

/// Static access-key credentials used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.access_key_id.trim().is_empty() {
            return Err(ServiceError::InvalidConfig(
                "access key id cannot be empty".to_string(),
            ));
        }
        if self.secret_access_key.trim().is_empty() {
            return Err(ServiceError::InvalidConfig(
                "secret access key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// AWS region name, e.g. `us-east-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region(String);

impl Region {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Default service endpoint for this region.
    #[must_use]
    pub fn logs_endpoint(&self) -> String {
        if self.0.starts_with("cn-") {
            format!("https://logs.{}.amazonaws.com.cn", self.0)
        } else {
            format!("https://logs.{}.amazonaws.com", self.0)
        }
    }
}

impl FromStr for Region {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let region = s.trim();
        if region.is_empty() {
            return Err(ServiceError::InvalidConfig(
                "region cannot be empty".to_string(),
            ));
        }
        let valid = region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid || region.starts_with('-') || region.ends_with('-') {
            return Err(ServiceError::InvalidConfig(format!(
                "invalid region '{region}'"
            )));
        }
        Ok(Self(region.to_string()))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
