// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use cloudwatch_logs::{ClientOptions, Credentials, Region};

use crate::error::LoggerError;
use crate::provisioner::ProvisionerConfig;
use crate::record::Level;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MAX_LOG_GROUP_NAME_LEN: usize = 512;

/// Which backend the facade binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// CloudWatch Logs.
    Prod,
    /// Console only, no network access.
    #[default]
    Dev,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Prod => f.write_str("prod"),
            Environment::Dev => f.write_str("dev"),
        }
    }
}

impl FromStr for Environment {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prod" | "production" => Ok(Environment::Prod),
            "dev" | "development" => Ok(Environment::Dev),
            other => Err(LoggerError::Config(format!(
                "Invalid environment '{other}'. Must be one of: prod, dev"
            ))),
        }
    }
}

/// Configuration for [`crate::get_logger`].
#[derive(Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub environment: Environment,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub log_group: String,
    pub region: String,
    /// Overrides the regional CloudWatch Logs endpoint.
    pub endpoint: Option<String>,
    /// Records below this level are dropped.
    pub min_level: Level,
    pub timeout: Duration,
    /// HTTPS proxy URL
    pub https_proxy: Option<String>,
    pub provisioner: ProvisionerConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Dev,
            access_key_id: String::new(),
            secret_access_key: String::new(),
            session_token: None,
            log_group: String::new(),
            region: String::new(),
            endpoint: None,
            min_level: Level::Debug,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            https_proxy: None,
            provisioner: ProvisionerConfig::default(),
        }
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("environment", &self.environment)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .field("log_group", &self.log_group)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("min_level", &self.min_level)
            .field("timeout", &self.timeout)
            .field("https_proxy", &self.https_proxy)
            .field("provisioner", &self.provisioner)
            .finish()
    }
}

impl LoggerConfig {
    /// Configuration from the five facade inputs; everything else defaults.
    pub fn new(
        environment: Environment,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        log_group: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            environment,
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            log_group: log_group.into(),
            region: region.into(),
            ..Default::default()
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, LoggerError> {
        let environment = match env::var("SLOGCLOUD_ENV") {
            Ok(value) => value.parse()?,
            Err(_) => Environment::Dev,
        };
        let access_key_id = env::var("AWS_ACCESS_KEY_ID").unwrap_or_default();
        let secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default();
        let session_token = non_empty_var("AWS_SESSION_TOKEN");
        let log_group = env::var("SLOGCLOUD_LOG_GROUP").unwrap_or_default();
        let region = env::var("AWS_REGION")
            .or_else(|_| env::var("AWS_DEFAULT_REGION"))
            .unwrap_or_default();
        let endpoint = non_empty_var("SLOGCLOUD_ENDPOINT");
        let min_level = match env::var("SLOGCLOUD_LOG_LEVEL") {
            Ok(value) => value
                .parse::<Level>()
                .map_err(|e| LoggerError::Config(e.to_string()))?,
            Err(_) => Level::Debug,
        };
        let timeout = match env::var("SLOGCLOUD_TIMEOUT_SECS") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| {
                    LoggerError::Config(format!(
                        "SLOGCLOUD_TIMEOUT_SECS must be a whole number of seconds, got '{value}'"
                    ))
                })?,
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let https_proxy =
            non_empty_var("SLOGCLOUD_PROXY_HTTPS").or_else(|| non_empty_var("HTTPS_PROXY"));

        let mut provisioner = ProvisionerConfig::default();
        if let Some(prefix) = non_empty_var("SLOGCLOUD_STREAM_PREFIX") {
            provisioner.stream_prefix = prefix;
        }

        let config = Self {
            environment,
            access_key_id,
            secret_access_key,
            session_token,
            log_group,
            region,
            endpoint,
            min_level,
            timeout,
            https_proxy,
            provisioner,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.timeout.is_zero() {
            return Err(LoggerError::Config(
                "timeout must be greater than 0".to_string(),
            ));
        }

        let prefix = &self.provisioner.stream_prefix;
        if prefix.trim().is_empty() || prefix.contains(':') || prefix.contains('*') {
            return Err(LoggerError::Config(format!(
                "Invalid stream prefix '{prefix}'. Must be non-empty and may not contain ':' or '*'"
            )));
        }

        if self.environment == Environment::Dev {
            return Ok(());
        }

        if self.access_key_id.trim().is_empty() || self.secret_access_key.trim().is_empty() {
            return Err(LoggerError::Config(
                "AWS access key and secret key are required in prod".to_string(),
            ));
        }
        if self.region.trim().is_empty() {
            return Err(LoggerError::Config(
                "AWS region is required in prod".to_string(),
            ));
        }
        validate_log_group_name(&self.log_group)
    }

    pub fn credentials(&self) -> Credentials {
        let credentials = Credentials::new(&self.access_key_id, &self.secret_access_key);
        match &self.session_token {
            Some(token) => credentials.with_session_token(token),
            None => credentials,
        }
    }

    pub fn region(&self) -> Result<Region, LoggerError> {
        Ok(self.region.parse::<Region>()?)
    }

    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            endpoint: self.endpoint.clone(),
            timeout: self.timeout,
            https_proxy: self.https_proxy.clone(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// CloudWatch accepts 1-512 characters of `[A-Za-z0-9_\-/.#]`.
fn validate_log_group_name(name: &str) -> Result<(), LoggerError> {
    if name.is_empty() || name.len() > MAX_LOG_GROUP_NAME_LEN {
        return Err(LoggerError::Config(format!(
            "Log group name must be between 1 and {MAX_LOG_GROUP_NAME_LEN} characters"
        )));
    }
    if let Some(invalid) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/' | '.' | '#')))
    {
        return Err(LoggerError::Config(format!(
            "Invalid character '{invalid}' in log group name '{name}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 13] = [
        "SLOGCLOUD_ENV",
        "AWS_ACCESS_KEY_ID",
        "AWS_SECRET_ACCESS_KEY",
        "AWS_SESSION_TOKEN",
        "SLOGCLOUD_LOG_GROUP",
        "AWS_REGION",
        "AWS_DEFAULT_REGION",
        "SLOGCLOUD_ENDPOINT",
        "SLOGCLOUD_STREAM_PREFIX",
        "SLOGCLOUD_LOG_LEVEL",
        "SLOGCLOUD_TIMEOUT_SECS",
        "SLOGCLOUD_PROXY_HTTPS",
        "HTTPS_PROXY",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn prod() -> LoggerConfig {
        LoggerConfig::new(Environment::Prod, "AKID", "secret", "app-logs", "us-east-1")
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = LoggerConfig::default();
        assert_eq!(config.environment, Environment::Dev);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Prod);
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Prod);
        assert_eq!(" dev ".parse::<Environment>().unwrap(), Environment::Dev);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_prod_requires_credentials_and_region() {
        assert!(prod().validate().is_ok());

        let config = LoggerConfig {
            secret_access_key: " ".to_string(),
            ..prod()
        };
        assert!(config.validate().is_err());

        let config = LoggerConfig {
            region: String::new(),
            ..prod()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dev_ignores_missing_credentials() {
        let config = LoggerConfig::new(Environment::Dev, "", "", "", "");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_group_name_rules() {
        for name in ["app-logs", "/aws/lambda/fn_1", "team.a#prod"] {
            let config = LoggerConfig {
                log_group: name.to_string(),
                ..prod()
            };
            assert!(config.validate().is_ok(), "'{}' should be valid", name);
        }
        for name in ["".to_string(), "has space".to_string(), "x".repeat(513)] {
            let config = LoggerConfig {
                log_group: name.clone(),
                ..prod()
            };
            assert!(config.validate().is_err(), "'{}' should be invalid", name);
        }
    }

    #[test]
    fn test_validate_stream_prefix_and_timeout() {
        let mut config = prod();
        config.provisioner.stream_prefix = "bad:prefix".to_string();
        assert!(config.validate().is_err());

        let config = LoggerConfig {
            timeout: Duration::ZERO,
            ..LoggerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = LoggerConfig {
            session_token: Some("token".to_string()),
            ..prod()
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("\"secret\""));
        assert!(!printed.contains("\"token\""));
        assert!(printed.contains("AKID"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_to_dev() {
        clear_env();
        let config = LoggerConfig::from_env().unwrap();
        assert_eq!(config.environment, Environment::Dev);
        assert_eq!(config.min_level, Level::Debug);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.provisioner.stream_prefix, "slogcloud-stream");
    }

    #[test]
    #[serial]
    fn test_from_env_reads_prod_settings() {
        clear_env();
        env::set_var("SLOGCLOUD_ENV", "prod");
        env::set_var("AWS_ACCESS_KEY_ID", "AKID");
        env::set_var("AWS_SECRET_ACCESS_KEY", "secret");
        env::set_var("AWS_SESSION_TOKEN", "token");
        env::set_var("SLOGCLOUD_LOG_GROUP", "app-logs");
        env::set_var("AWS_DEFAULT_REGION", "eu-west-1");
        env::set_var("SLOGCLOUD_ENDPOINT", "http://localhost:4566");
        env::set_var("SLOGCLOUD_STREAM_PREFIX", "worker");
        env::set_var("SLOGCLOUD_LOG_LEVEL", "warn");
        env::set_var("SLOGCLOUD_TIMEOUT_SECS", "3");
        env::set_var("HTTPS_PROXY", "http://proxy:3128");

        let config = LoggerConfig::from_env().unwrap();

        assert_eq!(config.environment, Environment::Prod);
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.session_token.as_deref(), Some("token"));
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.provisioner.stream_prefix, "worker");
        assert_eq!(config.min_level, Level::Warn);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.https_proxy.as_deref(), Some("http://proxy:3128"));
        assert_eq!(config.credentials().session_token.as_deref(), Some("token"));
        assert_eq!(config.region().unwrap().as_str(), "eu-west-1");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_values() {
        clear_env();
        env::set_var("SLOGCLOUD_ENV", "staging");
        assert!(LoggerConfig::from_env().is_err());

        clear_env();
        env::set_var("SLOGCLOUD_LOG_LEVEL", "verbose");
        assert!(LoggerConfig::from_env().is_err());

        clear_env();
        env::set_var("SLOGCLOUD_TIMEOUT_SECS", "ten");
        assert!(LoggerConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_prod_without_group_fails() {
        clear_env();
        env::set_var("SLOGCLOUD_ENV", "prod");
        env::set_var("AWS_ACCESS_KEY_ID", "AKID");
        env::set_var("AWS_SECRET_ACCESS_KEY", "secret");
        env::set_var("AWS_REGION", "us-east-1");

        let error = LoggerConfig::from_env().unwrap_err();

        assert!(error.to_string().contains("Log group name"));
        clear_env();
    }
}
