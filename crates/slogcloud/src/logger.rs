// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The logging facade and its factory.
//!
//! Callers hold an `Arc<dyn Logger>` and pass it to whatever needs to log.
//! Nothing is installed globally.

use std::convert::Infallible;
use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use cloudwatch_logs::{HttpLogService, LogService};
use tracing::{debug, error};

use crate::config::{Environment, LoggerConfig};
use crate::console::ConsoleLogger;
use crate::constants::{ERROR_KEY, FATAL_EXIT_CODE, FATAL_KEY};
use crate::error::{EmitError, LoggerError};
use crate::handler::EmissionHandler;
use crate::provisioner::{LogDestination, Provisioner};
use crate::record::{Level, LogRecord};

/// Where a logger sends its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Console,
    Cloud,
}

/// A structured logger.
///
/// Implementors provide [`Logger::log`]; the level helpers build records and
/// delegate to it.
#[async_trait]
pub trait Logger: Send + Sync {
    async fn log(&self, record: LogRecord) -> Result<(), EmitError>;

    fn backend(&self) -> Backend;

    async fn debug(&self, message: &str) -> Result<(), EmitError> {
        self.log(LogRecord::new(Level::Debug, message)).await
    }

    async fn info(&self, message: &str) -> Result<(), EmitError> {
        self.log(LogRecord::new(Level::Info, message)).await
    }

    async fn warn(&self, message: &str) -> Result<(), EmitError> {
        self.log(LogRecord::new(Level::Warn, message)).await
    }

    /// Logs at error level with `err`, if any, under the `error` key.
    async fn error(
        &self,
        message: &str,
        err: Option<&(dyn Error + Send + Sync)>,
    ) -> Result<(), EmitError> {
        let mut record = LogRecord::new(Level::Error, message);
        if let Some(err) = err {
            record = record.with_error(ERROR_KEY, err);
        }
        self.log(record).await
    }

    /// Logs at fatal level with `err`, if any, under the `fatal` key, then
    /// exits the process with status 1 whether or not the record was emitted.
    async fn fatal(&self, message: &str, err: Option<&(dyn Error + Send + Sync)>) -> Infallible {
        let mut record = LogRecord::new(Level::Fatal, message);
        if let Some(err) = err {
            record = record.with_error(FATAL_KEY, err);
        }
        self.fatal_record(record).await
    }

    /// Emits `record` at fatal level, then exits with status 1.
    async fn fatal_record(&self, mut record: LogRecord) -> Infallible {
        record.level = Level::Fatal;
        if let Err(e) = self.log(record).await {
            error!("Failed to emit fatal log record: {e}");
        }
        std::process::exit(FATAL_EXIT_CODE)
    }
}

/// Logger bound to a provisioned CloudWatch Logs stream.
#[derive(Debug, Clone)]
pub struct CloudLogger {
    handler: EmissionHandler,
    min_level: Level,
}

impl CloudLogger {
    pub fn new(destination: LogDestination, min_level: Level) -> Self {
        Self {
            handler: EmissionHandler::new(destination),
            min_level,
        }
    }

    #[must_use]
    pub fn destination(&self) -> &LogDestination {
        self.handler.destination()
    }
}

#[async_trait]
impl Logger for CloudLogger {
    async fn log(&self, record: LogRecord) -> Result<(), EmitError> {
        if record.level < self.min_level {
            return Ok(());
        }
        self.handler.emit(&record).await
    }

    fn backend(&self) -> Backend {
        Backend::Cloud
    }
}

/// Builds the logger selected by `config.environment`.
///
/// Dev returns a console logger without touching the network. Prod provisions
/// a log group and stream through the HTTP client and fails if that fails.
pub async fn get_logger(config: &LoggerConfig) -> Result<Arc<dyn Logger>, LoggerError> {
    config.validate()?;
    match config.environment {
        Environment::Dev => Ok(console_logger(config)),
        Environment::Prod => {
            let service = HttpLogService::new(
                config.credentials(),
                config.region()?,
                config.client_options(),
            )?;
            debug!("Using CloudWatch Logs endpoint {}", service.endpoint());
            cloud_logger(config, Arc::new(service)).await
        }
    }
}

/// Same as [`get_logger`], provisioning through `service` in prod.
pub async fn get_logger_with_service(
    config: &LoggerConfig,
    service: Arc<dyn LogService>,
) -> Result<Arc<dyn Logger>, LoggerError> {
    config.validate()?;
    match config.environment {
        Environment::Dev => Ok(console_logger(config)),
        Environment::Prod => cloud_logger(config, service).await,
    }
}

fn console_logger(config: &LoggerConfig) -> Arc<dyn Logger> {
    Arc::new(ConsoleLogger::stdout(config.min_level))
}

async fn cloud_logger(
    config: &LoggerConfig,
    service: Arc<dyn LogService>,
) -> Result<Arc<dyn Logger>, LoggerError> {
    let provisioner = Provisioner::new(service, config.provisioner.clone());
    let destination = provisioner.provision(&config.log_group).await?;
    Ok(Arc::new(CloudLogger::new(destination, config.min_level)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudwatch_logs::testing::{access_denied, InMemoryLogService, Operation};
    use serde_json::{json, Value};
    use std::io;

    fn prod_config() -> LoggerConfig {
        LoggerConfig::new(Environment::Prod, "AKID", "secret", "app-logs", "us-east-1")
    }

    fn shared(service: &Arc<InMemoryLogService>) -> Arc<dyn LogService> {
        Arc::clone(service) as Arc<dyn LogService>
    }

    fn messages(service: &InMemoryLogService) -> Vec<Value> {
        service
            .events()
            .into_iter()
            .map(|(_, _, event)| serde_json::from_str(&event.message).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn dev_never_touches_the_service() {
        let service = Arc::new(InMemoryLogService::new());
        let config = LoggerConfig::new(Environment::Dev, "", "", "", "");

        let logger = get_logger_with_service(&config, shared(&service))
            .await
            .unwrap();

        assert_eq!(logger.backend(), Backend::Console);
        assert_eq!(service.calls(Operation::DescribeLogGroup), 0);
        assert_eq!(service.calls(Operation::CreateLogGroup), 0);
        assert_eq!(service.calls(Operation::CreateLogStream), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn prod_provisions_then_emits() {
        let service = Arc::new(InMemoryLogService::new());

        let logger = get_logger_with_service(&prod_config(), shared(&service))
            .await
            .unwrap();
        logger.info("hello").await.unwrap();
        let cause = io::Error::new(io::ErrorKind::Other, "boom");
        logger.error("failed", Some(&cause)).await.unwrap();

        assert_eq!(logger.backend(), Backend::Cloud);
        assert!(service.has_group("app-logs"));
        assert_eq!(
            messages(&service),
            vec![
                json!({ "message": "hello" }),
                json!({ "message": "failed", "error": "boom" }),
            ]
        );
        let streams: Vec<String> = service.events().into_iter().map(|(_, s, _)| s).collect();
        assert_eq!(streams[0], streams[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn prod_provisioning_failure_yields_no_logger() {
        let service = Arc::new(InMemoryLogService::new().with_group("app-logs"));
        service.fail_next(Operation::CreateLogStream, access_denied());

        let result = get_logger_with_service(&prod_config(), shared(&service)).await;

        assert!(matches!(result, Err(LoggerError::Provision(_))));
    }

    #[tokio::test]
    async fn invalid_prod_config_fails_before_any_call() {
        let service = Arc::new(InMemoryLogService::new());
        let config = LoggerConfig {
            access_key_id: String::new(),
            ..prod_config()
        };

        let result = get_logger_with_service(&config, shared(&service)).await;

        assert!(matches!(result, Err(LoggerError::Config(_))));
        assert_eq!(service.calls(Operation::DescribeLogGroup), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cloud_logger_filters_by_minimum_level() {
        let service = Arc::new(InMemoryLogService::new());
        let config = LoggerConfig {
            min_level: Level::Warn,
            ..prod_config()
        };

        let logger = get_logger_with_service(&config, shared(&service))
            .await
            .unwrap();
        logger.debug("hidden").await.unwrap();
        logger.info("hidden").await.unwrap();
        logger.warn("shown").await.unwrap();

        assert_eq!(messages(&service), vec![json!({ "message": "shown" })]);
        assert_eq!(service.calls(Operation::PutLogEvents), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_records_keep_attribute_order() {
        let service = Arc::new(InMemoryLogService::new());
        let logger = get_logger_with_service(&prod_config(), shared(&service))
            .await
            .unwrap();

        logger
            .log(
                LogRecord::new(Level::Info, "checkout")
                    .with_attr("order_id", 981)
                    .with_attr("currency", "EUR"),
            )
            .await
            .unwrap();

        let (_, _, event) = &service.events()[0];
        assert_eq!(
            event.message,
            r#"{"message":"checkout","order_id":981,"currency":"EUR"}"#
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_emits_share_one_stream() {
        const TASKS: usize = 16;
        let service = Arc::new(InMemoryLogService::new().with_group("app-logs"));
        let logger = get_logger_with_service(&prod_config(), shared(&service))
            .await
            .unwrap();

        let handles: Vec<_> = (0..TASKS)
            .map(|i| {
                let logger = Arc::clone(&logger);
                tokio::spawn(async move { logger.info(&format!("event {i}")).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let events = service.events();
        assert_eq!(events.len(), TASKS);
        assert_eq!(service.calls(Operation::CreateLogStream), 1);
        let stream = &events[0].1;
        assert!(events.iter().all(|(group, s, _)| group == "app-logs" && s == stream));
        let mut seen: Vec<String> = messages(&service)
            .into_iter()
            .map(|m| m["message"].as_str().unwrap().to_string())
            .collect();
        seen.sort();
        let mut expected: Vec<String> = (0..TASKS).map(|i| format!("event {i}")).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }
}
