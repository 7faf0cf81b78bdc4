// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

mod formatter;

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use slogcloud::{get_logger, AttrValue, Environment, Level, LogRecord, LoggerConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::formatter::Formatter;

/// Emit one structured log record to CloudWatch Logs (prod) or stdout (dev).
#[derive(Parser, Debug)]
#[command(name = "slogcloud", version)]
struct Args {
    /// Backend selection: prod or dev
    #[arg(long, env = "SLOGCLOUD_ENV", default_value = "dev")]
    env: Environment,

    /// CloudWatch Logs group, created if missing
    #[arg(long, env = "SLOGCLOUD_LOG_GROUP", default_value = "")]
    log_group: String,

    #[arg(long, env = "AWS_REGION", default_value = "")]
    region: String,

    /// Overrides the regional CloudWatch Logs endpoint
    #[arg(long, env = "SLOGCLOUD_ENDPOINT")]
    endpoint: Option<String>,

    #[arg(long, env = "SLOGCLOUD_STREAM_PREFIX")]
    stream_prefix: Option<String>,

    /// Level of the emitted record; fatal exits with status 1
    #[arg(long, env = "SLOGCLOUD_RECORD_LEVEL", default_value = "info")]
    level: Level,

    /// Records below this level are dropped
    #[arg(long, env = "SLOGCLOUD_LOG_LEVEL", default_value = "debug")]
    min_level: Level,

    /// Attribute as key=value; JSON values are kept typed
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attr)]
    attrs: Vec<(String, AttrValue)>,

    #[arg(long, env = "AWS_ACCESS_KEY_ID", default_value = "", hide_env_values = true)]
    access_key_id: String,

    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", default_value = "", hide_env_values = true)]
    secret_access_key: String,

    #[arg(long, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    session_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "SLOGCLOUD_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// HTTPS proxy URL
    #[arg(long, env = "SLOGCLOUD_PROXY_HTTPS")]
    https_proxy: Option<String>,

    /// Message of the record
    message: String,
}

impl Args {
    fn logger_config(&self) -> LoggerConfig {
        let mut config = LoggerConfig::new(
            self.env,
            &self.access_key_id,
            &self.secret_access_key,
            &self.log_group,
            &self.region,
        );
        config.session_token = self.session_token.clone();
        config.endpoint = self.endpoint.clone();
        config.min_level = self.min_level;
        config.timeout = Duration::from_secs(self.timeout_secs);
        config.https_proxy = self
            .https_proxy
            .clone()
            .or_else(|| env::var("HTTPS_PROXY").ok());
        if let Some(prefix) = &self.stream_prefix {
            config.provisioner.stream_prefix = prefix.clone();
        }
        config
    }

    fn record(&self) -> LogRecord {
        self.attrs.iter().fold(
            LogRecord::new(self.level, self.message.clone()),
            |record, (key, value)| record.with_attr(key.clone(), value.clone()),
        )
    }
}

fn parse_attr(raw: &str) -> Result<(String, AttrValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("attribute key cannot be empty in '{raw}'"));
    }
    let value = match serde_json::from_str::<Value>(value) {
        Ok(Value::String(s)) => AttrValue::String(s),
        Ok(json) => AttrValue::Json(json),
        Err(_) => AttrValue::String(value.to_string()),
    };
    Ok((key.to_string(), value))
}

fn init_diagnostics() -> Result<()> {
    let level = env::var("SLOGCLOUD_DIAGNOSTICS_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or_else(|_| "warn".to_string());
    let env_filter = format!("h2=off,hyper=off,rustls=off,{level}");

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter)
                .context("could not parse SLOGCLOUD_DIAGNOSTICS_LEVEL")?,
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .event_format(Formatter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install diagnostics subscriber")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_diagnostics()?;
    debug!("Starting slogcloud in {} mode", args.env);

    let logger = get_logger(&args.logger_config())
        .await
        .context("failed to create logger")?;
    let record = args.record();
    if record.level == Level::Fatal {
        match logger.fatal_record(record).await {}
    }
    logger.log(record).await.context("failed to emit log record")?;
    Ok(())
}
