// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Console backend used in development. Writes one line per record:
//!
//! ```text
//! INFO: user signed in user=alice attempts=2
//! ```

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::EmitError;
use crate::logger::{Backend, Logger};
use crate::record::{AttrValue, Level, LogRecord};

pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

pub struct ConsoleLogger {
    writer: SharedWriter,
    min_level: Level,
}

impl ConsoleLogger {
    /// Logger writing to the process's standard output.
    #[must_use]
    pub fn stdout(min_level: Level) -> Self {
        Self::with_writer(Arc::new(Mutex::new(Box::new(io::stdout()))), min_level)
    }

    pub fn with_writer(writer: SharedWriter, min_level: Level) -> Self {
        Self { writer, min_level }
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

#[async_trait]
impl Logger for ConsoleLogger {
    async fn log(&self, record: LogRecord) -> Result<(), EmitError> {
        if record.level < self.min_level {
            return Ok(());
        }
        self.write_line(&format_line(&record))?;
        Ok(())
    }

    fn backend(&self) -> Backend {
        Backend::Console
    }
}

/// Renders `LEVEL: message key=value ...`.
#[must_use]
pub fn format_line(record: &LogRecord) -> String {
    let mut line = format!("{}: {}", record.level, record.message);
    for (key, value) in &record.attributes {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        match value {
            AttrValue::String(s) | AttrValue::Error(s)
                if s.is_empty() || s.contains(char::is_whitespace) =>
            {
                line.push_str(&format!("{s:?}"));
            }
            other => line.push_str(&other.to_string()),
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn logger(min_level: Level) -> (ConsoleLogger, Capture) {
        let capture = Capture::default();
        let writer: SharedWriter = Arc::new(Mutex::new(Box::new(capture.clone())));
        (ConsoleLogger::with_writer(writer, min_level), capture)
    }

    #[test]
    fn test_format_line() {
        let record = LogRecord::new(Level::Warn, "disk almost full")
            .with_attr("free_mb", 12)
            .with_attr("mount", "/var")
            .with_attr("note", "check soon")
            .with_attr("tags", json!(["a", "b"]));

        assert_eq!(
            format_line(&record),
            r#"WARN: disk almost full free_mb=12 mount=/var note="check soon" tags=["a","b"]"#
        );
    }

    #[tokio::test]
    async fn test_level_helpers_write_prefixed_lines() {
        let (logger, capture) = logger(Level::Debug);

        logger.debug("starting").await.unwrap();
        logger.info("ready").await.unwrap();
        logger.warn("slow").await.unwrap();

        assert_eq!(capture.text(), "DEBUG: starting\nINFO: ready\nWARN: slow\n");
        assert_eq!(logger.backend(), Backend::Console);
    }

    #[tokio::test]
    async fn test_error_attaches_error_text() {
        let (logger, capture) = logger(Level::Debug);
        let cause = io::Error::new(io::ErrorKind::Other, "connection reset");

        logger.error("request failed", Some(&cause)).await.unwrap();
        logger.error("no cause", None).await.unwrap();

        assert_eq!(
            capture.text(),
            "ERROR: request failed error=\"connection reset\"\nERROR: no cause\n"
        );
    }

    #[tokio::test]
    async fn test_records_below_minimum_are_dropped() {
        let (logger, capture) = logger(Level::Warn);

        logger.debug("hidden").await.unwrap();
        logger.info("hidden").await.unwrap();
        logger.warn("shown").await.unwrap();

        assert_eq!(capture.text(), "WARN: shown\n");
    }
}
