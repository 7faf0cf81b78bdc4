// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The structured log record handed from the facade to a backend.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

/// Severity of a record. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid log level '{}'. Must be one of: debug, info, warn, error, fatal",
            self.0
        )
    }
}

impl Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Value of one record attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
    /// An error, kept only as its `Display` text.
    Error(String),
    /// Arbitrary JSON (nested objects, arrays).
    Json(Value),
}

impl AttrValue {
    /// Captures an error as its description. Type and source chain are dropped.
    pub fn error(err: &(dyn Error + '_)) -> Self {
        AttrValue::Error(err.to_string())
    }

    /// Best-effort conversion of any serializable value.
    ///
    /// A value that fails to serialize becomes a string describing the failure
    /// so the record can still be emitted.
    pub fn serialized<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => AttrValue::Json(value),
            Err(e) => AttrValue::String(format!("<unserializable: {e}>")),
        }
    }

    /// JSON representation used on the wire.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Null => Value::Null,
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::I64(n) => Value::from(*n),
            AttrValue::U64(n) => Value::from(*n),
            AttrValue::F64(n) => {
                serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number)
            }
            AttrValue::String(s) | AttrValue::Error(s) => Value::String(s.clone()),
            AttrValue::Json(v) => v.clone(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(s) | AttrValue::Error(s) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

macro_rules! attr_from {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    AttrValue::$variant(<$target>::from(value))
                }
            }
        )*
    };
}

attr_from! {
    bool => Bool as bool,
    i8 => I64 as i64,
    i16 => I64 as i64,
    i32 => I64 as i64,
    i64 => I64 as i64,
    u8 => U64 as u64,
    u16 => U64 as u64,
    u32 => U64 as u64,
    u64 => U64 as u64,
    f32 => F64 as f64,
    f64 => F64 as f64,
    String => String as String,
    &str => String as String,
    Value => Json as Value,
}

impl From<usize> for AttrValue {
    fn from(value: usize) -> Self {
        AttrValue::U64(value as u64)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}

/// One log call: a message plus ordered key/value attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub attributes: Vec<(String, AttrValue)>,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Attaches `err` under `key` as its description.
    #[must_use]
    pub fn with_error(mut self, key: impl Into<String>, err: &(dyn Error + '_)) -> Self {
        self.attributes.push((key.into(), AttrValue::error(err)));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }

    impl Error for Boom {}

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!("INFO".parse::<Level>(), Ok(Level::Info));
        assert_eq!("warning".parse::<Level>(), Ok(Level::Warn));
        assert_eq!(" fatal ".parse::<Level>(), Ok(Level::Fatal));
        assert!("verbose".parse::<Level>().is_err());
        assert!(Level::Debug < Level::Fatal);
    }

    #[test]
    fn error_values_keep_only_text() {
        let record = LogRecord::new(Level::Error, "failed").with_error("cause", &Boom);
        assert_eq!(
            record.attributes,
            vec![("cause".to_string(), AttrValue::Error("boom".to_string()))]
        );
    }

    #[test]
    fn primitive_conversions() {
        assert_eq!(AttrValue::from(42), AttrValue::I64(42));
        assert_eq!(AttrValue::from(7_u8), AttrValue::U64(7));
        assert_eq!(AttrValue::from("x"), AttrValue::String("x".to_string()));
        assert_eq!(AttrValue::from(None::<i32>), AttrValue::Null);
        assert_eq!(AttrValue::from(json!([1, 2])).to_json(), json!([1, 2]));
    }

    #[test]
    fn non_finite_floats_render_as_null() {
        assert_eq!(AttrValue::F64(f64::NAN).to_json(), Value::Null);
        assert_eq!(AttrValue::F64(1.5).to_json(), json!(1.5));
    }

    #[test]
    fn serialized_values_degrade_instead_of_failing() {
        use std::collections::BTreeMap;

        let mut map: BTreeMap<(i32, i32), i32> = BTreeMap::new();
        map.insert((1, 2), 3);
        match AttrValue::serialized(&map) {
            AttrValue::String(s) => assert!(s.starts_with("<unserializable:")),
            other => panic!("expected degraded value, got {other:?}"),
        }

        assert_eq!(
            AttrValue::serialized(&vec!["a", "b"]),
            AttrValue::Json(json!(["a", "b"]))
        );
    }
}
