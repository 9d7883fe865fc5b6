use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Key the console grammar stores the logger name under.
pub const LOGGER_KEY: &str = "logger";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Envoy/Istio style proxy access log
    AccessLog,
    /// Human-readable encoder output: ts, level, logger, caller, text, optional JSON
    Console,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::AccessLog => "access_log",
            LogFormat::Console => "console",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unrecognized timestamp: {0}")]
    UnrecognizedTimestamp(String),

    #[error("Line does not end in a JSON object")]
    NoTrailingObject,

    #[error("Malformed trailing JSON object: {0}")]
    MalformedTrailingObject(String),

    #[error("Missing timestamp token")]
    MissingTimestamp,

    #[error("Missing level token")]
    MissingLevel,

    #[error("Missing logger token")]
    MissingLogger,

    #[error("Missing caller token")]
    MissingCaller,

    #[error("Not a JSON object: {0}")]
    NotJson(String),

    #[error("Line does not match the access log grammar")]
    NoMatch,

    #[error("Non-UTF8 content")]
    NonUtf8,

    #[error("No parser accepted the line")]
    Unparseable,
}

/// Names of the fields every parser writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKeys {
    pub timestamp: String,
    pub message: String,
    pub level: String,
    pub caller: String,
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            timestamp: "ts".to_string(),
            message: "msg".to_string(),
            level: "level".to_string(),
            caller: "caller".to_string(),
        }
    }
}

pub type Fields = BTreeMap<String, FieldValue>;

/// A single field value. Closed so the renderer can match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Time(DateTime<FixedOffset>),
    List(Vec<FieldValue>),
    Map(Fields),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Strings are returned bare; everything else is rendered as JSON.
    pub fn to_display_string(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            other => other.to_json_value().to_string(),
        }
    }

    pub fn to_json_value(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => Value::Number(n.clone()),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Time(t) => Value::String(format_time(t)),
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json_value).collect()),
            FieldValue::Map(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
        }
    }
}

fn format_time(t: &DateTime<FixedOffset>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n),
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => FieldValue::List(items.into_iter().map(FieldValue::from).collect()),
            Value::Object(obj) => FieldValue::Map(obj.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(t: DateTime<FixedOffset>) -> Self {
        FieldValue::Time(t)
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Number(n) => n.serialize(serializer),
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Time(t) => serializer.serialize_str(&format_time(t)),
            FieldValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FieldValue::Map(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

/// One parsed line: unique field names mapped to values.
///
/// Created by a parser, trimmed by the renderer, then dropped. No state
/// survives from one line to the next.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: Fields,
}

impl LogRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_object(object: Map<String, Value>) -> Self {
        Self {
            fields: object.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(FieldValue::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &FieldValue) -> bool) {
        self.fields.retain(|k, v| keep(k, v));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Level text, or the empty string when the line carried none.
    pub fn level(&self, keys: &FieldKeys) -> String {
        self.get(&keys.level).map(FieldValue::to_display_string).unwrap_or_default()
    }

    /// Message text, or the empty string when the line carried none.
    pub fn message(&self, keys: &FieldKeys) -> String {
        self.get(&keys.message).map(FieldValue::to_display_string).unwrap_or_default()
    }

    pub fn to_json_value(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json_value()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_from_json_object_keeps_every_value() {
        let value = json!({
            "s": "text",
            "n": 42,
            "f": 1.5,
            "b": true,
            "z": null,
            "list": [1, "two"],
            "nested": {"inner": false}
        });
        let Value::Object(obj) = value.clone() else { unreachable!() };

        let record = LogRecord::from_json_object(obj);

        assert_eq!(record.len(), 7);
        assert_eq!(record.get_str("s"), Some("text"));
        assert!(record.get("z").unwrap().is_null());
        assert!(matches!(record.get("list"), Some(FieldValue::List(items)) if items.len() == 2));
        assert!(matches!(record.get("nested"), Some(FieldValue::Map(_))));
        assert_eq!(record.to_json_value(), value);
    }

    #[test]
    fn test_time_serializes_as_rfc3339() {
        let t = NaiveDate::from_ymd_opt(2022, 7, 21)
            .unwrap()
            .and_hms_milli_opt(11, 12, 35, 540)
            .unwrap()
            .and_utc()
            .fixed_offset();
        let mut record = LogRecord::new();
        record.insert("ts", t);

        let out = serde_json::to_string(&record).unwrap();
        assert_eq!(out, r#"{"ts":"2022-07-21T11:12:35.540Z"}"#);
    }

    #[test]
    fn test_time_keeps_source_offset() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let t = offset.with_ymd_and_hms(2022, 7, 27, 13, 9, 39).unwrap();

        assert_eq!(FieldValue::Time(t).to_display_string(), "\"2022-07-27T13:09:39-05:00\"");
        assert_eq!(t, Utc.with_ymd_and_hms(2022, 7, 27, 18, 9, 39).unwrap());
    }

    #[test]
    fn test_level_and_message_default_to_empty() {
        let keys = FieldKeys::default();
        let record = LogRecord::new();
        assert_eq!(record.level(&keys), "");
        assert_eq!(record.message(&keys), "");
    }

    #[test]
    fn test_display_string_for_non_strings() {
        assert_eq!(FieldValue::from(json!(3)).to_display_string(), "3");
        assert_eq!(FieldValue::from(json!({"a": [true]})).to_display_string(), r#"{"a":[true]}"#);
        assert_eq!(FieldValue::from("plain").to_display_string(), "plain");
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut record = LogRecord::new();
        record.insert("level", "debug");
        let previous = record.insert("level", "info");
        assert_eq!(previous, Some(FieldValue::from("debug")));
        assert_eq!(record.len(), 1);
    }
}
