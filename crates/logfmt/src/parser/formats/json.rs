use crate::parser::time::normalize;
use crate::parser::traits::*;
use serde_json::{Map, Value};

/// Parser for lines that are a single JSON object.
///
/// The whole line must decode; trailing garbage after the object is an
/// error, not something to skip. The configured timestamp field, when
/// present, is normalized into a time value. A timestamp that cannot be
/// normalized is left as it was so the renderer can still show it.
pub struct JsonParser;

impl LogParser for JsonParser {
    fn parse(&self, raw: &[u8], keys: &FieldKeys) -> Result<LogRecord, ParseError> {
        let object: Map<String, Value> = serde_json::from_slice(raw)
            .map_err(|e| ParseError::NotJson(e.to_string()))?;

        let mut record = LogRecord::from_json_object(object);

        let normalized = record.get(&keys.timestamp).map(normalize);
        match normalized {
            Some(Ok(ts)) => {
                record.insert(keys.timestamp.as_str(), FieldValue::Time(ts));
            }
            Some(Err(e)) => {
                tracing::trace!(field = %keys.timestamp, error = %e, "keeping timestamp as-is");
            }
            None => {}
        }

        Ok(record)
    }

    fn format(&self) -> LogFormat {
        LogFormat::Json
    }
}
