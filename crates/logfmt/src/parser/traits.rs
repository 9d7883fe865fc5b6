pub use super::model::{FieldKeys, FieldValue, LogFormat, LogRecord, ParseError, LOGGER_KEY};

pub trait LogParser: Send + Sync {
    /// parse a raw log line into a record, or fail without side effects
    fn parse(&self, raw: &[u8], keys: &FieldKeys) -> Result<LogRecord, ParseError>;
    fn format(&self) -> LogFormat;
}
