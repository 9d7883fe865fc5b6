/// Log line parsing and normalization
///
/// Turns one raw input line into a [`LogRecord`] by trying a fixed,
/// ordered chain of format parsers. The first parser that accepts the line
/// wins; when none does the caller prints the line unchanged.
///
/// # Architecture
///
/// - `traits.rs`: the `LogParser` capability every format implements
/// - `model.rs`: records, field values, field keys and the error taxonomy
/// - `time.rs`: timestamp normalization shared by every parser
/// - `tail.rs`: locates a JSON object glued to the end of a text line
/// - `formats/`: JSON, console and access-log grammars
/// - `dispatch.rs`: the fallback chain
/// - `stats.rs`: per-run counters
///
/// Every parser is total-or-nothing: it returns a complete record or an
/// error, never a partially filled record.

pub mod traits;
pub mod model;
pub mod time;
pub mod tail;
pub mod formats;
pub mod dispatch;
pub mod stats;
pub mod ansi;

// Re-export commonly used types
pub use traits::LogParser;
pub use model::{FieldKeys, FieldValue, LogFormat, LogRecord, ParseError, LOGGER_KEY};
pub use dispatch::LineParser;
pub use stats::ParseStats;
pub use time::{normalize, ZERO_TIMESTAMP};

// Constants
pub const MAX_LINE_SIZE: usize = 1_048_576; // 1MB
