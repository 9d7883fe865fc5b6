use crate::parser::tail::extract_tail;
use crate::parser::time::from_epoch_seconds;
use crate::parser::traits::*;
use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;

/// Leading epoch timestamp, e.g. `1658394755.540` or `1.6583947555403e+09`.
static TIMESTAMP_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+(?:[eE]\+\d+)?").unwrap());

const SEPARATORS: &[char] = &[' ', '\t', '\r', '\n'];

/// Parser for the console encoder layout of structured loggers:
///
/// ```text
/// <epoch> <level> <logger> <caller> <free text> [{"trailing":"json"}]
/// ```
///
/// The four leading tokens are positional and each one is required. The
/// trailing object is optional: without a closing brace the whole remainder
/// is the message, but a closing brace that does not lead to a valid object
/// fails the parse.
pub struct ConsoleParser;

impl LogParser for ConsoleParser {
    fn parse(&self, raw: &[u8], keys: &FieldKeys) -> Result<LogRecord, ParseError> {
        let text = std::str::from_utf8(raw).map_err(|_| ParseError::NonUtf8)?;

        let (timestamp, rest) = take_timestamp(text)?;
        let (level, rest) = next_token(rest).ok_or(ParseError::MissingLevel)?;
        let (logger, rest) = next_token(rest).ok_or(ParseError::MissingLogger)?;
        let (caller, rest) = next_token(rest).ok_or(ParseError::MissingCaller)?;

        let (mut record, message) = match extract_tail(rest.as_bytes()) {
            // The split point is a `{`, so it is always a char boundary.
            Ok((object, prefix)) => (
                LogRecord::from_json_object(object),
                rest[..prefix.len()].trim_matches(SEPARATORS),
            ),
            Err(ParseError::NoTrailingObject) => (LogRecord::new(), rest.trim_matches(SEPARATORS)),
            Err(e) => return Err(e),
        };

        // Positional fields are written last so they win over the tail.
        record.insert(keys.timestamp.as_str(), FieldValue::Time(timestamp));
        record.insert(keys.level.as_str(), level);
        record.insert(LOGGER_KEY, logger);
        record.insert(keys.caller.as_str(), caller);
        record.insert(keys.message.as_str(), message);

        Ok(record)
    }

    fn format(&self) -> LogFormat {
        LogFormat::Console
    }
}

/// The timestamp must start the line and be followed by a separator.
fn take_timestamp(text: &str) -> Result<(DateTime<FixedOffset>, &str), ParseError> {
    let token = TIMESTAMP_TOKEN.find(text).ok_or(ParseError::MissingTimestamp)?;
    let rest = &text[token.end()..];
    if !rest.is_empty() && !rest.starts_with(SEPARATORS) {
        return Err(ParseError::MissingTimestamp);
    }

    let seconds: f64 = token.as_str().parse().map_err(|_| ParseError::MissingTimestamp)?;
    let timestamp = from_epoch_seconds(seconds).map_err(|_| ParseError::MissingTimestamp)?;
    Ok((timestamp, rest))
}

fn next_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start_matches(SEPARATORS);
    if text.is_empty() {
        return None;
    }
    let end = text.find(SEPARATORS).unwrap_or(text.len());
    Some((&text[..end], &text[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SecondsFormat;

    fn parse(raw: &str) -> Result<LogRecord, ParseError> {
        ConsoleParser.parse(raw.as_bytes(), &FieldKeys::default())
    }

    fn ts_string(record: &LogRecord) -> String {
        match record.get("ts") {
            Some(FieldValue::Time(t)) => t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            other => panic!("expected time, got {:?}", other),
        }
    }

    #[test]
    fn test_console_line_with_trailing_object() {
        let record =
            parse(r#"1658394755.540 INFO mylogger file.go:10 request handled {"user":"alice"}"#).unwrap();

        assert_eq!(ts_string(&record), "2022-07-21T09:12:35.540Z");
        assert_eq!(record.get_str("level"), Some("INFO"));
        assert_eq!(record.get_str("logger"), Some("mylogger"));
        assert_eq!(record.get_str("caller"), Some("file.go:10"));
        assert_eq!(record.get_str("msg"), Some("request handled"));
        assert_eq!(record.get_str("user"), Some("alice"));
        assert_eq!(record.len(), 6);
    }

    #[test]
    fn test_console_zap_exponent_and_tabs() {
        let record = parse("1.6583947555403e+09\tinfo\tmain\tmain.go:42\tstarting server\n").unwrap();

        assert_eq!(ts_string(&record), "2022-07-21T09:12:35.540300Z");
        assert_eq!(record.get_str("level"), Some("info"));
        assert_eq!(record.get_str("logger"), Some("main"));
        assert_eq!(record.get_str("caller"), Some("main.go:42"));
        assert_eq!(record.get_str("msg"), Some("starting server"));
    }

    #[test]
    fn test_console_without_tail_keeps_whole_remainder() {
        let record = parse("1.5e+09 WARN db pool.go:7   slow query took {n} ms  ").unwrap();
        assert_eq!(record.get_str("msg"), Some("slow query took {n} ms"));
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn test_console_empty_message() {
        let record = parse("1.5 INFO log caller.go:1").unwrap();
        assert_eq!(record.get_str("msg"), Some(""));

        let record = parse(r#"1.5 INFO log caller.go:1 {"k":1}"#).unwrap();
        assert_eq!(record.get_str("msg"), Some(""));
        assert!(record.contains_key("k"));
    }

    #[test]
    fn test_console_positional_fields_win_over_tail() {
        let record = parse(
            r#"1.5 ERROR real caller.go:1 text {"ts":1,"level":"debug","logger":"fake","caller":"x","msg":"nope","extra":true}"#,
        )
        .unwrap();

        assert_eq!(record.get_str("level"), Some("ERROR"));
        assert_eq!(record.get_str("logger"), Some("real"));
        assert_eq!(record.get_str("caller"), Some("caller.go:1"));
        assert_eq!(record.get_str("msg"), Some("text"));
        assert!(matches!(record.get("ts"), Some(FieldValue::Time(_))));
        assert_eq!(record.get("extra"), Some(&FieldValue::Bool(true)));
    }

    #[test]
    fn test_console_uses_configured_keys() {
        let keys = FieldKeys {
            timestamp: "time".to_string(),
            message: "message".to_string(),
            level: "severity".to_string(),
            caller: "source".to_string(),
        };
        let record = ConsoleParser.parse(b"1.5 INFO log a.go:1 hello", &keys).unwrap();

        assert!(matches!(record.get("time"), Some(FieldValue::Time(_))));
        assert_eq!(record.get_str("severity"), Some("INFO"));
        assert_eq!(record.get_str("source"), Some("a.go:1"));
        assert_eq!(record.get_str("message"), Some("hello"));
        assert_eq!(record.get_str("logger"), Some("log"));
    }

    #[test]
    fn test_console_step_failures() {
        assert_eq!(parse("").unwrap_err(), ParseError::MissingTimestamp);
        assert_eq!(parse("hello world").unwrap_err(), ParseError::MissingTimestamp);
        assert_eq!(parse(" 1.5 INFO a b").unwrap_err(), ParseError::MissingTimestamp);
        assert_eq!(parse("1.2.3 INFO a b").unwrap_err(), ParseError::MissingTimestamp);
        assert_eq!(parse("1658394755 INFO a b").unwrap_err(), ParseError::MissingTimestamp);
        assert_eq!(parse("1.5").unwrap_err(), ParseError::MissingLevel);
        assert_eq!(parse("1.5   \t").unwrap_err(), ParseError::MissingLevel);
        assert_eq!(parse("1.5 INFO").unwrap_err(), ParseError::MissingLogger);
        assert_eq!(parse("1.5 INFO logger ").unwrap_err(), ParseError::MissingCaller);
    }

    #[test]
    fn test_console_malformed_tail_fails_the_parse() {
        let err = parse(r#"1.5 INFO log a.go:1 text {"a": }"#).unwrap_err();
        assert!(matches!(err, ParseError::MalformedTrailingObject(_)));

        // Brace inside a quoted value: the count never balances.
        let err = parse(r#"1.5 INFO log a.go:1 text {"data": "a } b"}"#).unwrap_err();
        assert!(matches!(err, ParseError::MalformedTrailingObject(_)));
    }

    #[test]
    fn test_console_rejects_non_utf8() {
        let err = ConsoleParser.parse(b"1.5 INFO a b \xff\xfe", &FieldKeys::default()).unwrap_err();
        assert_eq!(err, ParseError::NonUtf8);
    }
}
