use super::formats::*;
use super::traits::*;
use super::MAX_LINE_SIZE;

/// Ordered fallback chain of format parsers.
///
/// 1. JSON (whole line is an object)
/// 2. Access log (only when enabled)
/// 3. Console encoder layout
///
/// The first parser that accepts a line wins. There is no scoring: a line
/// that fits two grammars always goes to the earlier one.
pub struct LineParser {
    parsers: Vec<Box<dyn LogParser>>,
}

impl LineParser {
    pub fn new(access_logs: bool) -> Self {
        let mut parsers: Vec<Box<dyn LogParser>> = vec![Box::new(JsonParser)];
        if access_logs {
            parsers.push(Box::new(AccessLogParser));
        }
        parsers.push(Box::new(ConsoleParser));

        Self { parsers }
    }

    /// Build a chain from an explicit, already ordered list of parsers.
    pub fn with_parsers(parsers: Vec<Box<dyn LogParser>>) -> Self {
        Self { parsers }
    }

    pub fn formats(&self) -> Vec<LogFormat> {
        self.parsers.iter().map(|p| p.format()).collect()
    }

    pub fn parse(&self, line: &[u8], keys: &FieldKeys) -> Result<LogRecord, ParseError> {
        self.parse_with_format(line, keys).map(|(_, record)| record)
    }

    /// Like [`LineParser::parse`], also reporting which format matched.
    ///
    /// Individual parser failures stay inside the chain; the only error
    /// returned is [`ParseError::Unparseable`].
    pub fn parse_with_format(
        &self,
        line: &[u8],
        keys: &FieldKeys,
    ) -> Result<(LogFormat, LogRecord), ParseError> {
        if line.len() > MAX_LINE_SIZE {
            tracing::debug!(len = line.len(), max = MAX_LINE_SIZE, "line too large, skipping parse");
            return Err(ParseError::Unparseable);
        }

        for parser in &self.parsers {
            match parser.parse(line, keys) {
                Ok(record) => return Ok((parser.format(), record)),
                Err(e) => {
                    tracing::trace!(format = parser.format().as_str(), error = %e, "parser declined line");
                }
            }
        }

        Err(ParseError::Unparseable)
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_LINE: &[u8] = br#"[2016-04-15T20:17:00.310Z] "POST /api/v1/locations HTTP/2" 204 - 154 0 226 100 "10.0.35.28" "nsq2http" "cc21d9b0-cf5c-432b-8c7e-98aeb7988cd2" "locations" "tcp://10.0.2.1:80""#;

    struct Fixed(LogFormat, &'static str);

    impl LogParser for Fixed {
        fn parse(&self, _raw: &[u8], keys: &FieldKeys) -> Result<LogRecord, ParseError> {
            let mut record = LogRecord::new();
            record.insert(keys.message.as_str(), self.1);
            Ok(record)
        }

        fn format(&self) -> LogFormat {
            self.0
        }
    }

    struct Never;

    impl LogParser for Never {
        fn parse(&self, _raw: &[u8], _keys: &FieldKeys) -> Result<LogRecord, ParseError> {
            Err(ParseError::NoMatch)
        }

        fn format(&self) -> LogFormat {
            LogFormat::AccessLog
        }
    }

    #[test]
    fn test_default_chain_order() {
        assert_eq!(LineParser::new(false).formats(), vec![LogFormat::Json, LogFormat::Console]);
        assert_eq!(
            LineParser::new(true).formats(),
            vec![LogFormat::Json, LogFormat::AccessLog, LogFormat::Console]
        );
    }

    #[test]
    fn test_dispatch_json_line() {
        let parser = LineParser::default();
        let (format, record) = parser
            .parse_with_format(br#"{"ts":1658394755.54,"level":"error","msg":"failed to connect"}"#, &FieldKeys::default())
            .unwrap();
        assert_eq!(format, LogFormat::Json);
        assert_eq!(record.get_str("msg"), Some("failed to connect"));
    }

    #[test]
    fn test_dispatch_console_line() {
        let parser = LineParser::default();
        let (format, record) = parser
            .parse_with_format(br#"1658394755.540 INFO mylogger file.go:10 request handled {"user":"alice"}"#, &FieldKeys::default())
            .unwrap();
        assert_eq!(format, LogFormat::Console);
        assert_eq!(record.get_str("user"), Some("alice"));
    }

    #[test]
    fn test_access_log_only_when_enabled() {
        let keys = FieldKeys::default();

        let disabled = LineParser::new(false);
        assert_eq!(disabled.parse(ACCESS_LINE, &keys).unwrap_err(), ParseError::Unparseable);

        let enabled = LineParser::new(true);
        let (format, record) = enabled.parse_with_format(ACCESS_LINE, &keys).unwrap();
        assert_eq!(format, LogFormat::AccessLog);
        assert_eq!(record.get_str("msg"), Some("POST /api/v1/locations HTTP/2"));
    }

    #[test]
    fn test_first_success_wins() {
        let chain = LineParser::with_parsers(vec![
            Box::new(Never),
            Box::new(Fixed(LogFormat::AccessLog, "first")),
            Box::new(Fixed(LogFormat::Console, "second")),
        ]);
        let (format, record) = chain.parse_with_format(b"anything", &FieldKeys::default()).unwrap();
        assert_eq!(format, LogFormat::AccessLog);
        assert_eq!(record.get_str("msg"), Some("first"));
    }

    #[test]
    fn test_garbage_is_unparseable() {
        let parser = LineParser::new(true);
        let keys = FieldKeys::default();
        let samples: Vec<&[u8]> = vec![
            b"",
            b"just some words without structure",
            b"{broken json",
            b"\xff\xfe\x00\x01",
            br#"1.5 INFO log a.go:1 text {"data": "a } b"}"#,
        ];
        for sample in samples {
            assert_eq!(parser.parse(sample, &keys).unwrap_err(), ParseError::Unparseable);
        }
    }

    #[test]
    fn test_oversized_line_is_unparseable() {
        let mut line = br#"{"msg":""#.to_vec();
        line.extend(std::iter::repeat(b'x').take(MAX_LINE_SIZE));
        line.extend_from_slice(br#""}"#);

        let parser = LineParser::default();
        assert_eq!(parser.parse(&line, &FieldKeys::default()).unwrap_err(), ParseError::Unparseable);
    }
}
