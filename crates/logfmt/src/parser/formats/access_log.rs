use crate::parser::traits::*;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

const START_TIME: &str = "start_time";
const REQUEST: &str = "request";
const RESPONSE_CODE: &str = "response_code";

/// Layout of `%START_TIME%` in the default Envoy format.
const START_TIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Envoy's default access log line, optionally followed by the six extra
/// fields Istio appends (cluster and peer addresses, SNI, route).
static ACCESS_LOG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"^\[(?P<start_time>[^\]]+)\] "#,
        r#""(?P<request>[^"]*)" "#,
        r#"(?P<response_code>\d{3}|-) "#,
        r#"(?P<response_flags>\S+) "#,
        r#"(?P<bytes_received>\d+|-) "#,
        r#"(?P<bytes_sent>\d+|-) "#,
        r#"(?P<duration>\d+|-) "#,
        r#"(?P<upstream_service_time>\d+|-) "#,
        r#""(?P<x_forwarded_for>[^"]*)" "#,
        r#""(?P<user_agent>[^"]*)" "#,
        r#""(?P<request_id>[^"]*)" "#,
        r#""(?P<authority>[^"]*)" "#,
        r#""(?P<upstream_host>[^"]*)""#,
        r#"(?: (?P<upstream_cluster>\S+) (?P<upstream_local_address>\S+) (?P<downstream_local_address>\S+) (?P<downstream_remote_address>\S+) (?P<requested_server_name>\S+) (?P<route_name>\S+))?"#,
        r#"\s*$"#,
    ))
    .unwrap()
});

/// Parser for proxy access logs.
///
/// Every capture group becomes a string field of the same name, except the
/// start time (parsed into the timestamp field) and the request line (which
/// becomes the message). The level is derived from the response code.
///
/// Not part of the default chain: the grammar is loose enough in places
/// that it is only enabled on request.
pub struct AccessLogParser;

impl LogParser for AccessLogParser {
    fn parse(&self, raw: &[u8], keys: &FieldKeys) -> Result<LogRecord, ParseError> {
        let text = std::str::from_utf8(raw).map_err(|_| ParseError::NonUtf8)?;
        let caps = ACCESS_LOG.captures(text).ok_or(ParseError::NoMatch)?;

        let start_time = &caps[START_TIME];
        let timestamp = NaiveDateTime::parse_from_str(start_time, START_TIME_LAYOUT)
            .map_err(|_| ParseError::UnrecognizedTimestamp(start_time.to_string()))?
            .and_utc()
            .fixed_offset();

        let mut record = LogRecord::new();
        for name in ACCESS_LOG.capture_names().flatten() {
            if name == START_TIME || name == REQUEST {
                continue;
            }
            if let Some(value) = caps.name(name) {
                record.insert(name, value.as_str());
            }
        }

        record.insert(keys.level.as_str(), level_for_status(&caps[RESPONSE_CODE]));
        record.insert(keys.timestamp.as_str(), FieldValue::Time(timestamp));
        record.insert(keys.message.as_str(), &caps[REQUEST]);

        Ok(record)
    }

    fn format(&self) -> LogFormat {
        LogFormat::AccessLog
    }
}

fn level_for_status(code: &str) -> &'static str {
    match code.parse::<u16>() {
        Ok(c) if c >= 500 => "error",
        Ok(c) if c >= 400 => "warn",
        _ => "info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SecondsFormat;

    const ENVOY_LINE: &str = r#"[2016-04-15T20:17:00.310Z] "POST /api/v1/locations HTTP/2" 204 - 154 0 226 100 "10.0.35.28" "nsq2http" "cc21d9b0-cf5c-432b-8c7e-98aeb7988cd2" "locations" "tcp://10.0.2.1:80""#;

    const ISTIO_LINE: &str = r#"[2020-11-25T21:26:18.409Z] "GET /status/418 HTTP/1.1" 418 - 0 135 4 4 "-" "curl/7.73.0-DEV" "84961386-6d84-929d-98bd-c5aee93b5c88" "httpbin:8000" "127.0.0.1:80" inbound|8000|| 127.0.0.1:41854 10.44.1.27:80 10.44.1.23:37652 outbound_.8000_._.httpbin.default.svc.cluster.local default"#;

    fn parse(raw: &str) -> Result<LogRecord, ParseError> {
        AccessLogParser.parse(raw.as_bytes(), &FieldKeys::default())
    }

    #[test]
    fn test_envoy_default_line() {
        let record = parse(ENVOY_LINE).unwrap();

        match record.get("ts") {
            Some(FieldValue::Time(t)) => {
                assert_eq!(t.to_rfc3339_opts(SecondsFormat::Millis, true), "2016-04-15T20:17:00.310Z")
            }
            other => panic!("expected time, got {:?}", other),
        }
        assert_eq!(record.get_str("msg"), Some("POST /api/v1/locations HTTP/2"));
        assert_eq!(record.get_str("response_code"), Some("204"));
        assert_eq!(record.get_str("response_flags"), Some("-"));
        assert_eq!(record.get_str("bytes_received"), Some("154"));
        assert_eq!(record.get_str("bytes_sent"), Some("0"));
        assert_eq!(record.get_str("duration"), Some("226"));
        assert_eq!(record.get_str("upstream_service_time"), Some("100"));
        assert_eq!(record.get_str("x_forwarded_for"), Some("10.0.35.28"));
        assert_eq!(record.get_str("user_agent"), Some("nsq2http"));
        assert_eq!(record.get_str("request_id"), Some("cc21d9b0-cf5c-432b-8c7e-98aeb7988cd2"));
        assert_eq!(record.get_str("authority"), Some("locations"));
        assert_eq!(record.get_str("upstream_host"), Some("tcp://10.0.2.1:80"));
        assert_eq!(record.get_str("level"), Some("info"));

        assert!(!record.contains_key("start_time"));
        assert!(!record.contains_key("request"));
        assert!(!record.contains_key("upstream_cluster"));
    }

    #[test]
    fn test_istio_line_with_peer_addresses() {
        let record = parse(ISTIO_LINE).unwrap();

        assert_eq!(record.get_str("msg"), Some("GET /status/418 HTTP/1.1"));
        assert_eq!(record.get_str("level"), Some("warn"));
        assert_eq!(record.get_str("upstream_cluster"), Some("inbound|8000||"));
        assert_eq!(record.get_str("upstream_local_address"), Some("127.0.0.1:41854"));
        assert_eq!(record.get_str("downstream_local_address"), Some("10.44.1.27:80"));
        assert_eq!(record.get_str("downstream_remote_address"), Some("10.44.1.23:37652"));
        assert_eq!(
            record.get_str("requested_server_name"),
            Some("outbound_.8000_._.httpbin.default.svc.cluster.local")
        );
        assert_eq!(record.get_str("route_name"), Some("default"));
    }

    #[test]
    fn test_level_follows_status() {
        assert_eq!(level_for_status("503"), "error");
        assert_eq!(level_for_status("404"), "warn");
        assert_eq!(level_for_status("302"), "info");
        assert_eq!(level_for_status("-"), "info");
    }

    #[test]
    fn test_access_log_rejects_other_lines() {
        let samples = [
            "",
            "plain text",
            r#"{"msg":"json"}"#,
            "1658394755.540 INFO mylogger file.go:10 request handled",
            r#"127.0.0.1 - frank [10/Oct/2000:13:55:36 -0700] "GET /apache_pb.gif HTTP/1.0" 200 2326"#,
        ];
        for sample in samples {
            assert_eq!(parse(sample).unwrap_err(), ParseError::NoMatch, "sample {sample:?}");
        }
    }

    #[test]
    fn test_access_log_requires_full_match() {
        let truncated = &ENVOY_LINE[..ENVOY_LINE.len() - 1];
        assert_eq!(parse(truncated).unwrap_err(), ParseError::NoMatch);

        let trailing = format!("{ENVOY_LINE} extra");
        assert_eq!(parse(&trailing).unwrap_err(), ParseError::NoMatch);
    }

    #[test]
    fn test_access_log_bad_start_time() {
        let line = ENVOY_LINE.replace("2016-04-15T20:17:00.310Z", "yesterday");
        assert!(matches!(parse(&line), Err(ParseError::UnrecognizedTimestamp(_))));
    }
}
