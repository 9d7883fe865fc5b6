use chrono::SecondsFormat;

use crate::highlight::{WorryHighlighter, WorryLexicon};
use crate::parser::{normalize, FieldKeys, FieldValue, LogRecord, ZERO_TIMESTAMP};

use super::color::{ColorName, Colorizer};
use super::template::MessageTemplate;

const LEVEL_WIDTH: usize = 6;
const EXTRACT_INDENT: &str = "    ";
const STACKTRACE_FIELD: &str = "stacktrace";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub keys: FieldKeys,
    /// Dropped from the trailing JSON. The timestamp, level and message keys
    /// are always dropped since they are printed up front.
    pub trim_fields: Vec<String>,
    /// Moved out of the record and printed below the line.
    pub extract_fields: Vec<String>,
    pub show_null: bool,
    pub highlight_worry_words: bool,
    /// Builds the message from the record; `None` prints the message key.
    pub message_format: Option<MessageTemplate>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            keys: FieldKeys::default(),
            trim_fields: ["level", "msg", "stacktrace", "error"].map(String::from).to_vec(),
            extract_fields: ["error", "stacktrace"].map(String::from).to_vec(),
            show_null: false,
            highlight_worry_words: true,
            message_format: None,
        }
    }
}

/// Formats one record as `TS LEVEL MSG {EXTRA}`, followed by any extracted
/// fields indented on their own lines. The output has no trailing newline.
pub struct LineRenderer {
    options: RenderOptions,
    colorizer: Colorizer,
    lexicon: WorryLexicon,
}

impl LineRenderer {
    pub fn new(options: RenderOptions, colorizer: Colorizer, lexicon: WorryLexicon) -> Self {
        Self {
            options,
            colorizer,
            lexicon,
        }
    }

    pub fn render(&self, mut record: LogRecord) -> String {
        let keys = &self.options.keys;

        let timestamp = self.take_timestamp(&mut record);
        let level = record.level(keys).to_uppercase();
        let message = match &self.options.message_format {
            Some(template) => template.render(&record),
            None => record.message(keys),
        };

        let extracted: Vec<(String, String)> = self
            .options
            .extract_fields
            .iter()
            .filter_map(|name| {
                let value = record.remove(name)?;
                let text = value.to_display_string();
                (!value.is_null() && !text.is_empty()).then(|| (name.clone(), text))
            })
            .collect();

        record.remove(&keys.level);
        record.remove(&keys.message);
        for name in &self.options.trim_fields {
            record.remove(name);
        }
        if !self.options.show_null {
            record.retain(|_, value| !value.is_null());
        }

        let mut out = String::new();
        out.push_str(&self.colorizer.paint(ColorName::DateTime, &timestamp));
        out.push(' ');
        out.push_str(&self.colorizer.paint(ColorName::for_level(&level), &level));
        let padding = LEVEL_WIDTH.saturating_sub(level.chars().count());
        out.extend(std::iter::repeat(' ').take(padding));
        out.push(' ');
        out.push_str(&self.render_message(&message));

        if !record.is_empty() {
            out.push(' ');
            self.write_fields(record.iter(), &mut out);
        }

        for (name, text) in extracted {
            let color = if name == STACKTRACE_FIELD {
                ColorName::StackTrace
            } else {
                ColorName::Extracted
            };
            out.push('\n');
            out.push_str(&self.colorizer.paint(color, &indent(&text)));
        }

        out
    }

    /// Remove the timestamp field and return its printable form.
    fn take_timestamp(&self, record: &mut LogRecord) -> String {
        let key = self.options.keys.timestamp.as_str();
        let printed = match record.get(key) {
            Some(FieldValue::String(s)) => s.clone(),
            Some(value @ (FieldValue::Time(_) | FieldValue::Number(_))) => format_timestamp(value),
            _ => return ZERO_TIMESTAMP.to_string(),
        };
        record.remove(key);
        printed
    }

    fn render_message(&self, message: &str) -> String {
        if self.options.highlight_worry_words {
            WorryHighlighter::new(&self.lexicon, &self.colorizer).highlight(message)
        } else {
            self.colorizer.paint(ColorName::Message, message)
        }
    }

    /// Compact JSON with keys and literal values painted separately.
    fn write_fields<'r>(&self, fields: impl Iterator<Item = (&'r str, &'r FieldValue)>, out: &mut String) {
        out.push('{');
        for (i, (key, value)) in fields.enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&self.colorizer.paint(ColorName::Data, &quote(key)));
            out.push(':');
            self.write_value(value, out);
        }
        out.push('}');
    }

    fn write_value(&self, value: &FieldValue, out: &mut String) {
        match value {
            FieldValue::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_value(item, out);
                }
                out.push(']');
            }
            FieldValue::Map(fields) => {
                self.write_fields(fields.iter().map(|(k, v)| (k.as_str(), v)), out);
            }
            literal => {
                let json = literal.to_json_value().to_string();
                out.push_str(&self.colorizer.paint(ColorName::DataLiteral, &json));
            }
        }
    }
}

fn format_timestamp(value: &FieldValue) -> String {
    match normalize(value) {
        Ok(t) if t.timestamp_micros() > 0 => t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        _ => ZERO_TIMESTAMP.to_string(),
    }
}

fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("{EXTRACT_INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
