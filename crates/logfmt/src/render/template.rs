//! Message templates: text with `{{field}}` placeholders filled in from a
//! record. `{{.field}}` and `{{index . "field"}}` are accepted as well, the
//! latter for keys holding spaces or dots.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::conf::ConfigError;
use crate::parser::LogRecord;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{\{\s*(?:index\s+\.\s+"(?P<quoted>[^"]*)"|\.?(?P<bare>[^\s{}".][^\s{}"]*))\s*\}\}"#).unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    parts: Vec<Part>,
}

impl MessageTemplate {
    /// Compile `source`. Any `{{` left over that is not a placeholder is
    /// rejected rather than printed.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let mut parts = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.name("quoted").or_else(|| caps.name("bare")))
            else {
                continue;
            };
            push_text(&mut parts, &source[last..whole.start()], source)?;
            parts.push(Part::Field(name.as_str().to_string()));
            last = whole.end();
        }
        push_text(&mut parts, &source[last..], source)?;

        Ok(Self { parts })
    }

    /// Missing fields render as the empty string.
    pub fn render(&self, record: &LogRecord) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Field(name) => {
                    if let Some(value) = record.get(name) {
                        out.push_str(&value.to_display_string());
                    }
                }
            }
        }
        out
    }
}

fn push_text(parts: &mut Vec<Part>, text: &str, source: &str) -> Result<(), ConfigError> {
    if text.contains("{{") {
        return Err(ConfigError::InvalidTemplate(source.to_string()));
    }
    if !text.is_empty() {
        parts.push(Part::Text(text.to_string()));
    }
    Ok(())
}
