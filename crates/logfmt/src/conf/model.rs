//! Model: Config and the views the pipeline builds from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::highlight::WorryLexicon;
use crate::parser::FieldKeys;
use crate::render::{ColorMode, MessageTemplate, Palette, RenderOptions};

use super::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output path, `-` for standard output
    pub output_file: String,
    pub append_to_file: bool,
    pub colorize: ColorMode,
    pub highlight_worry_words: bool,
    pub experimental_access_logs: bool,
    /// Remove ANSI escapes from input before parsing
    pub strip_ansi: bool,
    pub show_null: bool,
    pub timestamp_field: String,
    pub message_field: String,
    pub level_field: String,
    pub caller_field: String,
    /// `{{field}}` template for the message column; empty prints the message field
    pub message_format: String,
    pub trim_fields: Vec<String>,
    pub extract_fields: Vec<String>,
    /// Colour name to colour value, applied over the default palette
    pub colors: BTreeMap<String, String>,
    /// Severity name to words; replaces the built-in worry words when set
    pub worries: BTreeMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            output_file: "-".to_string(),
            append_to_file: false,
            colorize: ColorMode::Auto,
            highlight_worry_words: render.highlight_worry_words,
            experimental_access_logs: false,
            strip_ansi: true,
            show_null: render.show_null,
            timestamp_field: render.keys.timestamp,
            message_field: render.keys.message,
            level_field: render.keys.level,
            caller_field: render.keys.caller,
            message_format: String::new(),
            trim_fields: render.trim_fields,
            extract_fields: render.extract_fields,
            colors: BTreeMap::new(),
            worries: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Defaults with the palette and worry words spelled out, for `--init-config`.
    pub fn expanded_defaults() -> Self {
        Self {
            colors: Palette::default().to_table(),
            worries: WorryLexicon::default().by_severity(),
            ..Self::default()
        }
    }

    pub fn writes_to_stdout(&self) -> bool {
        self.output_file.is_empty() || self.output_file == "-"
    }

    pub fn field_keys(&self) -> FieldKeys {
        FieldKeys {
            timestamp: self.timestamp_field.clone(),
            message: self.message_field.clone(),
            level: self.level_field.clone(),
            caller: self.caller_field.clone(),
        }
    }

    pub fn render_options(&self) -> Result<RenderOptions, ConfigError> {
        let message_format = match self.message_format.as_str() {
            "" => None,
            source => Some(MessageTemplate::parse(source)?),
        };

        Ok(RenderOptions {
            keys: self.field_keys(),
            trim_fields: self.trim_fields.clone(),
            extract_fields: self.extract_fields.clone(),
            show_null: self.show_null,
            highlight_worry_words: self.highlight_worry_words,
            message_format,
        })
    }

    pub fn palette(&self) -> Result<Palette, ConfigError> {
        Palette::default().with_overrides(&self.colors)
    }

    pub fn lexicon(&self) -> Result<WorryLexicon, ConfigError> {
        WorryLexicon::from_config(&self.worries)
    }

    /// Check field names, the message format, colours and worry severities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("timestamp_field", &self.timestamp_field),
            ("message_field", &self.message_field),
            ("level_field", &self.level_field),
            ("caller_field", &self.caller_field),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(name));
            }
        }

        self.render_options()?;
        self.palette()?;
        self.lexicon()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::WorrySeverity;
    use crate::render::{ColorName, Rgb};

    // ── Defaults ─────────────────────────────────────────────────

    #[test]
    fn test_config_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.output_file, "-");
        assert!(cfg.writes_to_stdout());
        assert!(!cfg.append_to_file);
        assert_eq!(cfg.colorize, ColorMode::Auto);
        assert!(cfg.highlight_worry_words);
        assert!(!cfg.experimental_access_logs);
        assert!(cfg.strip_ansi);
        assert!(!cfg.show_null);
        assert_eq!(cfg.field_keys(), FieldKeys::default());
        assert_eq!(cfg.trim_fields, vec!["level", "msg", "stacktrace", "error"]);
        assert_eq!(cfg.extract_fields, vec!["error", "stacktrace"]);
        assert_eq!(cfg.message_format, "");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_render_options_follow_config() {
        let cfg = Config {
            message_field: "message".to_string(),
            show_null: true,
            highlight_worry_words: false,
            trim_fields: vec!["host".to_string()],
            ..Config::default()
        };
        let options = cfg.render_options().unwrap();
        assert_eq!(options.keys.message, "message");
        assert!(options.show_null);
        assert!(!options.highlight_worry_words);
        assert_eq!(options.trim_fields, vec!["host"]);
        assert_eq!(options.message_format, None);

        let cfg = Config {
            message_format: "{{logger}}: {{msg}}".to_string(),
            ..Config::default()
        };
        assert_eq!(
            cfg.render_options().unwrap().message_format,
            Some(MessageTemplate::parse("{{logger}}: {{msg}}").unwrap())
        );
    }

    // ── Serde ────────────────────────────────────────────────────

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r##"
            colorize = "off"
            timestamp_field = "time"

            [colors]
            "date/time" = "#010203"

            [worries]
            crit = ["panic"]
            "##,
        )
        .unwrap();

        assert_eq!(cfg.colorize, ColorMode::Off);
        assert_eq!(cfg.timestamp_field, "time");
        assert_eq!(cfg.message_field, "msg");
        assert!(cfg.strip_ansi);
        assert_eq!(cfg.palette().unwrap().get(ColorName::DateTime), Rgb(1, 2, 3));
        assert_eq!(cfg.lexicon().unwrap().severity("PANIC"), Some(WorrySeverity::Crit));
        assert_eq!(cfg.lexicon().unwrap().severity("failed"), None);
    }

    #[test]
    fn test_expanded_defaults_round_trip_through_toml() {
        let cfg = Config::expanded_defaults();
        let text = toml::to_string(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
        assert_eq!(back.palette().unwrap(), Palette::default());
        assert_eq!(back.lexicon().unwrap(), WorryLexicon::default());
    }

    #[test]
    fn test_bad_colorize_value_rejected() {
        assert!(toml::from_str::<Config>(r#"colorize = "sometimes""#).is_err());
    }

    // ── Validation ───────────────────────────────────────────────

    #[test]
    fn test_validate_rejects_empty_field_name() {
        let cfg = Config {
            level_field: " ".to_string(),
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyField("level_field"))));
    }

    #[test]
    fn test_validate_rejects_bad_color() {
        let mut cfg = Config::default();
        cfg.colors.insert("level-info".to_string(), "blue".to_string());
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidColor(_))));

        let mut cfg = Config::default();
        cfg.colors.insert("level-blue".to_string(), "#0000ff".to_string());
        assert!(matches!(cfg.validate(), Err(ConfigError::UnknownColor(_))));
    }

    #[test]
    fn test_validate_rejects_bad_message_format() {
        let cfg = Config {
            message_format: "{{if .msg}}x{{end}}".to_string(),
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidTemplate(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_severity() {
        let mut cfg = Config::default();
        cfg.worries.insert("severe".to_string(), vec!["x".to_string()]);
        assert!(matches!(cfg.validate(), Err(ConfigError::UnknownSeverity(_))));
    }
}
