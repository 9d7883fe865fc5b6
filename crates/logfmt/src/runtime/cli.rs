//! Cli: command line flags and how they override the loaded config.

use std::path::PathBuf;

use clap::Parser;

use crate::conf::Config;
use crate::render::ColorMode;

#[derive(Debug, Default, Parser)]
#[command(
    name = "logfmt",
    version,
    about = "Reformat mixed JSON, console and access-log lines for humans"
)]
pub struct Cli {
    /// Input file; standard input when omitted or `-`
    pub input: Option<PathBuf>,

    /// Output file, `-` for standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Append to the output file instead of truncating it
    #[arg(short, long)]
    pub append: bool,

    #[arg(short = 'c', long = "color", value_enum, value_name = "WHEN")]
    pub color: Option<ColorMode>,

    /// Highlight worry words in messages (bare flag means true)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub highlight_worry_words: Option<bool>,

    /// Try the Envoy/Istio access log grammar before the console grammar
    #[arg(long)]
    pub experimental_access_logs: bool,

    #[arg(short = 't', long, value_name = "FIELD")]
    pub timestamp_field: Option<String>,

    #[arg(long, value_name = "FIELD")]
    pub message_field: Option<String>,

    #[arg(long, value_name = "FIELD")]
    pub level_field: Option<String>,

    #[arg(long, value_name = "FIELD")]
    pub caller_field: Option<String>,

    /// Message template, e.g. "{{logger}}: {{msg}}"
    #[arg(short = 'm', long, value_name = "TEMPLATE")]
    pub message_format: Option<String>,

    /// Drop a field from the trailing JSON (repeatable, replaces the configured list)
    #[arg(short = 'T', long = "trim-field", value_name = "FIELD")]
    pub trim_fields: Vec<String>,

    /// Print a field on its own lines below the entry (repeatable, replaces the configured list)
    #[arg(long = "extract-field", value_name = "FIELD")]
    pub extract_fields: Vec<String>,

    /// Keep fields whose value is null
    #[arg(long)]
    pub show_null: bool,

    /// Parse input lines with their ANSI escapes left in place
    #[arg(long)]
    pub keep_ansi: bool,

    /// Write a default config file (to ~/.logfmt.toml without FILE) and exit
    #[arg(long, value_name = "FILE")]
    pub init_config: Option<Option<PathBuf>>,

    /// Describe every configuration option and exit
    #[arg(long)]
    pub config_help: bool,
}

impl Cli {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.output_file = output.clone();
        }
        if self.append {
            config.append_to_file = true;
        }
        if let Some(color) = self.color {
            config.colorize = color;
        }
        if let Some(highlight) = self.highlight_worry_words {
            config.highlight_worry_words = highlight;
        }
        if self.experimental_access_logs {
            config.experimental_access_logs = true;
        }
        if self.show_null {
            config.show_null = true;
        }
        if self.keep_ansi {
            config.strip_ansi = false;
        }

        let fields = [
            (&self.timestamp_field, &mut config.timestamp_field),
            (&self.message_field, &mut config.message_field),
            (&self.level_field, &mut config.level_field),
            (&self.caller_field, &mut config.caller_field),
            (&self.message_format, &mut config.message_format),
        ];
        for (flag, field) in fields {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }

        if !self.trim_fields.is_empty() {
            config.trim_fields = self.trim_fields.clone();
        }
        if !self.extract_fields.is_empty() {
            config.extract_fields = self.extract_fields.clone();
        }
    }
}
