//! Load: config file search, TOML loading and the `LOGFMT_*` overlay.

use std::fs;
use std::path::{Path, PathBuf};

use crate::render::ColorMode;

use super::error::ConfigError;
use super::help::INIT_HEADER;
use super::model::Config;

pub const CONFIG_FILE_NAME: &str = ".logfmt.toml";

/// Explicit config path; skips the directory search.
pub const CONFIG_FILE_ENV: &str = "LOGFMT_CONFIG_FILE";

const ENV_PREFIX: &str = "LOGFMT_";

impl Config {
    /// Load configuration from the process environment.
    /// Priority: Environment Variables > Config File > Defaults
    ///
    /// Returns the config and the file it was read from, if any.
    pub fn load() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let home = dirs::home_dir();
        Self::load_from(&cwd, home.as_deref(), |key| std::env::var(key).ok())
    }

    /// [`Config::load`] with the search start, home directory and
    /// environment supplied by the caller.
    pub fn load_from(
        start: &Path,
        home: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = Self::locate(start, home, &lookup);

        let mut config = match &path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                Self::from_file(path)?
            }
            None => {
                tracing::debug!("no configuration file found, using defaults");
                Self::default()
            }
        };

        config.apply_env(&lookup)?;
        Ok((config, path))
    }

    /// `$LOGFMT_CONFIG_FILE` when set, otherwise the first existing file on
    /// the search path.
    pub fn locate(
        start: &Path,
        home: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<PathBuf> {
        if let Some(explicit) = lookup(CONFIG_FILE_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(explicit));
        }
        Self::search_paths(start, home).into_iter().find(|p| p.is_file())
    }

    /// Candidate files, nearest first: `start` and each of its ancestors,
    /// then the home directory.
    pub fn search_paths(start: &Path, home: Option<&Path>) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = start.ancestors().map(|dir| dir.join(CONFIG_FILE_NAME)).collect();
        if let Some(home) = home {
            let in_home = home.join(CONFIG_FILE_NAME);
            if !paths.contains(&in_home) {
                paths.push(in_home);
            }
        }
        paths
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override settings from `LOGFMT_*` variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let invalid = |name: &str, value: &str| ConfigError::InvalidEnv {
            key: format!("{ENV_PREFIX}{name}"),
            value: value.to_string(),
        };
        let flag = |name: &str| -> Result<Option<bool>, ConfigError> {
            var(name)
                .map(|value| parse_bool(&value).ok_or_else(|| invalid(name, &value)))
                .transpose()
        };

        if let Some(output) = var("OUTPUT_FILE") {
            self.output_file = output;
        }
        if let Some(append) = flag("APPEND_TO_FILE")? {
            self.append_to_file = append;
        }
        if let Some(value) = var("COLORIZE") {
            self.colorize = ColorMode::from_name(&value).ok_or_else(|| invalid("COLORIZE", &value))?;
        }
        if let Some(highlight) = flag("HIGHLIGHT_WORRY_WORDS")? {
            self.highlight_worry_words = highlight;
        }
        if let Some(access_logs) = flag("EXPERIMENTAL_ACCESS_LOGS")? {
            self.experimental_access_logs = access_logs;
        }
        if let Some(show_null) = flag("SHOW_NULL")? {
            self.show_null = show_null;
        }
        if let Some(strip) = flag("STRIP_ANSI")? {
            self.strip_ansi = strip;
        }

        let fields = [
            ("TIMESTAMP_FIELD", &mut self.timestamp_field),
            ("MESSAGE_FIELD", &mut self.message_field),
            ("LEVEL_FIELD", &mut self.level_field),
            ("CALLER_FIELD", &mut self.caller_field),
            ("MESSAGE_FORMAT", &mut self.message_format),
        ];
        for (name, field) in fields {
            if let Some(value) = var(name) {
                *field = value;
            }
        }

        let lists = [
            ("TRIM_FIELDS", &mut self.trim_fields),
            ("EXTRACT_FIELDS", &mut self.extract_fields),
        ];
        for (name, list) in lists {
            if let Some(value) = var(name) {
                *list = parse_list(&value);
            }
        }

        Ok(())
    }

    /// `~/.logfmt.toml`, where `--init-config` writes by default.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoHomeDir)
    }

    /// Write a commented config file holding every default. Never
    /// overwrites an existing file.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        let body = toml::to_string(&Self::expanded_defaults())?;
        fs::write(path, format!("{INIT_HEADER}\n{body}")).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Comma separated names. An empty value gives an empty list.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
