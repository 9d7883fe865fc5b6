use std::collections::{BTreeMap, HashMap};

use crate::conf::ConfigError;
use crate::render::color::ColorName;

/// How alarming a worry word is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorrySeverity {
    None,
    Info,
    Warn,
    Err,
    Crit,
}

impl WorrySeverity {
    pub const ALL: [WorrySeverity; 5] = [
        WorrySeverity::None,
        WorrySeverity::Info,
        WorrySeverity::Warn,
        WorrySeverity::Err,
        WorrySeverity::Crit,
    ];

    /// Name used for this severity in the `worries` config table.
    pub fn config_key(self) -> &'static str {
        match self {
            WorrySeverity::None => "none",
            WorrySeverity::Info => "info",
            WorrySeverity::Warn => "warn",
            WorrySeverity::Err => "err",
            WorrySeverity::Crit => "crit",
        }
    }

    pub fn from_config_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.config_key() == key)
    }

    pub fn color(self) -> ColorName {
        match self {
            WorrySeverity::None => ColorName::Normal,
            WorrySeverity::Info => ColorName::WorryInfo,
            WorrySeverity::Warn => ColorName::WorryWarn,
            WorrySeverity::Err => ColorName::WorryErr,
            WorrySeverity::Crit => ColorName::WorryCrit,
        }
    }
}

const DEFAULT_WORRY_WORDS: &[(&str, WorrySeverity)] = &[
    ("500", WorrySeverity::Info),
    ("503", WorrySeverity::Info),
    ("404", WorrySeverity::Info),
    ("400", WorrySeverity::Info),
    ("401", WorrySeverity::Info),
    ("warning", WorrySeverity::Warn),
    ("warn", WorrySeverity::Warn),
    ("error", WorrySeverity::Err),
    ("failure", WorrySeverity::Err),
    ("failed", WorrySeverity::Err),
    ("fail", WorrySeverity::Err),
    ("incorrect", WorrySeverity::Info),
    ("invalid", WorrySeverity::Info),
    ("certificate_verify_failed", WorrySeverity::Err),
];

/// Lowercase word to severity. Built once at startup and only read after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorryLexicon {
    words: HashMap<String, WorrySeverity>,
}

impl Default for WorryLexicon {
    fn default() -> Self {
        Self::from_words(DEFAULT_WORRY_WORDS.iter().copied())
    }
}

impl WorryLexicon {
    pub fn from_words<'w>(words: impl IntoIterator<Item = (&'w str, WorrySeverity)>) -> Self {
        Self {
            words: words
                .into_iter()
                .map(|(word, severity)| (word.to_lowercase(), severity))
                .collect(),
        }
    }

    /// Build from the `worries` config table (severity name to words).
    ///
    /// The table replaces the built-in list wholesale. A table with no words
    /// at all keeps the built-in list.
    pub fn from_config(table: &BTreeMap<String, Vec<String>>) -> Result<Self, ConfigError> {
        let mut words = Vec::new();
        for (key, list) in table {
            let severity = WorrySeverity::from_config_key(key)
                .ok_or_else(|| ConfigError::UnknownSeverity(key.clone()))?;
            words.extend(list.iter().map(|w| (w.as_str(), severity)));
        }

        if words.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self::from_words(words))
    }

    /// Severity of `word`, compared case-insensitively.
    pub fn severity(&self, word: &str) -> Option<WorrySeverity> {
        self.words.get(&word.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Inverse view in the shape of the `worries` config table, words sorted.
    pub fn by_severity(&self) -> BTreeMap<String, Vec<String>> {
        let mut table: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (word, severity) in &self.words {
            table
                .entry(severity.config_key().to_string())
                .or_default()
                .push(word.clone());
        }
        for list in table.values_mut() {
            list.sort();
        }
        table
    }
}
