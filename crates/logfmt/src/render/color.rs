use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

use crate::conf::ConfigError;

/// Colour classes. The string forms are the keys of the `colors` config table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorName {
    Normal,
    DateTime,
    LevelDebug,
    LevelInfo,
    LevelWarn,
    LevelError,
    LevelDPanic,
    LevelFatal,
    Message,
    StackTrace,
    Data,
    DataLiteral,
    WorryInfo,
    WorryWarn,
    WorryErr,
    WorryCrit,
    Extracted,
}

impl ColorName {
    pub const ALL: [ColorName; 17] = [
        ColorName::Normal,
        ColorName::DateTime,
        ColorName::LevelDebug,
        ColorName::LevelInfo,
        ColorName::LevelWarn,
        ColorName::LevelError,
        ColorName::LevelDPanic,
        ColorName::LevelFatal,
        ColorName::Message,
        ColorName::StackTrace,
        ColorName::Data,
        ColorName::DataLiteral,
        ColorName::WorryInfo,
        ColorName::WorryWarn,
        ColorName::WorryErr,
        ColorName::WorryCrit,
        ColorName::Extracted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorName::Normal => "normal",
            ColorName::DateTime => "date/time",
            ColorName::LevelDebug => "level-debug",
            ColorName::LevelInfo => "level-info",
            ColorName::LevelWarn => "level-warn",
            ColorName::LevelError => "level-error",
            ColorName::LevelDPanic => "level-dpanic",
            ColorName::LevelFatal => "level-fatal",
            ColorName::Message => "message",
            ColorName::StackTrace => "stacktrace",
            ColorName::Data => "data",
            ColorName::DataLiteral => "data-literal",
            ColorName::WorryInfo => "worry-info",
            ColorName::WorryWarn => "worry-warn",
            ColorName::WorryErr => "worry-err",
            ColorName::WorryCrit => "worry-crit",
            ColorName::Extracted => "extracted",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Colour of a level token. Unknown levels are painted like `info`.
    pub fn for_level(level: &str) -> Self {
        match level.to_lowercase().as_str() {
            "debug" => ColorName::LevelDebug,
            "info" => ColorName::LevelInfo,
            "warn" => ColorName::LevelWarn,
            "error" => ColorName::LevelError,
            "dpanic" => ColorName::LevelDPanic,
            "fatal" => ColorName::LevelFatal,
            _ => ColorName::LevelInfo,
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Fallback when the palette has neither the requested class nor `normal`.
const FALLBACK: Rgb = Rgb(0xdd, 0xdd, 0xdd);

/// Parse a colour value: `#rrggbb`, `rrggbb`, `rgb(r,g,b)` or `r,g,b`.
pub fn parse_color(value: &str) -> Result<Rgb, ConfigError> {
    let invalid = || ConfigError::InvalidColor(value.to_string());
    let text = value.trim();

    let hex = text.strip_prefix('#').unwrap_or(text);
    if hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        return Ok(Rgb(channel(0)?, channel(2)?, channel(4)?));
    }

    let triple = text
        .strip_prefix("rgb(")
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(text);
    let channels: Vec<&str> = triple.split(',').map(str::trim).collect();
    if let [r, g, b] = channels.as_slice() {
        let channel = |c: &str| c.parse::<u8>().map_err(|_| invalid());
        return Ok(Rgb(channel(*r)?, channel(*g)?, channel(*b)?));
    }

    Err(invalid())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: BTreeMap<ColorName, Rgb>,
}

impl Default for Palette {
    fn default() -> Self {
        let colors = [
            (ColorName::Normal, Rgb(0xdd, 0xdd, 0xdd)),
            (ColorName::DateTime, Rgb(0xdd, 0xdd, 0xdd)),
            (ColorName::LevelDebug, Rgb(0x66, 0x66, 0xff)),
            (ColorName::LevelInfo, Rgb(0x14, 0xff, 0xff)),
            (ColorName::LevelWarn, Rgb(0xff, 0xff, 0x00)),
            (ColorName::LevelError, Rgb(0xff, 0xd7, 0x00)),
            (ColorName::LevelDPanic, Rgb(0xff, 0x5f, 0x00)),
            (ColorName::LevelFatal, Rgb(0xff, 0x00, 0x00)),
            (ColorName::Message, Rgb(0xff, 0xff, 0xff)),
            (ColorName::StackTrace, Rgb(0x76, 0x76, 0x76)),
            (ColorName::Data, Rgb(0xaa, 0xaa, 0xaa)),
            (ColorName::DataLiteral, Rgb(0x88, 0x88, 0x99)),
            (ColorName::WorryInfo, Rgb(0x14, 0xff, 0xff)),
            (ColorName::WorryWarn, Rgb(0xff, 0xff, 0x00)),
            (ColorName::WorryErr, Rgb(0xff, 0x00, 0x00)),
            (ColorName::WorryCrit, Rgb(0xff, 0x5f, 0x00)),
            (ColorName::Extracted, Rgb(0xff, 0x99, 0x99)),
        ];
        Self {
            colors: colors.into_iter().collect(),
        }
    }
}

impl Palette {
    pub fn get(&self, name: ColorName) -> Rgb {
        self.colors
            .get(&name)
            .or_else(|| self.colors.get(&ColorName::Normal))
            .copied()
            .unwrap_or(FALLBACK)
    }

    pub fn set(&mut self, name: ColorName, rgb: Rgb) {
        self.colors.insert(name, rgb);
    }

    /// Apply the `colors` config table on top of this palette.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        for (name, value) in overrides {
            let color = ColorName::from_name(name).ok_or_else(|| ConfigError::UnknownColor(name.clone()))?;
            self.set(color, parse_color(value)?);
        }
        Ok(self)
    }

    /// Every colour as `name -> #rrggbb`, the shape of the `colors` table.
    pub fn to_table(&self) -> BTreeMap<String, String> {
        ColorName::ALL
            .into_iter()
            .map(|name| (name.as_str().to_string(), self.get(name).to_hex()))
            .collect()
    }
}

/// `colorize` setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colour when writing to a terminal
    #[default]
    Auto,
    On,
    Off,
}

impl ColorMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "auto" => Some(ColorMode::Auto),
            "on" | "true" | "always" => Some(ColorMode::On),
            "off" | "false" | "never" => Some(ColorMode::Off),
            _ => None,
        }
    }
}

/// Paints text with 24-bit foreground colours, or leaves it alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Colorizer {
    Off,
    On(Palette),
}

impl Colorizer {
    pub fn paint(&self, name: ColorName, text: &str) -> String {
        match self {
            Colorizer::Off => text.to_string(),
            Colorizer::On(palette) => {
                let Rgb(r, g, b) = palette.get(name);
                text.truecolor(r, g, b).to_string()
            }
        }
    }
}
