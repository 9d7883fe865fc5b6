//! Run: the line loop and its input/output plumbing.

use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::conf::{Config, ConfigError};
use crate::parser::ansi::strip_ansi_codes;
use crate::parser::{FieldKeys, LineParser, LogFormat, ParseStats};
use crate::render::{ColorMode, Colorizer, LineRenderer};

/// Everything needed to turn one input line into one output entry. Built
/// once from the final config; read-only while lines flow through.
pub struct Pipeline {
    parser: LineParser,
    keys: FieldKeys,
    renderer: LineRenderer,
    strip_ansi: bool,
}

impl Pipeline {
    pub fn from_config(config: &Config, colors: bool) -> Result<Self, ConfigError> {
        let colorizer = if colors {
            Colorizer::On(config.palette()?)
        } else {
            Colorizer::Off
        };

        Ok(Self {
            parser: LineParser::new(config.experimental_access_logs),
            keys: config.field_keys(),
            renderer: LineRenderer::new(config.render_options()?, colorizer, config.lexicon()?),
            strip_ansi: config.strip_ansi,
        })
    }

    /// Parse and render one line (without its line ending). `None` means no
    /// parser accepted it and the caller should print it as is.
    pub fn format_line(&self, line: &[u8]) -> Option<(LogFormat, String)> {
        let cleaned = if self.strip_ansi {
            strip_ansi_codes(line)
        } else {
            Cow::Borrowed(line)
        };

        let (format, record) = self.parser.parse_with_format(&cleaned, &self.keys).ok()?;
        Some((format, self.renderer.render(record)))
    }

    /// Process `input` until EOF. Unparseable lines are copied byte for byte.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> io::Result<ParseStats> {
        let mut stats = ParseStats::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = trim_line_ending(&buf);

            match self.format_line(line) {
                Some((format, text)) => {
                    stats.record_parsed(format);
                    output.write_all(text.as_bytes())?;
                }
                None => {
                    stats.record_unparseable();
                    output.write_all(line)?;
                }
            }
            output.write_all(b"\n")?;
        }

        output.flush()?;
        Ok(stats)
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Whether output should be coloured for this mode and destination.
pub fn use_colors(mode: ColorMode, to_stdout: bool) -> bool {
    match mode {
        ColorMode::On => true,
        ColorMode::Off => false,
        ColorMode::Auto => {
            to_stdout && io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
    }
}

/// Standard input for `None` or `-`, otherwise the named file.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

pub fn open_output(config: &Config) -> Result<Box<dyn Write>> {
    if config.writes_to_stdout() {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }

    let path = Path::new(&config.output_file);
    let mut options = OpenOptions::new();
    options.create(true);
    if config.append_to_file {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    let mode = if config.append_to_file { "append to" } else { "create" };
    let file = options
        .open(path)
        .with_context(|| format!("Failed to {mode} {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}
