//! Boot: logging init, config resolution and the top-level run.

use std::io::{self, ErrorKind};

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::conf::help::CONFIG_HELP;
use crate::conf::Config;

use super::cli::Cli;
use super::run::{open_input, open_output, use_colors, Pipeline};

/// Filter directives for diagnostics, e.g. `LOGFMT_LOG=logfmt=trace`.
pub const LOG_ENV: &str = "LOGFMT_LOG";

/// Initialise the tracing / logging subsystem.
///
/// Diagnostics go to stderr so they never interleave with formatted output.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| "logfmt=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Resolve the configuration from file, environment and flags.
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let (mut config, source) = Config::load().context("Failed to load configuration")?;
    match source {
        Some(path) => info!(path = %path.display(), "configuration loaded"),
        None => debug!("using built-in configuration"),
    }

    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run one invocation: answer `--config-help` / `--init-config`, or format
/// the input until it ends.
pub fn run(cli: Cli) -> Result<()> {
    if cli.config_help {
        print!("{CONFIG_HELP}");
        return Ok(());
    }

    if let Some(target) = &cli.init_config {
        let path = match target {
            Some(path) => path.clone(),
            None => Config::default_path()?,
        };
        Config::write_default(&path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    let colors = use_colors(config.colorize, config.writes_to_stdout());
    debug!(
        colors,
        access_logs = config.experimental_access_logs,
        strip_ansi = config.strip_ansi,
        "starting"
    );

    let pipeline = Pipeline::from_config(&config, colors)?;
    let input = open_input(cli.input.as_deref())?;
    let output = open_output(&config)?;

    match pipeline.run(input, output) {
        Ok(stats) => {
            debug!(
                lines = stats.lines,
                json = stats.json,
                access_log = stats.access_log,
                console = stats.console,
                unparseable = stats.unparseable,
                parse_rate = stats.parse_rate(),
                "input finished"
            );
            Ok(())
        }
        // The reader went away (`logfmt app.log | head`); nothing left to do.
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e).context("Failed to process input"),
    }
}
