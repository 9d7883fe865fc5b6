use std::process::ExitCode;

use clap::Parser;
use logfmt::runtime::{boot, Cli};

fn main() -> ExitCode {
    boot::init_logging();

    match boot::run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("logfmt: {e:#}");
            ExitCode::FAILURE
        }
    }
}
