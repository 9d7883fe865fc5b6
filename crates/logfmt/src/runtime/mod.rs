//! Runtime module: flags, logging init and the line loop.

pub mod boot;
pub mod cli;
pub mod run;

pub use cli::Cli;
pub use run::Pipeline;
