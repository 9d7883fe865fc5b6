//! Conf module: configuration model, file search and help text.

pub mod error;
pub mod help;
pub mod load;
pub mod model;

pub use error::ConfigError;
pub use load::{CONFIG_FILE_ENV, CONFIG_FILE_NAME};
pub use model::Config;
