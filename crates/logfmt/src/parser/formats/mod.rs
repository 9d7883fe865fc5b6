pub mod json;
pub mod console;
pub mod access_log;

pub use json::JsonParser;
pub use console::ConsoleParser;
pub use access_log::AccessLogParser;
