// Module layout for logfmt: a line-oriented log reformatter.

// Core: line parsing and worry-word highlighting
pub mod parser;
pub mod highlight;

// Glue around the core
pub mod render;
pub mod conf;
pub mod runtime;
