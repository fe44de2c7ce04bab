//! Tools used for collecting insight into what each stage of the compiler
//! is doing as it runs. Tracing is configured per stage from the command line
//! and selects a range of source lines to report on.
pub mod config;

pub use config::{TracingConfig, Tracing};
