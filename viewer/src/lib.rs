//! Presentation of discovered load test results: labels, per second rates and charts.

pub mod cli;
pub mod format;
pub mod rates;
pub mod render;

#[cfg(test)]
mod cli_test;

pub use cli::{run, Args, ViewerError};
pub use format::{format_filename, format_test_type};
pub use rates::Rates;
pub use render::{OutputFormat, Report};
