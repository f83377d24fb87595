//! Discovery of load test results.
//!
//! The load tester stores one JSON document per configuration under `results/<build>/`.
//! There is no index of builds, so [`discover_results`] probes build numbers in ascending
//! order and stops at the first empty build past a threshold.

pub mod config;
pub mod discovery;
pub mod fetch;
pub mod results;

#[cfg(test)]
mod results_test;

pub use config::{ConfigErrors, DiscoveryConfig, SourceConfig};
pub use discovery::{discover_results, fetch_payload, probe_build, Discovery};
pub use fetch::{DirectoryFetcher, FetchError, Fetcher, Fetchers, HttpFetcher, MemoryFetcher};
pub use results::{
    BuildResult, FilenameError, PayloadError, ResultFile, ResultPayload, ResultSet,
    TestTypeMetrics, KNOWN_FILENAMES,
};
pub use url::Url;
