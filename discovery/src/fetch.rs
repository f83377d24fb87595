pub mod directory;
pub mod http;
pub mod memory;

use crate::{
    config::{ConfigErrors, SourceConfig},
    results::PayloadError,
};
use thiserror::Error;

pub use directory::DirectoryFetcher;
pub use http::HttpFetcher;
pub use memory::MemoryFetcher;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{path} was not found")]
    NotFound { path: String },
    #[error("Request for {path} timed out")]
    Timeout { path: String },
    #[error("Request for {path} returned status {status}")]
    Status { path: String, status: u16 },
    #[error("Request for {path} failed")]
    Transport {
        path: String,
        #[source]
        source: ureq::Error,
    },
    #[error("Unable to build a request url for {path}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}")]
    Parse {
        path: String,
        #[source]
        source: PayloadError,
    },
}

impl FetchError {
    /// absence is the expected outcome for most probes
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Capability to retrieve a result document by its relative path, e.g. `results/3/x.json`
pub trait Fetcher: Send + Sync {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError>;
}

/// All fetcher variants that can be selected through the configuration
#[derive(Debug, Clone)]
pub enum Fetchers {
    Http(HttpFetcher),
    Directory(DirectoryFetcher),
}

impl Fetchers {
    pub fn load(config: &SourceConfig) -> Result<Self, ConfigErrors> {
        match config {
            SourceConfig::Http { url, timeout } => {
                HttpFetcher::load(url, *timeout).map(Self::Http)
            }
            SourceConfig::Directory { path } => Ok(Self::Directory(DirectoryFetcher::new(path))),
        }
    }
}

impl Fetcher for Fetchers {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        match self {
            Self::Http(fetcher) => fetcher.fetch(path),
            Self::Directory(fetcher) => fetcher.fetch(path),
        }
    }
}
