use crate::results::{FilenameError, ResultFile, KNOWN_FILENAMES};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path, path::PathBuf};
use thiserror::Error;
use tracing::{error, warn};
use url::Url;

/// highest build number that is probed even when it turns out empty
pub const DEFAULT_THRESHOLD: u64 = 8;
/// per request timeout in milliseconds
pub const DEFAULT_TIMEOUT: u64 = 5000;

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("Failed to read config file")]
    Io(#[from] std::io::Error),
    #[error("Config file is invalid")]
    InvalidYaml(#[from] serde_yaml::Error),
    #[error("Result file name is invalid")]
    InvalidFilename(#[from] FilenameError),
    #[error("Source url {0} must be an http or https url")]
    InvalidUrl(String),
    #[error("Thread pool failed to start")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Preflight checks failed")]
    FailedPreflight,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    // where result files are fetched from
    #[serde(default)]
    pub source: SourceConfig,
    // build numbers up to and including this one are probed even if they are empty
    #[serde(default = "default_threshold")]
    pub threshold: u64,
    // size of the fetch pool, one thread per file if unset
    #[serde(default)]
    pub threads: Option<usize>,
    // result files probed in every build, also the order they are reported in
    #[serde(default = "default_files")]
    pub files: Vec<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "lowercase")]
pub enum SourceConfig {
    Http {
        url: Url,
        #[serde(default = "default_timeout")]
        timeout: u64,
    },
    Directory {
        #[serde(default = "default_directory")]
        path: PathBuf,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Directory {
            path: default_directory(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            threshold: DEFAULT_THRESHOLD,
            threads: None,
            files: default_files(),
        }
    }
}

impl DiscoveryConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigErrors> {
        let file = File::open(path)?;

        Ok(serde_yaml::from_reader(file)?)
    }

    pub fn from_yaml(input: &str) -> Result<Self, ConfigErrors> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// parse the configured file names in their configured order
    pub fn result_files(&self) -> Result<Vec<ResultFile>, ConfigErrors> {
        self.files
            .iter()
            .map(|name| ResultFile::parse(name).map_err(ConfigErrors::from))
            .collect()
    }

    /// Validate the config, reporting every problem instead of stopping at the first one.
    /// Returns true if an error was found.
    pub fn preflight_checks(&mut self) -> bool {
        let mut contains_error = false;

        if self.files.is_empty() {
            error!("No result files were defined, there is nothing to probe for");
            contains_error = true;
        }

        let duplicates = self.files.iter().duplicates().cloned().collect_vec();
        if !duplicates.is_empty() {
            warn!(
                "files contains duplicates ({}), only the first occurrence is probed",
                duplicates.join(", ")
            );
            self.files = self.files.iter().unique().cloned().collect();
        }

        for name in self.files.iter() {
            if let Err(e) = ResultFile::parse(name) {
                error!("files: {e}");
                contains_error = true;
            }
        }

        if self.threads == Some(0) {
            error!("threads cannot be 0, leave it unset to let the pool pick a size");
            contains_error = true;
        }

        match &self.source {
            SourceConfig::Http { url, timeout } => {
                if !matches!(url.scheme(), "http" | "https") {
                    error!("source.http.url ({url}) must use http or https");
                    contains_error = true;
                }

                if *timeout == 0 {
                    error!("source.http.timeout cannot be 0, every request would time out");
                    contains_error = true;
                }
            }
            SourceConfig::Directory { path } => {
                if !path.is_dir() {
                    warn!(
                        "source.directory.path ({}) is not a directory, no results will be found",
                        path.to_string_lossy()
                    );
                }
            }
        }

        contains_error
    }
}

fn default_threshold() -> u64 {
    DEFAULT_THRESHOLD
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

fn default_directory() -> PathBuf {
    PathBuf::from("output")
}

fn default_files() -> Vec<String> {
    KNOWN_FILENAMES.iter().map(|name| name.to_string()).collect()
}
