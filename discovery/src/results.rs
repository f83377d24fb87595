use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{fmt, slice, str::FromStr};
use thiserror::Error;

/// File names written by the load tester, one per (database, strategy, cache) run
pub const KNOWN_FILENAMES: [&str; 9] = [
    "unknown-unknown-unknown.json",
    "cockroach-lock-cache.json",
    "cockroach-lock-nocache.json",
    "cockroach-none-cache.json",
    "cockroach-none-nocache.json",
    "postgresql-lock-cache.json",
    "postgresql-lock-nocache.json",
    "postgresql-resolve-cache.json",
    "postgresql-resolve-nocache.json",
];

const EXTENSION: &str = ".json";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    #[error("Result file {0} does not end in .json")]
    MissingExtension(String),
    #[error("Result file {0} is not of the form <database>-<strategy>-<cache>.json")]
    MalformedDimensions(String),
}

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Payload is not a valid result document")]
    Decode(#[from] serde_json::Error),
    #[error("Test type {test_type} has an invalid {field}: {value}")]
    InvalidMetric {
        test_type: String,
        field: &'static str,
        value: f64,
    },
}

/// A result file name split into the dimensions of the run it describes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResultFile {
    name: String,
    database: String,
    strategy: String,
    cache_mode: String,
}

impl ResultFile {
    pub fn parse(name: &str) -> Result<Self, FilenameError> {
        let stem = name
            .strip_suffix(EXTENSION)
            .ok_or_else(|| FilenameError::MissingExtension(name.to_string()))?;

        let mut parts = stem.split('-');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(database), Some(strategy), Some(cache_mode), None)
                if !database.is_empty() && !strategy.is_empty() && !cache_mode.is_empty() =>
            {
                Ok(Self {
                    name: name.to_string(),
                    database: database.to_string(),
                    strategy: strategy.to_string(),
                    cache_mode: cache_mode.to_string(),
                })
            }
            _ => Err(FilenameError::MalformedDimensions(name.to_string())),
        }
    }

    /// all files the load tester is known to produce, in display order
    pub fn known() -> Vec<Self> {
        KNOWN_FILENAMES
            .iter()
            .filter_map(|name| Self::parse(name).ok())
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn cache_mode(&self) -> &str {
        &self.cache_mode
    }

    /// path of this file inside the directory of `build`
    pub fn path_for(&self, build: u64) -> String {
        format!("results/{build}/{}", self.name)
    }
}

impl FromStr for ResultFile {
    type Err = FilenameError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::parse(name)
    }
}

impl TryFrom<String> for ResultFile {
    type Error = FilenameError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::parse(&name)
    }
}

impl From<ResultFile> for String {
    fn from(file: ResultFile) -> Self {
        file.name
    }
}

impl fmt::Display for ResultFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Counters the load tester records for a single test type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestTypeMetrics {
    pub requests: f64,
    pub updates: f64,
    pub writes: f64,
    /// seconds
    pub duration: f64,
    pub retries: f64,
}

impl TestTypeMetrics {
    fn validate(&self, test_type: &str) -> Result<(), PayloadError> {
        let counters = [
            ("requests", self.requests),
            ("updates", self.updates),
            ("writes", self.writes),
            ("retries", self.retries),
        ];

        for (field, value) in counters {
            if !value.is_finite() || value < 0.0 {
                return Err(PayloadError::InvalidMetric {
                    test_type: test_type.to_string(),
                    field,
                    value,
                });
            }
        }

        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(PayloadError::InvalidMetric {
                test_type: test_type.to_string(),
                field: "duration",
                value: self.duration,
            });
        }

        Ok(())
    }
}

/// Content of one result file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    /// server configuration the run was made against, kept as is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<serde_json::Value>,
    pub data: IndexMap<String, TestTypeMetrics>,
}

impl ResultPayload {
    /// decode and validate a fetched document
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PayloadError> {
        let payload: Self = serde_json::from_slice(bytes)?;

        for (test_type, metrics) in payload.data.iter() {
            metrics.validate(test_type)?;
        }

        Ok(payload)
    }
}

/// All result files found for one build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildResult {
    build_number: u64,
    results: IndexMap<ResultFile, ResultPayload>,
}

impl BuildResult {
    /// returns `None` for a build without any results, those never make it into a `ResultSet`
    pub fn new(build_number: u64, results: IndexMap<ResultFile, ResultPayload>) -> Option<Self> {
        if results.is_empty() {
            None
        } else {
            Some(Self {
                build_number,
                results,
            })
        }
    }

    pub fn build_number(&self) -> u64 {
        self.build_number
    }

    pub fn results(&self) -> &IndexMap<ResultFile, ResultPayload> {
        &self.results
    }

    pub fn get(&self, name: &str) -> Option<&ResultPayload> {
        self.results
            .iter()
            .find(|(file, _)| file.name() == name)
            .map(|(_, payload)| payload)
    }
}

/// Discovered builds, most recent first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    builds: Vec<BuildResult>,
}

impl ResultSet {
    /// `builds` must be in ascending build order, as probed
    pub(crate) fn from_ascending(mut builds: Vec<BuildResult>) -> Self {
        builds.reverse();

        Self { builds }
    }

    pub fn iter(&self) -> slice::Iter<'_, BuildResult> {
        self.builds.iter()
    }

    pub fn len(&self) -> usize {
        self.builds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }

    /// build at `position`, 0 being the most recent one
    pub fn nth(&self, position: usize) -> Option<&BuildResult> {
        self.builds.get(position)
    }

    pub fn latest(&self) -> Option<&BuildResult> {
        self.builds.first()
    }

    pub fn get(&self, build_number: u64) -> Option<&BuildResult> {
        self.builds
            .iter()
            .find(|build| build.build_number == build_number)
    }

    pub fn build_numbers(&self) -> Vec<u64> {
        self.builds.iter().map(BuildResult::build_number).collect()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a BuildResult;
    type IntoIter = slice::Iter<'a, BuildResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.builds.iter()
    }
}
