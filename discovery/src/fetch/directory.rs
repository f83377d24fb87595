use super::{FetchError, Fetcher};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::trace;

/// Fetcher over a local copy of the load tester output, i.e. the directory containing `results/`
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Fetcher for DirectoryFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let full_path = self.root.join(path);

        trace!(path = ?full_path, "Reading result file");

        fs::read(&full_path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => FetchError::NotFound {
                path: path.to_string(),
            },
            _ => FetchError::Io {
                path: path.to_string(),
                source,
            },
        })
    }
}
